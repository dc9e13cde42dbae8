//! Shopping Cart State Management
//!
//! Carts live in memory and, when a store file is configured, every
//! mutation is mirrored to it as one JSON object keyed by cart id.

use super::helpers::{add_item, set_quantity, validate_item};
use super::models::CartItem;
use crate::error::CartError;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub struct CartStore {
    /// In-memory storage for carts, keyed by cart_id.
    /// DashMap allows concurrent access without external Mutexes.
    carts: DashMap<String, Vec<CartItem>>,

    /// Where carts are mirrored, if anywhere.
    path: Option<PathBuf>,

    /// Serialises file writes so snapshots land in mutation order.
    write_lock: Mutex<()>,
}

impl CartStore {
    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            carts: DashMap::new(),
            path: None,
            write_lock: Mutex::new(()),
        }
    }

    /// Opens (or starts) a store mirrored to `path`.
    ///
    /// An unreadable or corrupt file starts an empty store rather than
    /// refusing to boot.
    pub fn open(path: PathBuf) -> Self {
        let carts = DashMap::new();
        match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, Vec<CartItem>>>(&raw) {
                Ok(saved) => {
                    info!("Loaded {} cart(s) from {}", saved.len(), path.display());
                    for (cart_id, items) in saved {
                        carts.insert(cart_id, items);
                    }
                }
                Err(e) => warn!("Ignoring corrupt cart store {}: {}", path.display(), e),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Cannot read cart store {}: {}", path.display(), e),
        }

        Self {
            carts,
            path: Some(path),
            write_lock: Mutex::new(()),
        }
    }

    pub fn items(&self, cart_id: &str) -> Vec<CartItem> {
        self.carts
            .get(cart_id)
            .map(|items| items.clone())
            .unwrap_or_default()
    }

    /// Adds items, incrementing quantities of products already present.
    pub async fn add(&self, cart_id: &str, items: Vec<CartItem>) -> Result<Vec<CartItem>, CartError> {
        for item in &items {
            validate_item(item)?;
        }
        let snapshot = {
            let mut cart = self.carts.entry(cart_id.to_string()).or_default();
            // All or nothing: merge into a copy first.
            let mut merged = cart.clone();
            for item in items {
                add_item(&mut merged, item)?;
            }
            *cart = merged.clone();
            merged
        };
        self.persist().await?;
        Ok(snapshot)
    }

    /// Sets a product's quantity; `quantity <= 0` removes it.
    ///
    /// Returns `None` when the product is not in the cart.
    pub async fn update_quantity(
        &self,
        cart_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> Result<Option<Vec<CartItem>>, CartError> {
        let snapshot = match self.carts.get_mut(cart_id) {
            Some(mut cart) => {
                if !set_quantity(&mut cart, product_id, quantity) {
                    return Ok(None);
                }
                cart.clone()
            }
            None => return Ok(None),
        };
        self.persist().await?;
        Ok(Some(snapshot))
    }

    pub async fn remove(
        &self,
        cart_id: &str,
        product_id: &str,
    ) -> Result<Option<Vec<CartItem>>, CartError> {
        self.update_quantity(cart_id, product_id, 0).await
    }

    /// Empties a cart, returning what it held.
    pub async fn clear(&self, cart_id: &str) -> Result<Vec<CartItem>, CartError> {
        let removed = self.carts.remove(cart_id).map(|(_, items)| items);
        if removed.is_some() {
            self.persist().await?;
        }
        Ok(removed.unwrap_or_default())
    }

    async fn persist(&self) -> Result<(), CartError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let _guard = self.write_lock.lock().await;
        let snapshot: BTreeMap<String, Vec<CartItem>> = self
            .carts
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        let raw = serde_json::to_vec_pretty(&snapshot)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, raw).await?;
        debug!("Persisted {} cart(s) to {}", snapshot.len(), path.display());
        Ok(())
    }
}
