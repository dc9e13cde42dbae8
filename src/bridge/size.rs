//! Size negotiation
//!
//! The widget reports its rendered bounding box whenever it changes so the
//! host can resize the iframe. Measurements arrive in bursts (resize
//! observer, window resize), so they are debounced and only a changed,
//! rounded-up size is sent as `ui/size-change`.

use super::client::Bridge;
use super::models::SIZE_CHANGE;
use super::transport::Transport;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);

/// Size as announced to the host, in whole CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WidgetSize {
    pub width: u32,
    pub height: u32,
}

impl WidgetSize {
    /// Rounds a fractional bounding box up so content is never clipped.
    pub fn from_rect(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0).ceil() as u32,
            height: height.max(0.0).ceil() as u32,
        }
    }
}

/// Feeds measurements to a background task that notifies the host.
pub struct SizeReporter {
    tx: watch::Sender<Option<WidgetSize>>,
    task: JoinHandle<()>,
}

impl SizeReporter {
    pub fn spawn<T: Transport>(bridge: Bridge<T>, debounce: Duration) -> Self {
        let (tx, mut rx) = watch::channel(None::<WidgetSize>);

        let task = tokio::spawn(async move {
            let mut last_sent: Option<WidgetSize> = None;
            while rx.changed().await.is_ok() {
                tokio::time::sleep(debounce).await;
                let current = *rx.borrow_and_update();
                let Some(size) = current else { continue };
                if last_sent == Some(size) {
                    continue;
                }
                match bridge.notify(SIZE_CHANGE, &size) {
                    Ok(()) => {
                        debug!(width = size.width, height = size.height, "size change sent");
                        last_sent = Some(size);
                    }
                    Err(e) => warn!("failed to report size: {}", e),
                }
            }
        });

        Self { tx, task }
    }

    /// Records a fresh bounding box measurement.
    pub fn observe(&self, width: f64, height: f64) {
        let size = WidgetSize::from_rect(width, height);
        self.tx.send_replace(Some(size));
    }
}

impl Drop for SizeReporter {
    fn drop(&mut self) {
        self.task.abort();
    }
}
