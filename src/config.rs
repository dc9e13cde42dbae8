//! Server configuration
//!
//! Every option is a command line flag that can also come from the
//! environment, so the same binary runs locally and behind a proxy.

use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_BOTDOJO_BASE_URL: &str = "https://api.botdojo.com";

#[derive(Parser, Debug, Clone)]
#[command(name = "botdojo-playground", version, about = "BotDojo SDK playground backend")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "PLAYGROUND_BIND", default_value = "0.0.0.0:8000")]
    pub bind: String,

    /// Directory holding `mcp-apps/*.html` bundles (searched for when unset)
    #[arg(long, env = "PLAYGROUND_ASSETS_DIR")]
    pub assets_dir: Option<PathBuf>,

    /// Product catalog JSON file (bundled catalog when unset)
    #[arg(long, env = "PLAYGROUND_CATALOG")]
    pub catalog_path: Option<PathBuf>,

    /// File carts are mirrored to (in memory only when unset)
    #[arg(long, env = "PLAYGROUND_CART_STORE")]
    pub cart_store: Option<PathBuf>,

    /// BotDojo API base URL
    #[arg(long, env = "BOTDOJO_BASE_URL", default_value = DEFAULT_BOTDOJO_BASE_URL)]
    pub botdojo_base_url: String,

    /// Server-only BotDojo API key used to mint client tokens
    #[arg(long, env = "BOTDOJO_API_KEY", hide_env_values = true)]
    pub botdojo_api_key: Option<String>,

    /// Flow the minted tokens are scoped to
    #[arg(long, env = "BOTDOJO_FLOW_ID")]
    pub botdojo_flow_id: Option<String>,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServerConfig {
    /// Configuration with every default and nothing read from the process
    /// arguments.
    pub fn defaults() -> Self {
        Self::parse_from(["botdojo-playground"])
    }
}
