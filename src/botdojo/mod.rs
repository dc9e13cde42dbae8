//! BotDojo token proxy
//!
//! The browser never sees the API key. It asks this server for a
//! short-lived token, and the server mints one upstream with the key.

use crate::config::{ServerConfig, DEFAULT_BOTDOJO_BASE_URL};
use crate::error::ApiError;
use crate::state::SharedState;
use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct BotDojoSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub flow_id: Option<String>,
}

impl Default for BotDojoSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BOTDOJO_BASE_URL.to_string(),
            api_key: None,
            flow_id: None,
        }
    }
}

impl BotDojoSettings {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            base_url: config.botdojo_base_url.trim_end_matches('/').to_string(),
            api_key: config.botdojo_api_key.clone().filter(|k| !k.is_empty()),
            flow_id: config.botdojo_flow_id.clone().filter(|f| !f.is_empty()),
        }
    }

    fn token_url(&self, flow_id: &str) -> String {
        format!("{}/api/v1/flow/{}/token", self.base_url, flow_id)
    }
}

/// What the browser gets back from the token endpoint.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}

/// Configuration status, safe to expose to the browser.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvStatus {
    pub api_key_configured: bool,
    pub flow_id_configured: bool,
    pub base_url: String,
}

/// Creates routes for the BotDojo proxy
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/botdojo/token", get(issue_token).post(issue_token))
        .route("/api/env-status", get(env_status))
}

/// Endpoint: GET|POST /api/botdojo/token
async fn issue_token(State(state): State<SharedState>) -> Result<Json<TokenResponse>, ApiError> {
    let settings = &state.botdojo;
    let api_key = settings
        .api_key
        .as_deref()
        .ok_or(ApiError::NotConfigured("BOTDOJO_API_KEY"))?;
    let flow_id = settings
        .flow_id
        .as_deref()
        .ok_or(ApiError::NotConfigured("BOTDOJO_FLOW_ID"))?;

    let response = state
        .http
        .post(settings.token_url(flow_id))
        .bearer_auth(api_key)
        .json(&serde_json::json!({}))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        warn!("BotDojo token request failed with {}", status);
        return Err(ApiError::Upstream(format!("BotDojo returned {status}")));
    }

    let body: Value = response.json().await?;
    let token = body
        .get("token")
        .or_else(|| body.get("access_token"))
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::Upstream("BotDojo response carried no token".to_string()))?;
    let expires_in = body
        .get("expiresIn")
        .or_else(|| body.get("expires_in"))
        .and_then(Value::as_u64);

    info!(flow_id, "issued BotDojo client token");
    Ok(Json(TokenResponse {
        token: token.to_string(),
        expires_in,
    }))
}

/// Endpoint: GET /api/env-status
async fn env_status(State(state): State<SharedState>) -> Json<EnvStatus> {
    Json(EnvStatus {
        api_key_configured: state.botdojo.api_key.is_some(),
        flow_id_configured: state.botdojo.flow_id.is_some(),
        base_url: state.botdojo.base_url.clone(),
    })
}
