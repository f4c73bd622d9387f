use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the bridge endpoints. Every variant renders as a
/// 500 with a JSON error body; the upstream failure is passed along in the
/// message, never retried.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("manifest unavailable: {0}")]
    Manifest(String),
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": self.to_string()})),
        )
            .into_response()
    }
}

/// Errors raised while loading settings at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {env_var}")]
    MissingEnvVar { env_var: String },

    #[error(transparent)]
    Other(#[from] config::ConfigError),
}

/// Map a settings field path like `maximo.api_key` to the environment
/// variable that provides it.
pub fn to_env_var(field: &str) -> String {
    format!("BRIDGE_{}", field.replace('.', "__").to_uppercase())
}
