use crate::error::BridgeError;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use maximo_agent::manifest::ToolDescriptor;
use tracing::info;

/// Serve the static tool manifest. The file is read on every request so
/// edits show up without a restart.
async fn get_tools(State(state): State<AppState>) -> Result<Json<Vec<ToolDescriptor>>, BridgeError> {
    info!("serving tool manifest from {}", state.manifest_path.display());
    let raw = tokio::fs::read_to_string(&state.manifest_path)
        .await
        .map_err(|e| BridgeError::Manifest(e.to_string()))?;
    let manifest: Vec<ToolDescriptor> =
        serde_json::from_str(&raw).map_err(|e| BridgeError::Manifest(e.to_string()))?;
    Ok(Json(manifest))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/tools", get(get_tools))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maximo::MaximoClient;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::io::Write;
    use tower::ServiceExt;

    fn app(manifest_path: std::path::PathBuf) -> Router {
        let state = AppState::new(
            MaximoClient::new("http://127.0.0.1:1".to_string(), "test-key".to_string()),
            manifest_path,
        );
        routes(state)
    }

    #[tokio::test]
    async fn manifest_lists_both_tools() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let manifest = json!([
            {
                "name": "get_asset",
                "description": "Gets details for a specific asset by its ID.",
                "parameters": {"type": "object", "properties": {}}
            },
            {
                "name": "list_assets",
                "description": "Lists assets, optionally filtering with an OSLC where clause.",
                "parameters": {"type": "object", "properties": {}}
            }
        ]);
        file.write_all(manifest.to_string().as_bytes()).unwrap();

        let response = app(file.path().to_path_buf())
            .oneshot(Request::builder().uri("/tools").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|tool| tool["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["get_asset", "list_assets"]);
    }

    #[tokio::test]
    async fn missing_manifest_is_a_500() {
        let response = app("/does/not/exist/manifest.json".into())
            .oneshot(Request::builder().uri("/tools").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(!body["error"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_manifest_is_a_500() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let response = app(file.path().to_path_buf())
            .oneshot(Request::builder().uri("/tools").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
