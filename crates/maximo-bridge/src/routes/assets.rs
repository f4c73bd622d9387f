use crate::error::BridgeError;
use crate::maximo::ListQuery;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct AssetFlags {
    lean: Option<i64>,
    ignorecollectionref: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_page_size")]
    page_size: u32,
    #[serde(default = "default_page_num")]
    page_num: u32,
    #[serde(rename = "oslc.where")]
    where_clause: Option<String>,
    lean: Option<i64>,
    ignorecollectionref: Option<i64>,
}

fn default_page_size() -> u32 {
    10
}

fn default_page_num() -> u32 {
    1
}

async fn get_asset(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
    Query(flags): Query<AssetFlags>,
) -> Result<Json<Value>, BridgeError> {
    info!("get_asset: {}", asset_id);
    let asset = state
        .maximo
        .get_asset(&asset_id, flags.lean, flags.ignorecollectionref)
        .await?;
    Ok(Json(asset))
}

async fn list_assets(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, BridgeError> {
    info!(
        "list_assets: page {} (size {})",
        params.page_num, params.page_size
    );
    let query = ListQuery {
        page_size: params.page_size,
        page_num: params.page_num,
        where_clause: params.where_clause,
        lean: params.lean,
        ignorecollectionref: params.ignorecollectionref,
    };
    let envelope = state.maximo.list_assets(&query).await?;
    Ok(Json(envelope))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/tools/get_asset/:asset_id", get(get_asset))
        .route("/tools/list_assets", get(list_assets))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maximo::{MaximoClient, ASSET_SELECT};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn app(upstream: &MockServer) -> Router {
        let state = AppState::new(
            MaximoClient::new(upstream.uri(), "test-key".to_string()),
            "manifest.json".into(),
        );
        routes(state)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn get_asset_passes_body_through() {
        let upstream = MockServer::start().await;
        let asset = json!({
            "assetnum": "A-100",
            "siteid": "BEDFORD",
            "status": "OPERATING",
            "location": "BR300",
            "description": "Overhead crane"
        });
        Mock::given(method("GET"))
            .and(path("/os/mxasset/A-100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(asset.clone()))
            .mount(&upstream)
            .await;

        let response = app(&upstream)
            .await
            .oneshot(
                Request::builder()
                    .uri("/tools/get_asset/A-100")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, asset);
    }

    #[tokio::test]
    async fn upstream_failure_becomes_500_with_error_field() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&upstream)
            .await;

        let response = app(&upstream)
            .await
            .oneshot(
                Request::builder()
                    .uri("/tools/get_asset/MISSING")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(!body["error"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_assets_applies_defaults() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/os/mxasset"))
            .and(query_param("oslc.select", ASSET_SELECT))
            .and(query_param("pageno", "1"))
            .and(query_param("oslc.pageSize", "10"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"member": [{"assetnum": "A-100"}]})),
            )
            .mount(&upstream)
            .await;

        let response = app(&upstream)
            .await
            .oneshot(
                Request::builder()
                    .uri("/tools/list_assets")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["member"][0]["assetnum"], "A-100");
    }

    #[tokio::test]
    async fn list_assets_forwards_filter_and_pagination() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/os/mxasset"))
            .and(query_param("pageno", "2"))
            .and(query_param("oslc.pageSize", "5"))
            .and(query_param("oslc.where", "status=\"OPERATING\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"member": []})))
            .mount(&upstream)
            .await;

        let uri = "/tools/list_assets?page_size=5&page_num=2&oslc.where=status%3D%22OPERATING%22";
        let response = app(&upstream)
            .await
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
