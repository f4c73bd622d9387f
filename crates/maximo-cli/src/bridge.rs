use crate::tools::{BridgeCall, ToolOutcome};
use anyhow::{Context, Result};
use maximo_agent::manifest::ToolDescriptor;
use reqwest::Client;
use serde_json::Value;

/// HTTP client for the tool bridge. One GET per call, no retries; failures
/// become `ToolOutcome::Failure` so the session can report them instead of
/// feeding them to the model.
pub struct BridgeClient {
    client: Client,
    base_url: String,
}

impl BridgeClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the tool manifest; called once per session and cached by the
    /// caller.
    pub async fn fetch_manifest(&self) -> Result<Vec<ToolDescriptor>> {
        let url = format!("{}/tools", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Could not reach the bridge at {}", self.base_url))?
            .error_for_status()
            .context("The bridge could not provide the tool manifest")?;
        response
            .json()
            .await
            .context("The bridge returned a malformed tool manifest")
    }

    /// Dispatch a validated call to the bridge.
    pub async fn dispatch(&self, call: &BridgeCall) -> ToolOutcome {
        match self.dispatch_inner(call).await {
            Ok(outcome) => outcome,
            Err(e) => ToolOutcome::Failure(format!("{} failed: {:#}", call.name(), e)),
        }
    }

    async fn dispatch_inner(&self, call: &BridgeCall) -> Result<ToolOutcome> {
        let request = match call {
            BridgeCall::GetAsset { asset_id } => self
                .client
                .get(format!("{}/tools/get_asset/{}", self.base_url, asset_id)),
            BridgeCall::ListAssets {
                where_clause,
                page_size,
                page_num,
            } => {
                let mut params: Vec<(&str, String)> = Vec::new();
                if let Some(where_clause) = where_clause {
                    params.push(("oslc.where", where_clause.clone()));
                }
                if let Some(page_size) = page_size {
                    params.push(("page_size", page_size.to_string()));
                }
                if let Some(page_num) = page_num {
                    params.push(("page_num", page_num.to_string()));
                }
                self.client
                    .get(format!("{}/tools/list_assets", self.base_url))
                    .query(&params)
            }
        };

        let response = request.send().await?;
        let status = response.status();
        let body: Value = response.json().await?;

        // The bridge reports upstream failures as {"error": ...}; treat an
        // error-shaped body as a failure regardless of status
        if let Some(error) = body.get("error").and_then(Value::as_str) {
            return Ok(ToolOutcome::Failure(format!(
                "{} failed: {}",
                call.name(),
                error
            )));
        }
        if !status.is_success() {
            return Ok(ToolOutcome::Failure(format!(
                "{} failed: bridge returned {}",
                call.name(),
                status
            )));
        }

        Ok(ToolOutcome::Success(body))
    }
}
