use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;

/// The field list every asset listing asks Maximo for
pub const ASSET_SELECT: &str = "assetnum,siteid,status,location,description";

/// Pagination and filter parameters for an asset listing
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub page_size: u32,
    pub page_num: u32,
    pub where_clause: Option<String>,
    pub lean: Option<i64>,
    pub ignorecollectionref: Option<i64>,
}

/// Thin client over the Maximo OSLC REST API.
///
/// Every call is a single authenticated GET; responses are passed through
/// as opaque JSON. Non-2xx statuses come back as errors.
#[derive(Clone)]
pub struct MaximoClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl MaximoClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }

    /// Retrieve a single asset by its ID, requesting the lean,
    /// reference-free representation.
    pub async fn get_asset(
        &self,
        asset_id: &str,
        lean: Option<i64>,
        ignorecollectionref: Option<i64>,
    ) -> Result<Value, reqwest::Error> {
        let url = format!(
            "{}/os/mxasset/{}?lean=1&ignorecollectionref=1",
            self.base_url.trim_end_matches('/'),
            asset_id
        );

        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(lean) = lean {
            params.push(("lean", lean.to_string()));
        }
        if let Some(icr) = ignorecollectionref {
            params.push(("ignorecollectionref", icr.to_string()));
        }

        let response = self
            .client
            .get(&url)
            .query(&params)
            .header("apikey", &self.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?;

        response.json().await
    }

    /// List assets with the fixed field selection, pagination and an
    /// optional OSLC where filter.
    pub async fn list_assets(&self, query: &ListQuery) -> Result<Value, reqwest::Error> {
        let url = format!(
            "{}/os/mxasset?lean=1&ignorecollectionref=1",
            self.base_url.trim_end_matches('/')
        );

        let mut params: Vec<(&str, String)> = vec![
            ("oslc.select", ASSET_SELECT.to_string()),
            ("pageno", query.page_num.to_string()),
            ("oslc.pageSize", query.page_size.to_string()),
        ];
        if let Some(where_clause) = &query.where_clause {
            params.push(("oslc.where", where_clause.clone()));
        }
        if let Some(lean) = query.lean {
            params.push(("lean", lean.to_string()));
        }
        if let Some(icr) = query.ignorecollectionref {
            params.push(("ignorecollectionref", icr.to_string()));
        }

        let response = self
            .client
            .get(&url)
            .query(&params)
            .header("apikey", &self.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?;

        response.json().await
    }
}
