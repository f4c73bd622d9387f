use crate::maximo::MaximoClient;
use std::path::PathBuf;

/// Shared application state. The bridge holds no data across requests;
/// this is just the upstream client and the manifest location.
#[derive(Clone)]
pub struct AppState {
    pub maximo: MaximoClient,
    pub manifest_path: PathBuf,
}

impl AppState {
    pub fn new(maximo: MaximoClient, manifest_path: PathBuf) -> Self {
        Self {
            maximo,
            manifest_path,
        }
    }
}
