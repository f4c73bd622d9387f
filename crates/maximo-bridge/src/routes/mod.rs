pub mod assets;
pub mod manifest;

use crate::state::AppState;
use axum::Router;

// Function to configure all routes
pub fn configure(state: AppState) -> Router {
    Router::new()
        .merge(assets::routes(state.clone()))
        .merge(manifest::routes(state))
}
