use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use super::webhook;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/callback", post(webhook::callback))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Deploy check; lets a fresh deploy be poked with a browser.
async fn root() -> &'static str {
    tracing::debug!("root page hit");
    "Here is root page."
}
