use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

/// Build the HTTP router: a health probe plus the chat adapter's webhooks.
pub fn build_router(channel_router: Router) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(channel_router)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "recall",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
