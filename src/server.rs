use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::cms::QueryExecutor;
use crate::slug_lookup::post_localized_slugs;

/// HTTP routes served by this crate
pub fn router<E>(executor: Arc<E>) -> Router
where
    E: QueryExecutor + 'static,
{
    Router::new()
        .route("/api/post-localized-slugs", get(post_localized_slugs::<E>))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(executor)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
