use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::config::{get_config, StorageBackend};

#[axum::debug_handler]
pub async fn health() -> impl IntoResponse {
    let storage = match get_config().storage {
        StorageBackend::Postgres => "postgres",
        StorageBackend::Memory => "memory",
    };
    let body = json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "storage": storage,
    });
    (StatusCode::OK, Json(body))
}
