use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::gamification::leveling::LEVEL_TABLE;
use crate::gamification::COLLECTION_SETS;

pub async fn health_check() -> impl IntoResponse {
    // Forces the lazily built tables.
    let tables_ok = LEVEL_TABLE.len() == 50 && !COLLECTION_SETS.is_empty();

    if tables_ok {
        (StatusCode::OK, Json(json!({ "status": "healthy" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unhealthy", "tables": "invalid" })),
        )
    }
}
