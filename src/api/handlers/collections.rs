use std::collections::HashMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::Json;
use metrics::counter;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::ApiResponse;
use crate::errors::AppError;
use crate::gamification::sets::find_set;
use crate::gamification::{calculate_collection_stats, CollectionSet, CollectionStats, COLLECTION_SETS};
use crate::models::Holding;

#[derive(Deserialize)]
pub struct CollectionRequest {
    pub holdings: Vec<Holding>,
    /// Days held, keyed by token id.
    #[serde(default)]
    pub hold_days: HashMap<String, u32>,
    #[serde(default)]
    pub max_multiple: Decimal,
    #[serde(default)]
    pub survived_dumps: u32,
}

pub async fn sets() -> Json<ApiResponse<&'static [CollectionSet]>> {
    Json(ApiResponse::ok(COLLECTION_SETS.as_slice()))
}

pub async fn set_detail(
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<&'static CollectionSet>>, AppError> {
    find_set(&id)
        .map(|set| Json(ApiResponse::ok(set)))
        .ok_or_else(|| AppError::NotFound(format!("collection set {id}")))
}

pub async fn stats(
    payload: Result<Json<CollectionRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<CollectionStats>>, AppError> {
    let Json(req) = payload?;

    if req.holdings.iter().any(|h| h.value < Decimal::ZERO) {
        return Err(AppError::BadRequest("holding value cannot be negative".into()));
    }
    if req.max_multiple < Decimal::ZERO {
        return Err(AppError::BadRequest("max_multiple cannot be negative".into()));
    }
    let total = req
        .holdings
        .iter()
        .try_fold(Decimal::ZERO, |acc, h| acc.checked_add(h.value));
    if total.is_none() {
        return Err(AppError::BadRequest("total holding value is too large".into()));
    }

    let stats = calculate_collection_stats(
        &req.holdings,
        &req.hold_days,
        req.max_multiple,
        req.survived_dumps,
    );
    counter!("collection_scores_total").increment(1);

    Ok(Json(ApiResponse::ok(stats)))
}
