use axum::extract::rejection::PathRejection;
use axum::extract::Path;
use axum::Json;
use metrics::counter;
use rust_decimal::Decimal;
use serde::Serialize;

use super::ApiResponse;
use crate::errors::AppError;
use crate::gamification::leveling::{
    calculate_level, level_info, level_progress, unlocks_through, xp_to_next_level, LevelInfo,
    UserLevel, LEVEL_TABLE, MAX_LEVEL,
};

#[derive(Serialize)]
pub struct LevelResponse {
    #[serde(flatten)]
    pub level: UserLevel,
    pub progress: Decimal,
    pub xp_to_next_level: u64,
    pub next_level: Option<&'static LevelInfo>,
    pub unlocks: Vec<&'static str>,
}

pub async fn table() -> Json<ApiResponse<&'static [LevelInfo]>> {
    Json(ApiResponse::ok(LEVEL_TABLE.as_slice()))
}

pub async fn resolve(
    path: Result<Path<u64>, PathRejection>,
) -> Result<Json<ApiResponse<LevelResponse>>, AppError> {
    let Path(total_xp) = path?;
    let level = calculate_level(total_xp);
    counter!("level_lookups_total").increment(1);

    let next_level = if level.level < MAX_LEVEL {
        level_info(level.level + 1)
    } else {
        None
    };

    Ok(Json(ApiResponse::ok(LevelResponse {
        progress: level_progress(&level),
        xp_to_next_level: xp_to_next_level(&level),
        next_level,
        unlocks: unlocks_through(level.level),
        level,
    })))
}
