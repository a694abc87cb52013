use axum::extract::rejection::JsonRejection;
use axum::Json;
use metrics::counter;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ApiResponse;
use crate::errors::AppError;
use crate::gamification::evolution::{
    calculate_evolution, evolution_gradient, CardEvolutionState, EvolutionChange,
    EvolutionGradient, HoldingData,
};
use crate::models::Token;

#[derive(Deserialize)]
pub struct EvolutionRequest {
    pub token: Token,
    pub holding: HoldingData,
}

#[derive(Serialize)]
pub struct EvolutionResponse {
    #[serde(flatten)]
    pub state: CardEvolutionState,
    pub gradient: EvolutionGradient,
}

pub fn validate_request(req: &EvolutionRequest) -> Result<(), AppError> {
    if req.token.price < Decimal::ZERO {
        return Err(AppError::BadRequest("token price cannot be negative".into()));
    }
    if req.token.score < Decimal::ZERO || req.token.score > Decimal::ONE_HUNDRED {
        return Err(AppError::BadRequest("token score must be between 0 and 100".into()));
    }
    if req.holding.buy_price <= Decimal::ZERO {
        return Err(AppError::BadRequest("buy_price must be positive".into()));
    }
    if req.holding.all_time_low < Decimal::ZERO {
        return Err(AppError::BadRequest("all_time_low cannot be negative".into()));
    }
    let multiple_fits = req
        .token
        .price
        .checked_div(req.holding.buy_price)
        .is_some_and(|m| m.checked_mul(Decimal::ONE_HUNDRED).is_some());
    if !multiple_fits {
        return Err(AppError::BadRequest("price / buy_price is too large".into()));
    }
    if req.holding.all_time_low > Decimal::ZERO
        && req.holding.buy_price.checked_div(req.holding.all_time_low).is_none()
    {
        return Err(AppError::BadRequest("buy_price / all_time_low is too large".into()));
    }
    if let Some(previous) = &req.holding.previous {
        if previous.token_id != req.token.id {
            return Err(AppError::BadRequest(format!(
                "previous state belongs to token {}",
                previous.token_id
            )));
        }
    }
    Ok(())
}

pub async fn evaluate(
    payload: Result<Json<EvolutionRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<EvolutionResponse>>, AppError> {
    let Json(req) = payload?;
    validate_request(&req)?;

    let prior_events = req
        .holding
        .previous
        .as_ref()
        .map(|p| p.evolution_history.len())
        .unwrap_or(0);

    let state = calculate_evolution(&req.token, &req.holding);

    let badges_awarded = state.evolution_history[prior_events..]
        .iter()
        .filter(|e| matches!(e.change, EvolutionChange::BadgeEarned { .. }))
        .count();

    counter!("evolutions_total").increment(1);
    counter!("badges_awarded_total").increment(badges_awarded as u64);

    if badges_awarded > 0 {
        tracing::info!(
            token_id = %req.token.id,
            badges_awarded,
            "Badges awarded"
        );
    }

    Ok(Json(ApiResponse::ok(EvolutionResponse {
        gradient: evolution_gradient(state.effect),
        state,
    })))
}
