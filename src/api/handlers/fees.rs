use axum::extract::rejection::JsonRejection;
use axum::Json;
use metrics::counter;
use rust_decimal::Decimal;
use serde::Serialize;

use super::ApiResponse;
use crate::errors::AppError;
use crate::trading::{
    calculate_trade_fees, fee_schedule, next_stake_tier, subtotal_in_range, FeeBreakdown,
    FeeSchedule, NextStakeTier, StakeTier, Trade,
};

#[derive(Serialize)]
pub struct FeeQuote {
    #[serde(flatten)]
    pub breakdown: FeeBreakdown,
    pub next_stake_tier: Option<NextStakeTier>,
}

#[derive(Serialize)]
pub struct StakeTierEntry {
    pub tier: StakeTier,
    pub threshold: Decimal,
    pub discount_percent: u32,
}

#[derive(Serialize)]
pub struct ScheduleResponse {
    #[serde(flatten)]
    pub schedule: FeeSchedule,
    pub stake_tiers: Vec<StakeTierEntry>,
}

/// Reject trades the fee engine does not accept.
pub fn validate_trade(trade: &Trade) -> Result<(), AppError> {
    if trade.amount <= Decimal::ZERO {
        return Err(AppError::BadRequest("amount must be positive".into()));
    }
    if trade.price <= Decimal::ZERO {
        return Err(AppError::BadRequest("price must be positive".into()));
    }
    if trade.vibe_staked < Decimal::ZERO {
        return Err(AppError::BadRequest("vibe_staked cannot be negative".into()));
    }
    if trade.hand_discount_percent < Decimal::ZERO
        || trade.hand_discount_percent > Decimal::ONE_HUNDRED
    {
        return Err(AppError::BadRequest(
            "hand_discount_percent must be between 0 and 100".into(),
        ));
    }
    if !subtotal_in_range(trade.amount, trade.price) {
        return Err(AppError::BadRequest("amount × price is too large".into()));
    }
    Ok(())
}

pub async fn quote(
    payload: Result<Json<Trade>, JsonRejection>,
) -> Result<Json<ApiResponse<FeeQuote>>, AppError> {
    let Json(trade) = payload?;
    validate_trade(&trade)?;

    let breakdown = calculate_trade_fees(&trade);
    counter!("fee_quotes_total").increment(1);

    Ok(Json(ApiResponse::ok(FeeQuote {
        next_stake_tier: next_stake_tier(trade.vibe_staked),
        breakdown,
    })))
}

pub async fn schedule() -> Json<ApiResponse<ScheduleResponse>> {
    let stake_tiers = [StakeTier::Bronze, StakeTier::Silver, StakeTier::Gold]
        .into_iter()
        .map(|tier| StakeTierEntry {
            tier,
            threshold: tier.threshold(),
            discount_percent: tier.discount_percent(),
        })
        .collect();

    Json(ApiResponse::ok(ScheduleResponse {
        schedule: fee_schedule(),
        stake_tiers,
    }))
}
