use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::staking::{vibe_stake_discount, StakeTier};
use crate::models::TradeDirection;

/// Platform share of every trade, in basis points of the subtotal.
pub const PLATFORM_FEE_BPS: u32 = 50;
/// Creator share; never discounted.
pub const CREATOR_FEE_BPS: u32 = 30;
/// Referrer share; folds into the platform share when there is no referrer.
pub const REFERRER_FEE_BPS: u32 = 20;
pub const TOTAL_FEE_BPS: u32 = PLATFORM_FEE_BPS + CREATOR_FEE_BPS + REFERRER_FEE_BPS;

/// Stake and hand discounts stack additively up to this cap (percent).
pub const MAX_TOTAL_DISCOUNT: u32 = 75;

const BPS_PER_UNIT: i64 = 10_000;

/// A trade to be priced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub amount: Decimal,
    pub price: Decimal,
    pub direction: TradeDirection,
    #[serde(default)]
    pub has_referrer: bool,
    #[serde(default)]
    pub vibe_staked: Decimal,
    /// Discount from the user's poker-hand bonus, in percent (0-100).
    #[serde(default)]
    pub hand_discount_percent: Decimal,
}

/// Fee split for a single trade. Amounts are unrounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub direction: TradeDirection,
    pub subtotal: Decimal,
    pub platform_fee: Decimal,
    pub creator_fee: Decimal,
    pub referrer_fee: Decimal,
    pub total_fees: Decimal,
    /// Amount payable on a buy, receivable on a sell.
    pub total: Decimal,
    pub platform_fee_bps: Decimal,
    pub creator_fee_bps: Decimal,
    pub referrer_fee_bps: Decimal,
    /// Effective total fee as a percentage of the subtotal.
    pub total_fee_percent: Decimal,
    pub stake_tier: StakeTier,
    pub vibe_stake_discount: Decimal,
    pub hand_discount: Decimal,
    pub total_discount: Decimal,
    pub savings: Decimal,
}

/// Base rates, for display.
#[derive(Debug, Clone, Serialize)]
pub struct FeeSchedule {
    pub platform_fee_bps: u32,
    pub creator_fee_bps: u32,
    pub referrer_fee_bps: u32,
    pub total_fee_bps: u32,
    pub max_total_discount: u32,
}

pub fn fee_schedule() -> FeeSchedule {
    FeeSchedule {
        platform_fee_bps: PLATFORM_FEE_BPS,
        creator_fee_bps: CREATOR_FEE_BPS,
        referrer_fee_bps: REFERRER_FEE_BPS,
        total_fee_bps: TOTAL_FEE_BPS,
        max_total_discount: MAX_TOTAL_DISCOUNT,
    }
}

/// Compute the fee split for a trade.
///
/// The combined stake + hand discount (capped at 75%) is applied to the
/// platform share only. Without a referrer, the referrer share is charged
/// as platform fee and discounted with it; with a referrer it is paid out
/// in full. The creator share is never discounted. Amounts saturate at the
/// `Decimal` range instead of overflowing.
pub fn calculate_trade_fees(trade: &Trade) -> FeeBreakdown {
    let subtotal = trade.amount.saturating_mul(trade.price);

    let stake_tier = StakeTier::for_stake(trade.vibe_staked);
    let stake_discount = Decimal::from(vibe_stake_discount(trade.vibe_staked));
    let total_discount = stake_discount
        .saturating_add(trade.hand_discount_percent)
        .max(Decimal::ZERO)
        .min(Decimal::from(MAX_TOTAL_DISCOUNT));

    let (undiscounted_platform_bps, referrer_bps) = if trade.has_referrer {
        (PLATFORM_FEE_BPS, REFERRER_FEE_BPS)
    } else {
        (PLATFORM_FEE_BPS + REFERRER_FEE_BPS, 0)
    };

    let platform_bps = Decimal::from(undiscounted_platform_bps)
        * (Decimal::ONE_HUNDRED - total_discount)
        / Decimal::ONE_HUNDRED;
    let creator_bps = Decimal::from(CREATOR_FEE_BPS);
    let referrer_bps = Decimal::from(referrer_bps);

    let platform_fee = apply_bps(subtotal, platform_bps);
    let creator_fee = apply_bps(subtotal, creator_bps);
    let referrer_fee = apply_bps(subtotal, referrer_bps);
    let total_fees = platform_fee
        .saturating_add(creator_fee)
        .saturating_add(referrer_fee);

    let undiscounted_fees = apply_bps(subtotal, Decimal::from(TOTAL_FEE_BPS));
    let savings = undiscounted_fees
        .saturating_sub(total_fees)
        .max(Decimal::ZERO);

    let total = match trade.direction {
        TradeDirection::Buy => subtotal.saturating_add(total_fees),
        TradeDirection::Sell => subtotal.saturating_sub(total_fees),
    };

    let total_fee_percent = if subtotal.is_zero() {
        Decimal::ZERO
    } else {
        total_fees / subtotal * Decimal::ONE_HUNDRED
    };

    tracing::debug!(
        direction = %trade.direction,
        subtotal = %subtotal,
        total_fees = %total_fees,
        total_discount = %total_discount,
        "Trade fees calculated"
    );

    FeeBreakdown {
        direction: trade.direction,
        subtotal,
        platform_fee,
        creator_fee,
        referrer_fee,
        total_fees,
        total,
        platform_fee_bps: platform_bps,
        creator_fee_bps: creator_bps,
        referrer_fee_bps: referrer_bps,
        total_fee_percent,
        stake_tier,
        vibe_stake_discount: stake_discount,
        hand_discount: trade.hand_discount_percent,
        total_discount,
        savings,
    }
}

fn apply_bps(amount: Decimal, bps: Decimal) -> Decimal {
    amount.saturating_mul(bps) / Decimal::from(BPS_PER_UNIT)
}

/// Whether the subtotal, and every bps share of it, fits in a `Decimal`
/// without saturating.
pub fn subtotal_in_range(amount: Decimal, price: Decimal) -> bool {
    amount
        .checked_mul(price)
        .and_then(|subtotal| subtotal.checked_mul(Decimal::from(TOTAL_FEE_BPS)))
        .is_some()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
