pub mod fees;
pub mod staking;

pub use fees::{
    calculate_trade_fees, fee_schedule, subtotal_in_range, FeeBreakdown, FeeSchedule, Trade,
};
pub use staking::{next_stake_tier, vibe_stake_discount, NextStakeTier, StakeTier};
