use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fee-discount bracket earned by staking VIBE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StakeTier {
    None,
    Bronze,
    Silver,
    Gold,
}

/// Minimum stake per tier, highest first. The first threshold met wins, so a
/// stake of exactly 1000 lands in Gold and never also counts as Silver.
const STAKE_TIERS: [(u64, StakeTier); 3] = [
    (1_000, StakeTier::Gold),
    (500, StakeTier::Silver),
    (100, StakeTier::Bronze),
];

impl StakeTier {
    pub fn for_stake(staked: Decimal) -> Self {
        STAKE_TIERS
            .iter()
            .find(|(threshold, _)| staked >= Decimal::from(*threshold))
            .map(|(_, tier)| *tier)
            .unwrap_or(StakeTier::None)
    }

    /// Platform-fee discount granted by this tier, in percent.
    pub fn discount_percent(&self) -> u32 {
        match self {
            StakeTier::None => 0,
            StakeTier::Bronze => 10,
            StakeTier::Silver => 25,
            StakeTier::Gold => 50,
        }
    }

    /// Minimum stake for this tier.
    pub fn threshold(&self) -> Decimal {
        STAKE_TIERS
            .iter()
            .find(|(_, tier)| tier == self)
            .map(|(threshold, _)| Decimal::from(*threshold))
            .unwrap_or(Decimal::ZERO)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StakeTier::None => "none",
            StakeTier::Bronze => "bronze",
            StakeTier::Silver => "silver",
            StakeTier::Gold => "gold",
        }
    }
}

impl fmt::Display for StakeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Staircase discount for a VIBE stake: 0, 10, 25 or 50 percent.
pub fn vibe_stake_discount(staked: Decimal) -> u32 {
    StakeTier::for_stake(staked).discount_percent()
}

/// What staking more would earn the holder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextStakeTier {
    pub tier: StakeTier,
    pub threshold: Decimal,
    pub discount_percent: u32,
    pub additional_stake: Decimal,
}

/// The next tier above the current stake, or `None` once Gold is reached.
pub fn next_stake_tier(staked: Decimal) -> Option<NextStakeTier> {
    STAKE_TIERS
        .iter()
        .rev()
        .map(|(threshold, tier)| (Decimal::from(*threshold), *tier))
        .find(|(threshold, _)| *threshold > staked)
        .map(|(threshold, tier)| NextStakeTier {
            tier,
            threshold,
            discount_percent: tier.discount_percent(),
            additional_stake: threshold - staked.max(Decimal::ZERO),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
