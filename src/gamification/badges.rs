use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Permanent achievement attached to a holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeType {
    Og,
    DiamondHands,
    Whale,
    Degen,
    Prophet,
    Lucky,
    Moonshot,
    /// Held through a 50%+ dip. Not awarded automatically; kept when present.
    Survivor,
}

#[derive(Debug, Clone, Serialize)]
pub struct BadgeInfo {
    pub badge: BadgeType,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

impl BadgeType {
    pub const ALL: [BadgeType; 8] = [
        BadgeType::Og,
        BadgeType::DiamondHands,
        BadgeType::Whale,
        BadgeType::Degen,
        BadgeType::Prophet,
        BadgeType::Lucky,
        BadgeType::Moonshot,
        BadgeType::Survivor,
    ];

    pub fn info(&self) -> BadgeInfo {
        let (name, description, icon) = match self {
            BadgeType::Og => ("OG", "One of the first 100 buyers", "👑"),
            BadgeType::DiamondHands => ("Diamond Hands", "Held for 30+ days", "💎"),
            BadgeType::Whale => ("Whale", "Top 10 holder by value", "🐋"),
            BadgeType::Degen => ("Degen", "Traded this token 10+ times", "🎰"),
            BadgeType::Prophet => ("Prophet", "Bought before a 10x", "🔮"),
            BadgeType::Lucky => ("Lucky", "Bought within 5% of the all-time low", "🍀"),
            BadgeType::Moonshot => ("Moonshot", "Rode a 100x", "🚀"),
            BadgeType::Survivor => ("Survivor", "Held through a 50%+ dip", "🛡️"),
        };
        BadgeInfo {
            badge: *self,
            name,
            description,
            icon,
        }
    }
}

impl fmt::Display for BadgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.info().name)
    }
}

/// Facts about a holder's position that badges are judged on.
#[derive(Debug, Clone)]
pub struct BadgeFacts {
    pub price_multiple: Decimal,
    pub hold_days: u32,
    /// 1-based order in which this holder first bought the token.
    pub buyer_number: u32,
    /// 1-based rank among holders by position value.
    pub holder_value_rank: u32,
    pub trade_count: u32,
    pub buy_price: Decimal,
    pub all_time_low: Decimal,
}

/// Badges the facts qualify for, in evaluation order. Each rule is
/// independent; the result does not depend on badges already held.
pub fn qualifying_badges(facts: &BadgeFacts) -> Vec<BadgeType> {
    let mut earned = Vec::new();

    if facts.buyer_number >= 1 && facts.buyer_number <= 100 {
        earned.push(BadgeType::Og);
    }
    if facts.hold_days >= 30 {
        earned.push(BadgeType::DiamondHands);
    }
    if facts.holder_value_rank >= 1 && facts.holder_value_rank <= 10 {
        earned.push(BadgeType::Whale);
    }
    if facts.trade_count >= 10 {
        earned.push(BadgeType::Degen);
    }
    if facts.price_multiple >= Decimal::from(10) {
        earned.push(BadgeType::Prophet);
    }
    let near_low = facts.all_time_low > Decimal::ZERO
        && facts
            .buy_price
            .checked_div(facts.all_time_low)
            .is_some_and(|ratio| ratio <= Decimal::new(105, 2));
    if near_low {
        earned.push(BadgeType::Lucky);
    }
    if facts.price_multiple >= Decimal::ONE_HUNDRED {
        earned.push(BadgeType::Moonshot);
    }

    earned
}

/// Merge newly qualifying badges into an existing set. Existing badges keep
/// their position and are never dropped; new ones are appended once.
pub fn merge_badges(existing: &[BadgeType], qualifying: &[BadgeType]) -> Vec<BadgeType> {
    let mut merged: Vec<BadgeType> = Vec::with_capacity(existing.len() + qualifying.len());
    for badge in existing.iter().chain(qualifying.iter()) {
        if !merged.contains(badge) {
            merged.push(*badge);
        }
    }
    merged
}
