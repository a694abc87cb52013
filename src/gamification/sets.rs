use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Rank;

/// One condition a collection set checks against current holdings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SetRequirement {
    /// Own at least `count` tokens in `category`.
    Category { category: String, count: usize },
    /// Own at least `count` cards of `rank` or higher.
    RankAtLeast { rank: Rank, count: usize },
    /// Own at least `count` tokens in total.
    MinCount { count: usize },
    /// Hold at least `usd` of total value.
    MinValue { usd: Decimal },
    /// Own cards of at least `suits` distinct suits.
    SuitCount { suits: usize },
    /// Have held at least `count` tokens for 30 days or more.
    HeldThirtyDays { count: usize },
}

impl SetRequirement {
    pub fn describe(&self) -> String {
        match self {
            SetRequirement::Category { category, count } => {
                format!("Own {count} {category} token(s)")
            }
            SetRequirement::RankAtLeast { rank, count } => {
                format!("Own {count} card(s) ranked {rank} or higher")
            }
            SetRequirement::MinCount { count } => format!("Own {count} different tokens"),
            SetRequirement::MinValue { usd } => format!("Hold ${usd} in total value"),
            SetRequirement::SuitCount { suits } => format!("Own cards of {suits} different suits"),
            SetRequirement::HeldThirtyDays { count } => {
                format!("Hold {count} token(s) for 30+ days")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SetReward {
    Title(String),
    /// Extra trading-fee discount, in percent.
    FeeDiscount(Decimal),
    /// Airdrop allocation boost, in percent.
    AirdropBoost(Decimal),
    /// Card back id granted on completion.
    CardBack(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionSet {
    pub id: String,
    pub name: String,
    pub description: String,
    pub requirements: Vec<SetRequirement>,
    pub rewards: Vec<SetReward>,
}

pub const FULL_DECK_SET_ID: &str = "full_deck";

/// Built-in set catalog.
pub static COLLECTION_SETS: Lazy<Vec<CollectionSet>> = Lazy::new(build_collection_sets);

fn set(
    id: &str,
    name: &str,
    description: &str,
    requirements: Vec<SetRequirement>,
    rewards: Vec<SetReward>,
) -> CollectionSet {
    CollectionSet {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        requirements,
        rewards,
    }
}

fn category(name: &str, count: usize) -> SetRequirement {
    SetRequirement::Category {
        category: name.to_string(),
        count,
    }
}

fn build_collection_sets() -> Vec<CollectionSet> {
    vec![
        set(
            "starter_hand",
            "Starter Hand",
            "Own your first three app cards",
            vec![SetRequirement::MinCount { count: 3 }],
            vec![SetReward::Title("Collector".into())],
        ),
        set(
            "ai_pioneer",
            "AI Pioneer",
            "Back the AI wave",
            vec![
                category("ai", 3),
                SetRequirement::RankAtLeast {
                    rank: Rank::Ten,
                    count: 1,
                },
            ],
            vec![
                SetReward::Title("AI Pioneer".into()),
                SetReward::AirdropBoost(Decimal::from(5)),
            ],
        ),
        set(
            "defi_degen",
            "DeFi Degen",
            "A portfolio of money legos",
            vec![category("defi", 3), SetRequirement::MinValue { usd: Decimal::from(1_000) }],
            vec![
                SetReward::Title("Money Lego".into()),
                SetReward::FeeDiscount(Decimal::from(5)),
            ],
        ),
        set(
            "royal_court",
            "Royal Court",
            "Three face cards or better",
            vec![SetRequirement::RankAtLeast {
                rank: Rank::Jack,
                count: 3,
            }],
            vec![
                SetReward::Title("Royalty".into()),
                SetReward::FeeDiscount(Decimal::from(5)),
                SetReward::CardBack("royal".into()),
            ],
        ),
        set(
            "four_suits",
            "Four Suits",
            "One card of every suit",
            vec![SetRequirement::SuitCount { suits: 4 }],
            vec![SetReward::AirdropBoost(Decimal::from(5))],
        ),
        set(
            "patient_money",
            "Patient Money",
            "Hold three apps for a month",
            vec![SetRequirement::HeldThirtyDays { count: 3 }],
            vec![
                SetReward::Title("Diamond Hands".into()),
                SetReward::AirdropBoost(Decimal::from(10)),
            ],
        ),
        set(
            "high_roller",
            "High Roller",
            "Serious size across the market",
            vec![
                SetRequirement::MinValue { usd: Decimal::from(10_000) },
                SetRequirement::RankAtLeast {
                    rank: Rank::Ace,
                    count: 1,
                },
            ],
            vec![
                SetReward::Title("High Roller".into()),
                SetReward::FeeDiscount(Decimal::from(10)),
            ],
        ),
        set(
            FULL_DECK_SET_ID,
            "Full Deck",
            "Thirteen apps across every suit, topped by an Ace",
            vec![
                SetRequirement::MinCount { count: 13 },
                SetRequirement::SuitCount { suits: 4 },
                SetRequirement::RankAtLeast {
                    rank: Rank::Ace,
                    count: 1,
                },
                category("ai", 1),
                category("defi", 1),
                category("gaming", 1),
                category("social", 1),
            ],
            vec![
                SetReward::Title("Dealer".into()),
                SetReward::FeeDiscount(Decimal::from(10)),
                SetReward::AirdropBoost(Decimal::from(25)),
            ],
        ),
    ]
}

pub fn find_set(id: &str) -> Option<&'static CollectionSet> {
    COLLECTION_SETS.iter().find(|s| s.id == id)
}
