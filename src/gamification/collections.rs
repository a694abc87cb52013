use std::collections::{BTreeSet, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::leveling::Tier;
use super::sets::{CollectionSet, SetRequirement, SetReward, COLLECTION_SETS, FULL_DECK_SET_ID};
use crate::models::Holding;

pub const MAX_COLLECTION_SCORE: u32 = 1_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementStatus {
    pub requirement: SetRequirement,
    pub description: String,
    pub met: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetProgress {
    pub set_id: String,
    pub name: String,
    pub requirements: Vec<RequirementStatus>,
    pub met: usize,
    pub total: usize,
    /// Percent of requirements met.
    pub progress: Decimal,
    pub is_complete: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionStats {
    pub total_tokens: usize,
    pub total_value: Decimal,
    pub categories: Vec<String>,
    pub sets: Vec<SetProgress>,
    pub completed_sets: usize,
    pub total_sets: usize,
    pub unlocked_card_backs: Vec<String>,
    pub collection_score: u32,
    pub collection_rank: Tier,
    pub titles: Vec<String>,
    /// Sum of fee discounts from completed sets, in percent.
    pub fee_discount: Decimal,
    /// Sum of airdrop boosts from completed sets, in percent.
    pub airdrop_boost: Decimal,
}

// ---------------------------------------------------------------------------
// Set progress
// ---------------------------------------------------------------------------

fn requirement_met(
    requirement: &SetRequirement,
    holdings: &[Holding],
    hold_days: &HashMap<String, u32>,
) -> bool {
    match requirement {
        SetRequirement::Category { category, count } => {
            holdings
                .iter()
                .filter(|h| h.category.eq_ignore_ascii_case(category))
                .count()
                >= *count
        }
        SetRequirement::RankAtLeast { rank, count } => {
            holdings.iter().filter(|h| h.rank >= *rank).count() >= *count
        }
        SetRequirement::MinCount { count } => holdings.len() >= *count,
        SetRequirement::MinValue { usd } => total_value(holdings) >= *usd,
        SetRequirement::SuitCount { suits } => {
            holdings.iter().map(|h| h.suit).collect::<BTreeSet<_>>().len() >= *suits
        }
        SetRequirement::HeldThirtyDays { count } => {
            holdings
                .iter()
                .filter(|h| hold_days.get(&h.token_id).copied().unwrap_or(0) >= 30)
                .count()
                >= *count
        }
    }
}

/// Evaluate every requirement of a set against the current holdings.
pub fn calculate_set_progress(
    set: &CollectionSet,
    holdings: &[Holding],
    hold_days: &HashMap<String, u32>,
) -> SetProgress {
    let requirements: Vec<RequirementStatus> = set
        .requirements
        .iter()
        .map(|req| RequirementStatus {
            requirement: req.clone(),
            description: req.describe(),
            met: requirement_met(req, holdings, hold_days),
        })
        .collect();

    let total = requirements.len();
    let met = requirements.iter().filter(|r| r.met).count();
    let progress = if total == 0 {
        Decimal::ONE_HUNDRED
    } else {
        Decimal::from(met as u64) / Decimal::from(total as u64) * Decimal::ONE_HUNDRED
    };

    SetProgress {
        set_id: set.id.clone(),
        name: set.name.clone(),
        requirements,
        met,
        total,
        progress,
        is_complete: met == total,
    }
}

// ---------------------------------------------------------------------------
// Card backs
// ---------------------------------------------------------------------------

/// Inputs for the card-back gates.
struct BackGates<'a> {
    holdings: usize,
    total_value: Decimal,
    completed_sets: usize,
    total_sets: usize,
    cumulative_hold_days: u64,
    max_multiple: Decimal,
    survived_dumps: u32,
    sets: &'a [SetProgress],
}

fn unlocked_card_backs(g: &BackGates<'_>) -> Vec<String> {
    let full_deck = g
        .sets
        .iter()
        .any(|s| s.set_id == FULL_DECK_SET_ID && s.is_complete);

    let gates: [(bool, &str); 9] = [
        (g.holdings >= 5, "collector"),
        (g.total_value >= Decimal::from(10_000), "high_roller"),
        (g.completed_sets >= 1, "set_master"),
        (g.cumulative_hold_days >= 60, "patient"),
        (g.max_multiple >= Decimal::from(10), "prophet"),
        (g.survived_dumps >= 3, "survivor"),
        (full_deck, "full_deck"),
        (g.max_multiple >= Decimal::ONE_HUNDRED, "moonshot"),
        (g.total_sets > 0 && g.completed_sets == g.total_sets, "completionist"),
    ];

    gates
        .iter()
        .filter(|(unlocked, _)| *unlocked)
        .map(|(_, id)| id.to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Score + rank
// ---------------------------------------------------------------------------

/// Four independently capped components, summed. Always in `[0, 1000]`.
pub fn collection_score(tokens: usize, categories: usize, completed_sets: usize, backs: usize) -> u32 {
    let component = |n: usize, weight: usize, cap: usize| n.saturating_mul(weight).min(cap) as u32;

    component(tokens, 10, 200)
        + component(categories, 50, 200)
        + component(completed_sets, 100, 400)
        + component(backs, 25, 200)
}

/// Minimum score per collector rank, highest first.
const SCORE_TIERS: [(u32, Tier); 6] = [
    (900, Tier::Legend),
    (750, Tier::Grandmaster),
    (600, Tier::Master),
    (400, Tier::Expert),
    (250, Tier::Adept),
    (100, Tier::Apprentice),
];

pub fn collection_rank(score: u32) -> Tier {
    SCORE_TIERS
        .iter()
        .find(|(min, _)| score >= *min)
        .map(|(_, tier)| *tier)
        .unwrap_or(Tier::Novice)
}

/// Sum of holding values, saturating at the `Decimal` range.
fn total_value(holdings: &[Holding]) -> Decimal {
    holdings
        .iter()
        .fold(Decimal::ZERO, |acc, h| acc.saturating_add(h.value))
}

/// Days held summed over the tokens in `holdings`. Entries for tokens no
/// longer held do not count.
fn cumulative_hold_days(holdings: &[Holding], hold_days: &HashMap<String, u32>) -> u64 {
    holdings
        .iter()
        .map(|h| h.token_id.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|id| u64::from(hold_days.get(id).copied().unwrap_or(0)))
        .sum()
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Score a collection against the built-in set catalog.
pub fn calculate_collection_stats(
    holdings: &[Holding],
    hold_days: &HashMap<String, u32>,
    max_multiple: Decimal,
    survived_dumps: u32,
) -> CollectionStats {
    calculate_collection_stats_for(&COLLECTION_SETS, holdings, hold_days, max_multiple, survived_dumps)
}

/// Score a collection against an explicit set catalog.
pub fn calculate_collection_stats_for(
    catalog: &[CollectionSet],
    holdings: &[Holding],
    hold_days: &HashMap<String, u32>,
    max_multiple: Decimal,
    survived_dumps: u32,
) -> CollectionStats {
    let sets: Vec<SetProgress> = catalog
        .iter()
        .map(|set| calculate_set_progress(set, holdings, hold_days))
        .collect();

    let completed_sets = sets.iter().filter(|s| s.is_complete).count();
    let total_sets = sets.len();

    let categories: Vec<String> = holdings
        .iter()
        .map(|h| h.category.to_lowercase())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let value = total_value(holdings);

    let mut unlocked_card_backs = unlocked_card_backs(&BackGates {
        holdings: holdings.len(),
        total_value: value,
        completed_sets,
        total_sets,
        cumulative_hold_days: cumulative_hold_days(holdings, hold_days),
        max_multiple,
        survived_dumps,
        sets: &sets,
    });

    let mut titles = Vec::new();
    let mut fee_discount = Decimal::ZERO;
    let mut airdrop_boost = Decimal::ZERO;

    for (set, progress) in catalog.iter().zip(sets.iter()) {
        if !progress.is_complete {
            continue;
        }
        for reward in &set.rewards {
            match reward {
                SetReward::Title(title) => titles.push(title.clone()),
                SetReward::FeeDiscount(pct) => fee_discount = fee_discount.saturating_add(*pct),
                SetReward::AirdropBoost(pct) => airdrop_boost = airdrop_boost.saturating_add(*pct),
                SetReward::CardBack(id) => {
                    if !unlocked_card_backs.contains(id) {
                        unlocked_card_backs.push(id.clone());
                    }
                }
            }
        }
    }

    let score = collection_score(
        holdings.len(),
        categories.len(),
        completed_sets,
        unlocked_card_backs.len(),
    );

    tracing::debug!(
        holdings = holdings.len(),
        completed_sets,
        score,
        "Collection stats calculated"
    );

    CollectionStats {
        total_tokens: holdings.len(),
        total_value: value,
        categories,
        sets,
        completed_sets,
        total_sets,
        unlocked_card_backs,
        collection_score: score,
        collection_rank: collection_rank(score),
        titles,
        fee_discount,
        airdrop_boost,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
