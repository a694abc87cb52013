use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::badges::{merge_badges, qualifying_badges, BadgeFacts, BadgeType};
use crate::models::{Rank, Token};

/// Visual treatment of an evolved card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardEffect {
    None,
    Glow,
    Fire,
    Golden,
    Legendary,
    Ice,
}

impl CardEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardEffect::None => "none",
            CardEffect::Glow => "glow",
            CardEffect::Fire => "fire",
            CardEffect::Golden => "golden",
            CardEffect::Legendary => "legendary",
            CardEffect::Ice => "ice",
        }
    }
}

impl fmt::Display for CardEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A holder's position in one token, as seen at `observed_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingData {
    pub buy_price: Decimal,
    pub hold_days: u32,
    /// 1-based buyer sequence number; 0 when unknown.
    #[serde(default)]
    pub buyer_number: u32,
    /// 1-based rank among holders by value; 0 when unknown.
    #[serde(default)]
    pub holder_value_rank: u32,
    #[serde(default)]
    pub trade_count: u32,
    /// Lowest price the token has traded at; 0 when unknown.
    #[serde(default)]
    pub all_time_low: Decimal,
    #[serde(default = "Utc::now")]
    pub observed_at: DateTime<Utc>,
    /// State returned by the previous evaluation of this holding.
    #[serde(default)]
    pub previous: Option<CardEvolutionState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EvolutionChange {
    RankChanged { from: Rank, to: Rank },
    BadgeEarned { badge: BadgeType },
    EffectChanged { from: CardEffect, to: CardEffect },
}

/// One entry in a card's append-only evolution log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionEvent {
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub change: EvolutionChange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardEvolutionState {
    pub token_id: String,
    pub base_rank: Rank,
    pub evolved_rank: Rank,
    pub rank_change: i32,
    pub effect: CardEffect,
    pub badges: Vec<BadgeType>,
    pub price_multiple: Decimal,
    pub buy_price: Decimal,
    pub current_price: Decimal,
    pub hold_days: u32,
    pub evolution_history: Vec<EvolutionEvent>,
}

// ---------------------------------------------------------------------------
// Rank
// ---------------------------------------------------------------------------

/// Minimum score per rank, highest first. Anything under 10 is a Two.
const SCORE_RANKS: [(i64, Rank); 12] = [
    (95, Rank::Ace),
    (90, Rank::King),
    (85, Rank::Queen),
    (80, Rank::Jack),
    (70, Rank::Ten),
    (60, Rank::Nine),
    (50, Rank::Eight),
    (40, Rank::Seven),
    (30, Rank::Six),
    (20, Rank::Five),
    (15, Rank::Four),
    (10, Rank::Three),
];

pub fn base_rank(score: Decimal) -> Rank {
    SCORE_RANKS
        .iter()
        .find(|(min_score, _)| score >= Decimal::from(*min_score))
        .map(|(_, rank)| *rank)
        .unwrap_or(Rank::Two)
}

/// Gains, as (minimum multiple in hundredths, rank steps). Most extreme
/// first: a 60x card matches the 50x tier and stops there.
const MULTIPLE_GAINS: [(i64, i32); 5] = [(10_000, 5), (5_000, 4), (1_000, 3), (500, 2), (200, 1)];

/// Losses, as (maximum multiple in hundredths, rank steps). Most extreme first.
const MULTIPLE_LOSSES: [(i64, i32); 3] = [(10, -3), (25, -2), (50, -1)];

/// Rank steps earned (or lost) for a price multiple. Exactly one tier applies.
pub fn rank_change(price_multiple: Decimal) -> i32 {
    let hundredths = price_multiple.saturating_mul(Decimal::ONE_HUNDRED);

    if let Some((_, steps)) = MULTIPLE_GAINS
        .iter()
        .find(|(min, _)| hundredths >= Decimal::from(*min))
    {
        return *steps;
    }

    MULTIPLE_LOSSES
        .iter()
        .find(|(max, _)| hundredths <= Decimal::from(*max))
        .map(|(_, steps)| *steps)
        .unwrap_or(0)
}

/// Shift a rank by `steps`, saturating at Two and Ace.
pub fn evolve_rank(base: Rank, steps: i32) -> Rank {
    Rank::from_index(base.index() as i64 + i64::from(steps))
}

// ---------------------------------------------------------------------------
// Effect
// ---------------------------------------------------------------------------

/// Pick the card effect. Rules are tried in priority order; first match wins.
pub fn card_effect(price_multiple: Decimal, badges: &[BadgeType]) -> CardEffect {
    let has = |badge: BadgeType| badges.contains(&badge);

    if has(BadgeType::Moonshot) {
        CardEffect::Legendary
    } else if has(BadgeType::DiamondHands) && price_multiple >= Decimal::from(10) {
        CardEffect::Golden
    } else if price_multiple >= Decimal::ONE_HUNDRED {
        CardEffect::Legendary
    } else if price_multiple >= Decimal::from(25) {
        CardEffect::Fire
    } else if price_multiple >= Decimal::from(10) {
        CardEffect::Golden
    } else if price_multiple >= Decimal::from(2) {
        CardEffect::Glow
    } else if has(BadgeType::Survivor) {
        CardEffect::Ice
    } else {
        CardEffect::None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvolutionGradient {
    pub from: &'static str,
    pub to: &'static str,
}

/// Border gradient colours for a card effect.
pub fn evolution_gradient(effect: CardEffect) -> EvolutionGradient {
    let (from, to) = match effect {
        CardEffect::Legendary => ("#f59e0b", "#ec4899"),
        CardEffect::Golden => ("#fbbf24", "#d97706"),
        CardEffect::Fire => ("#ef4444", "#f97316"),
        CardEffect::Glow => ("#a78bfa", "#6366f1"),
        CardEffect::Ice => ("#67e8f9", "#3b82f6"),
        CardEffect::None => ("#374151", "#1f2937"),
    };
    EvolutionGradient { from, to }
}

// ---------------------------------------------------------------------------
// Evolution
// ---------------------------------------------------------------------------

/// Events separating two snapshots of the same card.
///
/// Without a previous snapshot the card is compared against its unevolved
/// self: base rank, no badges, no effect. Transitions into `None` are not
/// logged.
pub fn diff_evolution(
    previous: Option<&CardEvolutionState>,
    next: &CardEvolutionState,
    at: DateTime<Utc>,
) -> Vec<EvolutionEvent> {
    let mut events = Vec::new();

    let prev_rank = previous.map(|p| p.evolved_rank).unwrap_or(next.base_rank);
    if prev_rank != next.evolved_rank {
        events.push(EvolutionEvent {
            at,
            change: EvolutionChange::RankChanged {
                from: prev_rank,
                to: next.evolved_rank,
            },
        });
    }

    let prev_badges: &[BadgeType] = previous.map(|p| p.badges.as_slice()).unwrap_or(&[]);
    for badge in next.badges.iter().filter(|b| !prev_badges.contains(b)) {
        events.push(EvolutionEvent {
            at,
            change: EvolutionChange::BadgeEarned { badge: *badge },
        });
    }

    let prev_effect = previous.map(|p| p.effect).unwrap_or(CardEffect::None);
    if next.effect != prev_effect && next.effect != CardEffect::None {
        events.push(EvolutionEvent {
            at,
            change: EvolutionChange::EffectChanged {
                from: prev_effect,
                to: next.effect,
            },
        });
    }

    events
}

/// Current price over buy price; 0 when the buy price is not positive.
/// Saturates at the `Decimal` range for dust buy prices.
pub fn price_multiple(current_price: Decimal, buy_price: Decimal) -> Decimal {
    if buy_price <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    current_price.checked_div(buy_price).unwrap_or(if current_price.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    })
}

/// Evaluate a holder's card: rank, badges, effect and history.
///
/// Badges and history carried in `holding.previous` are kept as-is; this
/// only ever adds to them.
pub fn calculate_evolution(token: &Token, holding: &HoldingData) -> CardEvolutionState {
    let previous = holding.previous.as_ref();

    let price_multiple = price_multiple(token.price, holding.buy_price);

    let base = base_rank(token.score);
    let steps = rank_change(price_multiple);
    let evolved = evolve_rank(base, steps);

    let qualifying = qualifying_badges(&BadgeFacts {
        price_multiple,
        hold_days: holding.hold_days,
        buyer_number: holding.buyer_number,
        holder_value_rank: holding.holder_value_rank,
        trade_count: holding.trade_count,
        buy_price: holding.buy_price,
        all_time_low: holding.all_time_low,
    });
    let existing: &[BadgeType] = previous.map(|p| p.badges.as_slice()).unwrap_or(&[]);
    let badges = merge_badges(existing, &qualifying);

    let effect = card_effect(price_multiple, &badges);

    let mut state = CardEvolutionState {
        token_id: token.id.clone(),
        base_rank: base,
        evolved_rank: evolved,
        rank_change: steps,
        effect,
        badges,
        price_multiple,
        buy_price: holding.buy_price,
        current_price: token.price,
        hold_days: holding.hold_days,
        evolution_history: Vec::new(),
    };

    let events = diff_evolution(previous, &state, holding.observed_at);

    tracing::debug!(
        token_id = %token.id,
        base_rank = %base,
        evolved_rank = %evolved,
        effect = %effect,
        new_events = events.len(),
        "Card evolution calculated"
    );

    let mut history = previous
        .map(|p| p.evolution_history.clone())
        .unwrap_or_default();
    history.extend(events);
    state.evolution_history = history;

    state
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn token(price: i64, score: i64) -> Token {
        Token {
            id: "tok_vibe".to_string(),
            price: Decimal::from(price),
            score: Decimal::from(score),
        }
    }

    fn holding(buy_price: i64, hold_days: u32) -> HoldingData {
        HoldingData {
            buy_price: Decimal::from(buy_price),
            hold_days,
            buyer_number: 5_000,
            holder_value_rank: 500,
            trade_count: 1,
            all_time_low: Decimal::ZERO,
            observed_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            previous: None,
        }
    }

    #[test]
    fn test_base_rank_breakpoints() {
        assert_eq!(base_rank(Decimal::from(100)), Rank::Ace);
        assert_eq!(base_rank(Decimal::from(95)), Rank::Ace);
        assert_eq!(base_rank(Decimal::new(9499, 2)), Rank::King);
        assert_eq!(base_rank(Decimal::from(80)), Rank::Jack);
        assert_eq!(base_rank(Decimal::from(70)), Rank::Ten);
        assert_eq!(base_rank(Decimal::from(65)), Rank::Nine);
        assert_eq!(base_rank(Decimal::from(15)), Rank::Four);
        assert_eq!(base_rank(Decimal::from(10)), Rank::Three);
        assert_eq!(base_rank(Decimal::from(9)), Rank::Two);
        assert_eq!(base_rank(Decimal::ZERO), Rank::Two);
    }

    #[test]
    fn test_rank_change_tiers() {
        assert_eq!(rank_change(Decimal::from(150)), 5);
        assert_eq!(rank_change(Decimal::from(60)), 4);
        assert_eq!(rank_change(Decimal::from(12)), 3);
        assert_eq!(rank_change(Decimal::from(5)), 2);
        assert_eq!(rank_change(Decimal::from(2)), 1);
        assert_eq!(rank_change(Decimal::new(19, 1)), 0);
        assert_eq!(rank_change(Decimal::ONE), 0);
        assert_eq!(rank_change(Decimal::new(51, 2)), 0);
        assert_eq!(rank_change(Decimal::new(5, 1)), -1);
        assert_eq!(rank_change(Decimal::new(25, 2)), -2);
        assert_eq!(rank_change(Decimal::new(1, 1)), -3);
        assert_eq!(rank_change(Decimal::ZERO), -3);
    }

    #[test]
    fn test_evolve_rank_clamps() {
        assert_eq!(evolve_rank(Rank::Ace, 999), Rank::Ace);
        assert_eq!(evolve_rank(Rank::Two, -999), Rank::Two);
        assert_eq!(evolve_rank(Rank::Ten, 3), Rank::King);
        assert_eq!(evolve_rank(Rank::Three, -3), Rank::Two);
    }

    #[test]
    fn test_effect_priority() {
        assert_eq!(
            card_effect(Decimal::ONE, &[BadgeType::Moonshot]),
            CardEffect::Legendary
        );
        assert_eq!(
            card_effect(Decimal::from(30), &[BadgeType::DiamondHands]),
            CardEffect::Golden
        );
        assert_eq!(card_effect(Decimal::from(30), &[]), CardEffect::Fire);
        assert_eq!(card_effect(Decimal::from(3), &[BadgeType::Survivor]), CardEffect::Glow);
        assert_eq!(card_effect(Decimal::ONE, &[BadgeType::Survivor]), CardEffect::Ice);
        assert_eq!(card_effect(Decimal::ONE, &[]), CardEffect::None);
    }

    #[test]
    fn test_diamond_hands_prophet_card() {
        // 12x with a 31-day hold
        let state = calculate_evolution(&token(12, 72), &holding(1, 31));

        assert_eq!(state.rank_change, 3);
        assert_eq!(state.base_rank, Rank::Ten);
        assert_eq!(state.evolved_rank, Rank::King);
        assert!(state.badges.contains(&BadgeType::DiamondHands));
        assert!(state.badges.contains(&BadgeType::Prophet));
        assert_eq!(state.effect, CardEffect::Golden);
    }

    #[test]
    fn test_first_evaluation_history() {
        let state = calculate_evolution(&token(12, 72), &holding(1, 31));
        let changes: Vec<&EvolutionChange> =
            state.evolution_history.iter().map(|e| &e.change).collect();

        assert_eq!(
            changes,
            vec![
                &EvolutionChange::RankChanged {
                    from: Rank::Ten,
                    to: Rank::King
                },
                &EvolutionChange::BadgeEarned {
                    badge: BadgeType::DiamondHands
                },
                &EvolutionChange::BadgeEarned {
                    badge: BadgeType::Prophet
                },
                &EvolutionChange::EffectChanged {
                    from: CardEffect::None,
                    to: CardEffect::Golden
                },
            ]
        );
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let first = calculate_evolution(&token(12, 72), &holding(1, 31));
        let mut again = holding(1, 31);
        again.previous = Some(first.clone());

        let second = calculate_evolution(&token(12, 72), &again);
        assert_eq!(second.badges, first.badges);
        assert_eq!(second.evolution_history, first.evolution_history);
    }

    #[test]
    fn test_badges_survive_price_crash() {
        let first = calculate_evolution(&token(12, 72), &holding(1, 31));

        let mut later = holding(1, 31);
        later.observed_at += Duration::days(7);
        later.previous = Some(first.clone());
        let crashed = calculate_evolution(&Token { price: Decimal::new(4, 1), ..token(0, 72) }, &later);

        assert!(crashed.badges.contains(&BadgeType::Prophet));
        assert_eq!(crashed.rank_change, -1);
        assert_eq!(crashed.evolved_rank, Rank::Nine);
        // Prior history is an untouched prefix
        assert_eq!(
            &crashed.evolution_history[..first.evolution_history.len()],
            first.evolution_history.as_slice()
        );
        let appended = &crashed.evolution_history[first.evolution_history.len()..];
        assert_eq!(
            appended[0].change,
            EvolutionChange::RankChanged {
                from: Rank::King,
                to: Rank::Nine
            }
        );
    }

    #[test]
    fn test_survivor_is_carried_not_awarded() {
        let plain = calculate_evolution(&token(1, 50), &holding(1, 1));
        assert!(!plain.badges.contains(&BadgeType::Survivor));
        assert_eq!(plain.effect, CardEffect::None);
        assert!(plain.evolution_history.is_empty());

        let mut seeded = plain.clone();
        seeded.badges.push(BadgeType::Survivor);
        let mut h = holding(1, 1);
        h.previous = Some(seeded);

        let state = calculate_evolution(&token(1, 50), &h);
        assert!(state.badges.contains(&BadgeType::Survivor));
        assert_eq!(state.effect, CardEffect::Ice);
    }

    #[test]
    fn test_zero_buy_price() {
        let state = calculate_evolution(&token(5, 50), &holding(0, 0));
        assert_eq!(state.price_multiple, Decimal::ZERO);
        assert_eq!(state.rank_change, -3);
    }

    #[test]
    fn test_dust_buy_price_saturates() {
        let t = Token {
            price: Decimal::from_i128_with_scale(79_000_000_000_000_000_000_000_000_000, 0),
            ..token(1, 50)
        };
        let mut h = holding(1, 0);
        h.buy_price = Decimal::new(1, 10);

        let state = calculate_evolution(&t, &h);
        assert_eq!(state.price_multiple, Decimal::MAX);
        assert_eq!(state.rank_change, 5);
        assert_eq!(state.effect, CardEffect::Legendary);
    }

    #[test]
    fn test_gradient_per_effect() {
        assert_eq!(evolution_gradient(CardEffect::Ice).from, "#67e8f9");
        assert_ne!(
            evolution_gradient(CardEffect::Fire),
            evolution_gradient(CardEffect::Golden)
        );
    }
}
