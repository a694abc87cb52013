use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_LEVEL: u32 = 50;
/// XP per prestige level once the level cap is reached.
pub const PRESTIGE_XP: u64 = 10_000;

/// Level bracket, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Novice,
    Apprentice,
    Adept,
    Expert,
    Master,
    Grandmaster,
    Legend,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Novice => "Novice",
            Tier::Apprentice => "Apprentice",
            Tier::Adept => "Adept",
            Tier::Expert => "Expert",
            Tier::Master => "Master",
            Tier::Grandmaster => "Grandmaster",
            Tier::Legend => "Legend",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the level table.
#[derive(Debug, Clone, Serialize)]
pub struct LevelInfo {
    pub level: u32,
    pub tier: Tier,
    /// XP needed to go from the previous level to this one.
    pub xp_required: u64,
    /// Cumulative XP needed to reach this level.
    pub total_xp_required: u64,
    pub unlocks: Vec<&'static str>,
}

/// A user's resolved level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLevel {
    pub level: u32,
    /// Progress within the current level (or prestige level at the cap).
    pub current_xp: u64,
    pub total_xp: u64,
    pub tier: Tier,
    pub prestige: u64,
}

/// XP cost and tier for each level range: (last level in range, xp per level, tier).
const LEVEL_BRACKETS: [(u32, u64, Tier); 7] = [
    (5, 100, Tier::Novice),
    (10, 250, Tier::Apprentice),
    (20, 500, Tier::Adept),
    (30, 1_000, Tier::Expert),
    (40, 1_500, Tier::Master),
    (45, 2_000, Tier::Grandmaster),
    (50, 2_500, Tier::Legend),
];

const MILESTONE_UNLOCKS: [(u32, &[&str]); 10] = [
    (1, &["trading", "portfolio"]),
    (3, &["daily_quests"]),
    (5, &["card_battles"]),
    (10, &["vibe_staking", "custom_card_backs"]),
    (15, &["leaderboards"]),
    (20, &["collection_sets", "battle_wagers"]),
    (25, &["animated_cards"]),
    (30, &["creator_tools"]),
    (40, &["tournament_hosting"]),
    (50, &["legend_frame", "prestige"]),
];

/// Level table, built once on first use and never mutated.
pub static LEVEL_TABLE: Lazy<Vec<LevelInfo>> = Lazy::new(build_level_table);

/// Generate the 50-row level table.
pub fn build_level_table() -> Vec<LevelInfo> {
    let mut table = Vec::with_capacity(MAX_LEVEL as usize);
    let mut total_xp_required = 0u64;

    for level in 1..=MAX_LEVEL {
        let (xp_required, tier) = LEVEL_BRACKETS
            .iter()
            .find(|(last, _, _)| level <= *last)
            .map(|(_, xp, tier)| (*xp, *tier))
            .unwrap_or((2_500, Tier::Legend));

        total_xp_required += xp_required;

        let unlocks = MILESTONE_UNLOCKS
            .iter()
            .find(|(milestone, _)| *milestone == level)
            .map(|(_, features)| features.to_vec())
            .unwrap_or_default();

        table.push(LevelInfo {
            level,
            tier,
            xp_required,
            total_xp_required,
            unlocks,
        });
    }

    table
}

/// Table row for a level in `1..=50`.
pub fn level_info(level: u32) -> Option<&'static LevelInfo> {
    if level == 0 {
        return None;
    }
    LEVEL_TABLE.get(level as usize - 1)
}

/// Resolve a user's level from cumulative XP.
///
/// Walks the table in order, consuming each level's `xp_required` while the
/// remainder still covers it. The last fully consumed level is the current
/// level (never below 1); the leftover is `current_xp`. At the cap, XP past
/// level 50's cumulative requirement counts toward prestige.
pub fn calculate_level(total_xp: u64) -> UserLevel {
    let mut level = 1;
    let mut remaining = total_xp;

    for info in LEVEL_TABLE.iter() {
        if remaining < info.xp_required {
            break;
        }
        remaining -= info.xp_required;
        level = info.level;
    }

    if level >= MAX_LEVEL {
        let cap = &LEVEL_TABLE[MAX_LEVEL as usize - 1];
        let prestige_xp = total_xp - cap.total_xp_required;
        return UserLevel {
            level: MAX_LEVEL,
            current_xp: prestige_xp % PRESTIGE_XP,
            total_xp,
            tier: Tier::Legend,
            prestige: prestige_xp / PRESTIGE_XP,
        };
    }

    UserLevel {
        level,
        current_xp: remaining,
        total_xp,
        tier: LEVEL_TABLE[level as usize - 1].tier,
        prestige: 0,
    }
}

/// XP earned toward the next level (or prestige level), and the XP that
/// step costs.
///
/// Level 1 spans the first two table rows: consuming row 1 alone leaves the
/// scan at level 1, so progress is measured on total XP against level 2's
/// cumulative requirement.
fn level_span(user: &UserLevel) -> (u64, u64) {
    if user.level >= MAX_LEVEL {
        return (user.current_xp, PRESTIGE_XP);
    }
    if user.level <= 1 {
        let required = level_info(2)
            .map(|info| info.total_xp_required)
            .unwrap_or(PRESTIGE_XP);
        return (user.total_xp, required);
    }
    let required = level_info(user.level + 1)
        .map(|info| info.xp_required)
        .unwrap_or(PRESTIGE_XP);
    (user.current_xp, required)
}

/// Percent progress toward the next level, in `[0, 100)`.
pub fn level_progress(user: &UserLevel) -> Decimal {
    let (earned, required) = level_span(user);
    let progress = Decimal::from(earned) / Decimal::from(required) * Decimal::ONE_HUNDRED;
    progress.min(Decimal::ONE_HUNDRED)
}

pub fn xp_to_next_level(user: &UserLevel) -> u64 {
    let (earned, required) = level_span(user);
    required.saturating_sub(earned)
}

/// Every feature unlocked at or below `level`.
pub fn unlocks_through(level: u32) -> Vec<&'static str> {
    LEVEL_TABLE
        .iter()
        .take_while(|info| info.level <= level)
        .flat_map(|info| info.unlocks.iter().copied())
        .collect()
}

// ---------------------------------------------------------------------------
// XP awards
// ---------------------------------------------------------------------------

/// Activities that grant XP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XpSource {
    FirstTrade,
    Trade,
    DailyLogin,
    QuestComplete,
    AchievementUnlock,
    BattleWin,
    BattleLoss,
    SetComplete,
}

impl XpSource {
    pub fn xp(&self) -> u64 {
        match self {
            XpSource::FirstTrade => 100,
            XpSource::Trade => 10,
            XpSource::DailyLogin => 5,
            XpSource::QuestComplete => 50,
            XpSource::AchievementUnlock => 75,
            XpSource::BattleWin => 25,
            XpSource::BattleLoss => 5,
            XpSource::SetComplete => 200,
        }
    }
}

/// Outcome of granting XP.
#[derive(Debug, Clone, Serialize)]
pub struct LevelUp {
    pub xp_gained: u64,
    pub before: UserLevel,
    pub after: UserLevel,
    pub levels_gained: u32,
    pub prestige_gained: u64,
    /// Features unlocked by the levels crossed.
    pub unlocked: Vec<&'static str>,
}

pub fn award_xp(total_xp: u64, source: XpSource) -> LevelUp {
    let xp_gained = source.xp();
    let before = calculate_level(total_xp);
    let after = calculate_level(total_xp.saturating_add(xp_gained));

    let unlocked: Vec<&'static str> = LEVEL_TABLE
        .iter()
        .filter(|info| info.level > before.level && info.level <= after.level)
        .flat_map(|info| info.unlocks.iter().copied())
        .collect();

    let levels_gained = after.level - before.level;
    let prestige_gained = after.prestige - before.prestige;

    if levels_gained > 0 {
        tracing::debug!(
            from = before.level,
            to = after.level,
            unlocked = unlocked.len(),
            "Level up"
        );
    }

    LevelUp {
        xp_gained,
        before,
        after,
        levels_gained,
        prestige_gained,
        unlocked,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
