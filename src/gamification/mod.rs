pub mod badges;
pub mod collections;
pub mod evolution;
pub mod leveling;
pub mod sets;

pub use badges::{BadgeInfo, BadgeType};
pub use collections::{
    calculate_collection_stats, calculate_set_progress, CollectionStats, SetProgress,
};
pub use evolution::{
    calculate_evolution, evolve_rank, CardEffect, CardEvolutionState, EvolutionEvent, HoldingData,
};
pub use leveling::{calculate_level, level_progress, xp_to_next_level, LevelInfo, Tier, UserLevel};
pub use sets::{CollectionSet, SetRequirement, SetReward, COLLECTION_SETS};
