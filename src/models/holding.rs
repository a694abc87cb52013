use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Rank, Suit};

/// One card in a user's collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    pub token_id: String,
    pub symbol: String,
    /// App category, e.g. `ai`, `defi`, `gaming`.
    pub category: String,
    pub rank: Rank,
    pub suit: Suit,
    /// Current USD value of the position.
    pub value: Decimal,
}
