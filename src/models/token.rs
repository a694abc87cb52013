use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Current market snapshot of an app token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub id: String,
    pub price: Decimal,
    /// Performance score in `[0, 100]`; drives the card's base rank.
    pub score: Decimal,
}
