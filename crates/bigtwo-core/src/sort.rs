// Hand ordering preference and the two total orders over cards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::card::Card;

/// How the local hand is ordered. Persisted as `"rank"` / `"suit"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortPreference {
    /// Rank ascending, then suit ascending.
    #[default]
    #[serde(rename = "rank")]
    ByRank,
    /// Suit ascending, then rank ascending.
    #[serde(rename = "suit")]
    BySuit,
}

impl SortPreference {
    pub fn toggled(self) -> Self {
        match self {
            SortPreference::ByRank => SortPreference::BySuit,
            SortPreference::BySuit => SortPreference::ByRank,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortPreference::ByRank => "rank",
            SortPreference::BySuit => "suit",
        }
    }
}

impl fmt::Display for SortPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rank" => Ok(SortPreference::ByRank),
            "suit" => Ok(SortPreference::BySuit),
            other => Err(format!("unknown sort preference `{other}` (expected rank or suit)")),
        }
    }
}

/// Sort `hand` in place according to `preference`.
///
/// (rank, suit) pairs are unique within a hand, so both orders are total and
/// the result does not depend on the incoming order.
pub fn sort_hand(hand: &mut [Card], preference: SortPreference) {
    match preference {
        SortPreference::ByRank => hand.sort_by_key(|c| (c.rank, c.suit)),
        SortPreference::BySuit => hand.sort_by_key(|c| (c.suit, c.rank)),
    }
}

/// Whether `hand` is already in `preference` order.
pub fn is_sorted(hand: &[Card], preference: SortPreference) -> bool {
    hand.windows(2).all(|pair| match preference {
        SortPreference::ByRank => (pair[0].rank, pair[0].suit) <= (pair[1].rank, pair[1].suit),
        SortPreference::BySuit => (pair[0].suit, pair[0].rank) <= (pair[1].suit, pair[1].rank),
    })
}
