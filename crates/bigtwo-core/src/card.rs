// Card model: ranks, suits and the wire representation of a card.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Card rank in Big Two order. Three is the lowest, Two the highest.
///
/// Serialized as the bare integer the server uses (3..=15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Rank {
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
    Two = 15,
}

impl Rank {
    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            3 => Some(Rank::Three),
            4 => Some(Rank::Four),
            5 => Some(Rank::Five),
            6 => Some(Rank::Six),
            7 => Some(Rank::Seven),
            8 => Some(Rank::Eight),
            9 => Some(Rank::Nine),
            10 => Some(Rank::Ten),
            11 => Some(Rank::Jack),
            12 => Some(Rank::Queen),
            13 => Some(Rank::King),
            14 => Some(Rank::Ace),
            15 => Some(Rank::Two),
            _ => None,
        }
    }

    pub const fn value(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Rank {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rank::from_value(value).ok_or_else(|| format!("rank {value} outside 3..=15"))
    }
}

impl From<Rank> for u8 {
    fn from(rank: Rank) -> u8 {
        rank.value()
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Jack => f.write_str("J"),
            Rank::Queen => f.write_str("Q"),
            Rank::King => f.write_str("K"),
            Rank::Ace => f.write_str("A"),
            Rank::Two => f.write_str("2"),
            other => write!(f, "{}", other.value()),
        }
    }
}

/// Card suit. The numeric order is also the Big Two suit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Suit {
    Diamonds = 0,
    Clubs = 1,
    Hearts = 2,
    Spades = 3,
}

impl Suit {
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Suit::Diamonds),
            1 => Some(Suit::Clubs),
            2 => Some(Suit::Hearts),
            3 => Some(Suit::Spades),
            _ => None,
        }
    }

    pub const fn index(self) -> u8 {
        self as u8
    }

    pub const fn is_red(self) -> bool {
        matches!(self, Suit::Diamonds | Suit::Hearts)
    }
}

impl TryFrom<u8> for Suit {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Suit::from_index(value).ok_or_else(|| format!("suit {value} outside 0..=3"))
    }
}

impl From<Suit> for u8 {
    fn from(suit: Suit) -> u8 {
        suit.index()
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Suit::Diamonds => "♦",
            Suit::Clubs => "♣",
            Suit::Hearts => "♥",
            Suit::Spades => "♠",
        };
        f.write_str(symbol)
    }
}

/// A single playing card. `{"rank": 14, "suit": 3}` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// Server hand-type codes. Only used for labelling when the server omits
/// `handTypeString`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandKind {
    Single,
    Pair,
    Triple,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

impl HandKind {
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(HandKind::Single),
            2 => Some(HandKind::Pair),
            3 => Some(HandKind::Triple),
            4 => Some(HandKind::Straight),
            5 => Some(HandKind::Flush),
            6 => Some(HandKind::FullHouse),
            7 => Some(HandKind::FourOfAKind),
            8 => Some(HandKind::StraightFlush),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            HandKind::Single => "Single",
            HandKind::Pair => "Pair",
            HandKind::Triple => "Triple",
            HandKind::Straight => "Straight",
            HandKind::Flush => "Flush",
            HandKind::FullHouse => "Full House",
            HandKind::FourOfAKind => "Four of a Kind",
            HandKind::StraightFlush => "Straight Flush",
        }
    }
}
