//! Card codes and deck slots as the engine reports them.
//!
//! The engine speaks in short codes: a rank followed by a suit letter
//! (`"AS"`, `"10H"`, `"QD"`), with `"XX"` standing in for a deck that has
//! been eliminated. Inside the crate those codes become [`Card`] and
//! [`DeckSlot`], so an eliminated deck can never be mistaken for a card.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{EnumIter, EnumString, IntoStaticStr};

/// Wire code the engine uses for an eliminated deck.
pub const ELIMINATED_CODE: &str = "XX";

/// Card rank, ace low.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    EnumString,
    IntoStaticStr,
    strum::Display,
)]
#[strum(ascii_case_insensitive)]
pub enum Rank {
    /// Ace (1).
    #[strum(serialize = "A")]
    Ace,
    /// Two.
    #[strum(serialize = "2")]
    Two,
    /// Three.
    #[strum(serialize = "3")]
    Three,
    /// Four.
    #[strum(serialize = "4")]
    Four,
    /// Five.
    #[strum(serialize = "5")]
    Five,
    /// Six.
    #[strum(serialize = "6")]
    Six,
    /// Seven.
    #[strum(serialize = "7")]
    Seven,
    /// Eight.
    #[strum(serialize = "8")]
    Eight,
    /// Nine.
    #[strum(serialize = "9")]
    Nine,
    /// Ten.
    #[strum(serialize = "10")]
    Ten,
    /// Jack (11).
    #[strum(serialize = "J")]
    Jack,
    /// Queen (12).
    #[strum(serialize = "Q")]
    Queen,
    /// King (13).
    #[strum(serialize = "K")]
    King,
}

impl Rank {
    /// Numeric value used by the engine when comparing cards (ace = 1, king = 13).
    pub fn value(self) -> u8 {
        self as u8 + 1
    }
}

/// Card suit.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    EnumString,
    IntoStaticStr,
    strum::Display,
)]
#[strum(ascii_case_insensitive)]
pub enum Suit {
    /// Spades.
    #[strum(serialize = "S")]
    Spades,
    /// Hearts.
    #[strum(serialize = "H")]
    Hearts,
    /// Diamonds.
    #[strum(serialize = "D")]
    Diamonds,
    /// Clubs.
    #[strum(serialize = "C")]
    Clubs,
}

/// A single playing card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display("{}{}", rank, suit)]
#[serde(try_from = "String", into = "String")]
pub struct Card {
    /// Card rank.
    pub rank: Rank,
    /// Card suit.
    pub suit: Suit,
}

impl Card {
    /// Creates a card from rank and suit.
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }
}

impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let code = code.trim();
        let split = code
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .filter(|i| *i > 0)
            .ok_or_else(|| CardParseError::new(format!("card code too short: {:?}", code)))?;
        let (rank, suit) = code.split_at(split);

        let rank = Rank::from_str(rank)
            .map_err(|_| CardParseError::new(format!("unknown rank in {:?}", code)))?;
        let suit = Suit::from_str(suit)
            .map_err(|_| CardParseError::new(format!("unknown suit in {:?}", code)))?;

        Ok(Self { rank, suit })
    }
}

impl TryFrom<String> for Card {
    type Error = CardParseError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        code.parse()
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.to_string()
    }
}

/// One of the player's parallel card piles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DeckSlot {
    /// The deck is live, showing this card on top.
    Active(Card),
    /// The deck was lost to a wrong guess.
    Eliminated,
}

impl DeckSlot {
    /// Returns true while the deck can still be played.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    /// Returns true once the deck has been eliminated.
    pub fn is_eliminated(&self) -> bool {
        matches!(self, Self::Eliminated)
    }

    /// Top card of a live deck.
    pub fn card(&self) -> Option<Card> {
        match self {
            Self::Active(card) => Some(*card),
            Self::Eliminated => None,
        }
    }
}

impl std::fmt::Display for DeckSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active(card) => write!(f, "{}", card),
            Self::Eliminated => f.write_str(ELIMINATED_CODE),
        }
    }
}

impl FromStr for DeckSlot {
    type Err = CardParseError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        if code.trim().eq_ignore_ascii_case(ELIMINATED_CODE) {
            Ok(Self::Eliminated)
        } else {
            code.parse().map(Self::Active)
        }
    }
}

impl TryFrom<String> for DeckSlot {
    type Error = CardParseError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        code.parse()
    }
}

impl From<DeckSlot> for String {
    fn from(slot: DeckSlot) -> Self {
        slot.to_string()
    }
}

/// Failure to read a card code.
#[derive(Debug, Clone, Display, Error)]
#[display("Card parse error: {} at {}:{}", message, file, line)]
pub struct CardParseError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl CardParseError {
    /// Creates a new parse error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
