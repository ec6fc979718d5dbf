//! Outputs for presentation layers: animation, sound and notices.

use crate::cards::{Card, DeckSlot};
use crate::gateway::{ProbabilitySnapshot, StatsSummary};

/// Sound a presentation layer should play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum SoundCue {
    /// Card turned over.
    CardFlip,
    /// Guess was right.
    Correct,
    /// Guess was wrong; a deck fell.
    Wrong,
    /// Game won.
    Victory,
    /// Game lost.
    GameOver,
    /// Deck selected.
    Select,
    /// Hint activated.
    Hint,
}

/// Event emitted by the controller, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// A new game was dealt.
    SessionStarted {
        /// Dealt decks.
        decks: Vec<DeckSlot>,
        /// Opening score.
        score: u32,
        /// Initial selection.
        selected_deck: Option<usize>,
    },
    /// Selection moved.
    SelectionChanged {
        /// Newly selected deck.
        selected_deck: Option<usize>,
    },
    /// Start the flip animation for the drawn card.
    Flip {
        /// Card to reveal, when it could be identified.
        card: Option<Card>,
    },
    /// Authoritative state applied after the presentation delay.
    Committed {
        /// Decks after the guess.
        decks: Vec<DeckSlot>,
        /// Score after the guess.
        score: u32,
        /// Selection after re-evaluation.
        selected_deck: Option<usize>,
    },
    /// Engine's outcome text.
    Message(String),
    /// A hint became visible.
    HintActivated {
        /// Hints left after this one.
        hints_remaining: u32,
        /// Rounds this hint lasts.
        rounds_remaining: u32,
    },
    /// The running hint ran out.
    HintExpired,
    /// Fresh odds arrived.
    ProbabilitiesUpdated(ProbabilitySnapshot),
    /// Show the win celebration.
    Celebrate,
    /// Remove the win celebration.
    CelebrationCleared,
    /// Game result handed to the statistics service.
    PersistResult {
        /// Final score.
        score: u32,
        /// Decks played.
        deck_count: usize,
        /// Outcome.
        won: bool,
    },
    /// Post-game statistics.
    Summary(StatsSummary),
    /// Session cleared after reset.
    SessionReset,
    /// Credential rejected; the player must sign in again.
    ReauthRequired,
    /// Player-facing notice (validation or failure).
    Notice(String),
    /// Sound to play.
    Sound(SoundCue),
}
