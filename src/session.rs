//! Session state for one game attempt.

use crate::cards::{Card, DeckSlot};
use crate::gateway::{EngineState, ProbabilitySnapshot, StatsSummary};
use crate::navigator::first_active;
use derive_getters::Getters;
use std::ops::RangeInclusive;
use tracing::{info, instrument};

/// Deck counts a game may be started with.
pub const DECK_COUNT_RANGE: RangeInclusive<usize> = 6..=10;

/// Cards in the shared pool; bounds the score.
pub const TOTAL_CARDS: u32 = 52;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display)]
pub enum Phase {
    /// No game dealt.
    #[default]
    NotStarted,
    /// Waiting on the engine to deal.
    Starting,
    /// Accepting selections and guesses.
    Playing,
    /// A guess is in flight or animating; intents are refused.
    Resolving,
    /// Waiting on the engine to discard the game.
    Resetting,
    /// The game has ended; only reset is accepted.
    GameOver,
}

/// The single source of truth for what the player sees.
///
/// Only the controller writes to it.
#[derive(Debug, Clone, PartialEq, Default, Getters)]
pub struct Session {
    /// Lifecycle phase.
    pub(crate) phase: Phase,
    /// Decks dealt at start.
    pub(crate) deck_count: usize,
    /// Authoritative deck slots.
    pub(crate) decks: Vec<DeckSlot>,
    /// Engine-computed score.
    pub(crate) score: u32,
    /// Selected deck; always a live slot when set.
    pub(crate) selected_deck: Option<usize>,
    /// Card revealed by the last resolved guess.
    pub(crate) last_drawn_card: Option<Card>,
    /// Between flip and commit.
    pub(crate) flipping: bool,
    /// Engine's last outcome message.
    pub(crate) message: String,
    /// Last odds received, possibly stale.
    pub(crate) probabilities: ProbabilitySnapshot,
    /// Celebration is showing.
    pub(crate) celebrating: bool,
    /// Meaningful only in [`Phase::GameOver`].
    pub(crate) won: bool,
    /// Refreshed statistics after game over.
    pub(crate) summary: Option<StatsSummary>,
}

impl Session {
    /// Builds the playing session from the engine's deal.
    #[instrument(skip(state), fields(decks = state.decks.len(), score = state.score))]
    pub(crate) fn started(deck_count: usize, state: EngineState) -> Self {
        let selected_deck = first_active(&state.decks);
        info!(?selected_deck, "Session started");
        Self {
            phase: Phase::Playing,
            deck_count,
            decks: state.decks,
            score: state.score,
            selected_deck,
            message: state.message,
            ..Self::default()
        }
    }

    /// Decks still in play.
    pub fn active_deck_count(&self) -> usize {
        self.decks.iter().filter(|slot| slot.is_active()).count()
    }

    /// Cards left in the pool.
    pub fn cards_remaining(&self) -> u32 {
        TOTAL_CARDS.saturating_sub(self.score)
    }

    /// Returns true while a network call or animation holds the session.
    pub fn is_busy(&self) -> bool {
        matches!(
            self.phase,
            Phase::Starting | Phase::Resolving | Phase::Resetting
        )
    }
}
