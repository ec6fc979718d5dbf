//! Turning a guess response into a sequenced state transition.
//!
//! A resolved guess is applied in two steps. [`reveal`] publishes the drawn
//! card so the flip can start; after the presentation delay [`commit`]
//! swaps in the authoritative decks and score in one go, re-evaluates the
//! selection and ticks the hint machine. The controller emits the signals
//! around both steps in a fixed order.

use crate::cards::{Card, DeckSlot};
use crate::gateway::EngineState;
use crate::hints::{HintBudget, HintTick};
use crate::navigator::{Step, next_active};
use crate::session::{Phase, Session};
use tracing::{debug, info, instrument};

/// Engine response held between flip and commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingGuess {
    /// Deck the guess was made on.
    pub(crate) deck: usize,
    /// Authoritative state to commit.
    pub(crate) state: EngineState,
}

/// What a commit changed, for signal emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CommitReport {
    /// The guessed deck is still live.
    pub(crate) deck_survived: bool,
    /// Hint machine outcome for this round.
    pub(crate) hint: HintTick,
    /// The game ended on this guess.
    pub(crate) game_over: bool,
    /// The ended game was won.
    pub(crate) won: bool,
}

impl CommitReport {
    /// Winning transitions into game over celebrate exactly once.
    pub(crate) fn celebrate(&self) -> bool {
        self.game_over && self.won
    }
}

/// Identifies the card a guess drew.
///
/// Prefers the structured `drawnCard` field. Engines that only describe the
/// draw in prose ("Wrong! The card was 6D. ...") are read by taking the code
/// after the last "was "; failing that, the guessed deck's new top card is
/// used when the deck survived.
pub fn extract_drawn_card(state: &EngineState, deck: usize) -> Option<Card> {
    if let Some(card) = state.drawn_card {
        return Some(card);
    }

    let from_message = state.message.rfind("was ").and_then(|at| {
        state.message[at + 4..]
            .split(|c: char| !c.is_ascii_alphanumeric())
            .next()
            .and_then(|code| code.parse::<Card>().ok())
    });
    if from_message.is_some() {
        debug!("Drawn card read from engine message");
        return from_message;
    }

    state.decks.get(deck).and_then(DeckSlot::card)
}

/// Publishes the drawn card and raises the flip flag. Returns the card.
#[instrument(skip(session, pending), fields(deck = pending.deck))]
pub(crate) fn reveal(session: &mut Session, pending: &PendingGuess) -> Option<Card> {
    let card = extract_drawn_card(&pending.state, pending.deck);
    session.last_drawn_card = card;
    session.flipping = true;
    debug!(card = ?card, "Flip started");
    card
}

/// Applies the authoritative state and ticks the hint machine.
#[instrument(skip(session, hints, pending), fields(deck = pending.deck))]
pub(crate) fn commit(
    session: &mut Session,
    hints: &mut HintBudget,
    pending: PendingGuess,
) -> CommitReport {
    let PendingGuess { deck, state } = pending;

    session.decks = state.decks;
    session.score = state.score;
    session.message = state.message;
    session.flipping = false;

    let deck_survived = session.decks.get(deck).is_some_and(DeckSlot::is_active);

    session.selected_deck = match session.selected_deck {
        Some(selected) if session.decks.get(selected).is_some_and(DeckSlot::is_active) => {
            Some(selected)
        }
        Some(selected) => next_active(&session.decks, Some(selected), Step::Forward),
        None => None,
    };

    let hint = hints.tick();

    if state.game_over {
        session.phase = Phase::GameOver;
        session.won = state.won;
        session.selected_deck = None;
        session.celebrating = state.won;
        info!(score = session.score, won = state.won, "Game over");
    } else {
        session.phase = Phase::Playing;
    }

    debug!(
        deck_survived,
        score = session.score,
        selected = ?session.selected_deck,
        "Guess committed"
    );

    CommitReport {
        deck_survived,
        hint,
        game_over: state.game_over,
        won: state.won,
    }
}
