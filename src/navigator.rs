//! Deck selection over a row of slots, skipping eliminated decks.

use crate::cards::DeckSlot;
use tracing::{debug, instrument};

/// Direction of a selection step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Next deck to the right, wrapping to the first.
    Forward,
    /// Previous deck to the left, wrapping to the last.
    Backward,
}

/// Finds the next live deck from `current` in the given direction.
///
/// Steps one slot at a time with wraparound and returns the first active
/// slot reached within `decks.len()` steps, so a lone surviving deck finds
/// itself. With no current selection the scan starts at the first slot
/// (forward) or the last slot (backward), inclusive. Returns `None` when
/// every slot is eliminated.
#[instrument(skip(decks), fields(deck_count = decks.len()))]
pub fn next_active(decks: &[DeckSlot], current: Option<usize>, step: Step) -> Option<usize> {
    let len = decks.len();
    if len == 0 {
        return None;
    }

    let mut index = match current {
        Some(index) => index % len,
        None => {
            let start = match step {
                Step::Forward => 0,
                Step::Backward => len - 1,
            };
            if decks[start].is_active() {
                return Some(start);
            }
            start
        }
    };

    for _ in 0..len {
        index = match step {
            Step::Forward => (index + 1) % len,
            Step::Backward => (index + len - 1) % len,
        };
        if decks[index].is_active() {
            debug!(index, "Found next active deck");
            return Some(index);
        }
    }

    debug!("No active decks remain");
    None
}

/// Validates a direct deck request (numeric key or pointer).
///
/// No wraparound: an out-of-range or eliminated index yields `None`.
pub fn select_direct(decks: &[DeckSlot], index: usize) -> Option<usize> {
    decks
        .get(index)
        .filter(|slot| slot.is_active())
        .map(|_| index)
}

/// First live deck, if any.
pub fn first_active(decks: &[DeckSlot]) -> Option<usize> {
    next_active(decks, None, Step::Forward)
}
