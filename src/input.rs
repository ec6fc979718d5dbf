//! Keyboard mapping onto controller intents.

use crate::controller::Intent;
use crate::gateway::Direction;
use crate::navigator::Step;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Submit an intent.
    Intent(Intent),
    /// Leave the game.
    Quit,
}

/// Maps a key event to an action.
///
/// `deck_count` is used by `s` to start a new game. Digits `1`-`9` select
/// decks one to nine, `0` selects deck ten. Releases are ignored.
pub fn map_key(key: KeyEvent, deck_count: usize) -> Option<KeyAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(KeyAction::Quit);
    }

    let intent = match key.code {
        KeyCode::Left => Intent::Step(Step::Backward),
        KeyCode::Right => Intent::Step(Step::Forward),
        KeyCode::Up | KeyCode::Char('h') => Intent::Guess(Direction::Higher),
        KeyCode::Down | KeyCode::Char('l') => Intent::Guess(Direction::Lower),
        KeyCode::Char('t') => Intent::ActivateHint,
        KeyCode::Char('r') => Intent::Reset,
        KeyCode::Char('s') => Intent::Start(deck_count),
        KeyCode::Char('0') => Intent::SelectDeck(9),
        KeyCode::Char(c @ '1'..='9') => Intent::SelectDeck(c as usize - '1' as usize),
        KeyCode::Char('q') | KeyCode::Esc => return Some(KeyAction::Quit),
        _ => return None,
    };
    Some(KeyAction::Intent(intent))
}
