//! Tests for keyboard mapping.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use highlow::{Direction, Intent, KeyAction, Step, map_key};

fn press(code: KeyCode) -> Option<KeyAction> {
    map_key(KeyEvent::new(code, KeyModifiers::NONE), 8)
}

#[test]
fn test_arrows_step_selection() {
    assert_eq!(
        press(KeyCode::Left),
        Some(KeyAction::Intent(Intent::Step(Step::Backward)))
    );
    assert_eq!(
        press(KeyCode::Right),
        Some(KeyAction::Intent(Intent::Step(Step::Forward)))
    );
}

#[test]
fn test_guess_keys() {
    let higher = Some(KeyAction::Intent(Intent::Guess(Direction::Higher)));
    let lower = Some(KeyAction::Intent(Intent::Guess(Direction::Lower)));
    assert_eq!(press(KeyCode::Up), higher);
    assert_eq!(press(KeyCode::Char('h')), higher);
    assert_eq!(press(KeyCode::Down), lower);
    assert_eq!(press(KeyCode::Char('l')), lower);
}

#[test]
fn test_digits_select_decks() {
    assert_eq!(
        press(KeyCode::Char('1')),
        Some(KeyAction::Intent(Intent::SelectDeck(0)))
    );
    assert_eq!(
        press(KeyCode::Char('9')),
        Some(KeyAction::Intent(Intent::SelectDeck(8)))
    );
    assert_eq!(
        press(KeyCode::Char('0')),
        Some(KeyAction::Intent(Intent::SelectDeck(9)))
    );
}

#[test]
fn test_session_keys() {
    assert_eq!(
        press(KeyCode::Char('t')),
        Some(KeyAction::Intent(Intent::ActivateHint))
    );
    assert_eq!(press(KeyCode::Char('r')), Some(KeyAction::Intent(Intent::Reset)));
    assert_eq!(
        press(KeyCode::Char('s')),
        Some(KeyAction::Intent(Intent::Start(8)))
    );
    assert_eq!(press(KeyCode::Char('q')), Some(KeyAction::Quit));
    assert_eq!(press(KeyCode::Esc), Some(KeyAction::Quit));
}

#[test]
fn test_ctrl_c_quits() {
    let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert_eq!(map_key(key, 6), Some(KeyAction::Quit));
}

#[test]
fn test_unmapped_and_release_ignored() {
    assert_eq!(press(KeyCode::Char('x')), None);
    assert_eq!(press(KeyCode::Tab), None);

    let mut release = KeyEvent::new(KeyCode::Char('h'), KeyModifiers::NONE);
    release.kind = KeyEventKind::Release;
    assert_eq!(map_key(release, 6), None);
}
