//! Tests for deck selection.

use highlow::{DeckSlot, Step, first_active, next_active, select_direct};

fn slots(codes: &[&str]) -> Vec<DeckSlot> {
    codes.iter().map(|code| code.parse().unwrap()).collect()
}

#[test]
fn test_forward_skips_eliminated() {
    let decks = slots(&["XX", "AS", "XX", "KD"]);
    assert_eq!(next_active(&decks, Some(1), Step::Forward), Some(3));
}

#[test]
fn test_forward_wraps_around() {
    let decks = slots(&["XX", "AS", "XX", "KD"]);
    assert_eq!(next_active(&decks, Some(3), Step::Forward), Some(1));
}

#[test]
fn test_backward_wraps_around() {
    let decks = slots(&["2C", "AS", "XX", "XX"]);
    assert_eq!(next_active(&decks, Some(0), Step::Backward), Some(1));
    assert_eq!(next_active(&decks, Some(1), Step::Backward), Some(0));
}

#[test]
fn test_all_eliminated_returns_none() {
    let decks = slots(&["XX", "XX", "XX"]);
    assert_eq!(next_active(&decks, Some(0), Step::Forward), None);
    assert_eq!(next_active(&decks, None, Step::Backward), None);
    assert_eq!(first_active(&decks), None);
}

#[test]
fn test_lone_survivor_finds_itself() {
    let decks = slots(&["XX", "9H", "XX"]);
    assert_eq!(next_active(&decks, Some(1), Step::Forward), Some(1));
    assert_eq!(next_active(&decks, Some(1), Step::Backward), Some(1));
}

#[test]
fn test_no_selection_starts_inclusive() {
    let decks = slots(&["AS", "XX", "QH"]);
    assert_eq!(next_active(&decks, None, Step::Forward), Some(0));
    assert_eq!(next_active(&decks, None, Step::Backward), Some(2));

    let decks = slots(&["XX", "XX", "QH", "XX"]);
    assert_eq!(next_active(&decks, None, Step::Forward), Some(2));
    assert_eq!(next_active(&decks, None, Step::Backward), Some(2));
}

#[test]
fn test_empty_row() {
    assert_eq!(next_active(&[], None, Step::Forward), None);
    assert_eq!(select_direct(&[], 0), None);
}

#[test]
fn test_direct_selection() {
    let decks = slots(&["AS", "XX", "QH"]);
    assert_eq!(select_direct(&decks, 0), Some(0));
    assert_eq!(select_direct(&decks, 1), None);
    assert_eq!(select_direct(&decks, 2), Some(2));
    assert_eq!(select_direct(&decks, 3), None);
}

#[test]
fn test_first_active() {
    assert_eq!(first_active(&slots(&["XX", "XX", "5S"])), Some(2));
}
