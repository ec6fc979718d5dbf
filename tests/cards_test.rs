//! Tests for card codes and drawn-card extraction.

use highlow::{Card, DeckSlot, EngineState, Rank, Suit, extract_drawn_card};
use strum::IntoEnumIterator;

fn state(codes: &[&str], message: &str) -> EngineState {
    EngineState {
        decks: codes.iter().map(|code| code.parse().unwrap()).collect(),
        score: 0,
        message: message.to_string(),
        game_over: false,
        won: false,
        drawn_card: None,
    }
}

#[test]
fn test_parse_cards() {
    assert_eq!("AS".parse::<Card>().unwrap(), Card::new(Rank::Ace, Suit::Spades));
    assert_eq!("10H".parse::<Card>().unwrap(), Card::new(Rank::Ten, Suit::Hearts));
    assert_eq!("qd".parse::<Card>().unwrap(), Card::new(Rank::Queen, Suit::Diamonds));
}

#[test]
fn test_parse_rejects_garbage() {
    for code in ["", "A", "1S", "11C", "KX", "XX"] {
        assert!(code.parse::<Card>().is_err(), "{:?}", code);
    }
}

#[test]
fn test_every_card_round_trips_through_its_code() {
    for rank in Rank::iter() {
        for suit in Suit::iter() {
            let card = Card::new(rank, suit);
            assert_eq!(card.to_string().parse::<Card>().unwrap(), card);
        }
    }
}

#[test]
fn test_rank_values() {
    assert_eq!(Rank::Ace.value(), 1);
    assert_eq!(Rank::Ten.value(), 10);
    assert_eq!(Rank::King.value(), 13);
}

#[test]
fn test_eliminated_slot() {
    let slot: DeckSlot = "XX".parse().unwrap();
    assert!(slot.is_eliminated());
    assert_eq!(slot.card(), None);
    assert_eq!(slot.to_string(), "XX");
}

#[test]
fn test_slots_deserialize_from_wire_codes() {
    let json = r#"{"deckValues":["7C","XX","10D"],"numDecks":3,"score":4,"gameOver":false,"won":false,"message":"Correct!"}"#;
    let state: EngineState = serde_json::from_str(json).unwrap();

    assert_eq!(
        state.decks,
        vec![
            DeckSlot::Active(Card::new(Rank::Seven, Suit::Clubs)),
            DeckSlot::Eliminated,
            DeckSlot::Active(Card::new(Rank::Ten, Suit::Diamonds)),
        ]
    );
    assert_eq!(state.score, 4);
    assert_eq!(state.drawn_card, None);
}

#[test]
fn test_bad_wire_code_fails_to_decode() {
    let json = r#"{"deckValues":["7C","ZZ"]}"#;
    assert!(serde_json::from_str::<EngineState>(json).is_err());
}

#[test]
fn test_drawn_card_prefers_structured_field() {
    let mut state = state(&["5H"], "Correct! The card was 9S.");
    state.drawn_card = Some("JD".parse().unwrap());
    assert_eq!(extract_drawn_card(&state, 0), Some("JD".parse().unwrap()));
}

#[test]
fn test_drawn_card_from_message() {
    let state = state(
        &["XX", "5H"],
        "Wrong! The card was 10C. Deck 1 eliminated.",
    );
    assert_eq!(extract_drawn_card(&state, 0), Some("10C".parse().unwrap()));
}

#[test]
fn test_drawn_card_falls_back_to_new_top_card() {
    let state = state(&["8H", "5H"], "Correct!");
    assert_eq!(extract_drawn_card(&state, 0), Some("8H".parse().unwrap()));
}

#[test]
fn test_drawn_card_unknown_when_deck_eliminated_and_message_silent() {
    let state = state(&["XX", "5H"], "Wrong guess.");
    assert_eq!(extract_drawn_card(&state, 0), None);
}
