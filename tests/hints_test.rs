//! Tests for the hint budget machine.

use highlow::{HintBudget, HintRejection, HintTick};

#[test]
fn test_initial_state() {
    let hints = HintBudget::default();
    assert_eq!(*hints.state().hints_remaining(), 3);
    assert_eq!(*hints.state().rounds_remaining(), 0);
    assert!(!*hints.state().visible());
}

#[test]
fn test_activate_spends_one_hint() {
    let mut hints = HintBudget::new(3, 3);
    hints.activate().unwrap();

    assert_eq!(*hints.state().hints_remaining(), 2);
    assert_eq!(*hints.state().rounds_remaining(), 3);
    assert!(*hints.state().visible());
}

#[test]
fn test_double_activation_spends_once() {
    let mut hints = HintBudget::new(3, 3);
    hints.activate().unwrap();
    assert_eq!(hints.activate(), Err(HintRejection::AlreadyActive));

    assert_eq!(*hints.state().hints_remaining(), 2);
    assert_eq!(*hints.state().rounds_remaining(), 3);
}

#[test]
fn test_window_ticks_turn_visibility_off() {
    for window in 1..=5 {
        let mut hints = HintBudget::new(3, window);
        hints.activate().unwrap();

        for _ in 0..window - 1 {
            assert!(matches!(hints.tick(), HintTick::Running(_)));
        }
        assert!(*hints.state().visible(), "window {}", window);

        assert_eq!(hints.tick(), HintTick::Expired);
        assert!(!*hints.state().visible());
        assert_eq!(*hints.state().rounds_remaining(), 0);
    }
}

#[test]
fn test_tick_counts_down() {
    let mut hints = HintBudget::new(1, 3);
    hints.activate().unwrap();
    assert_eq!(hints.tick(), HintTick::Running(2));
    assert_eq!(hints.tick(), HintTick::Running(1));
    assert_eq!(hints.tick(), HintTick::Expired);
    assert_eq!(hints.tick(), HintTick::Inactive);
}

#[test]
fn test_tick_without_hint_is_inactive() {
    let mut hints = HintBudget::default();
    assert_eq!(hints.tick(), HintTick::Inactive);
    assert_eq!(*hints.state().hints_remaining(), 3);
}

#[test]
fn test_exhausted_budget_is_rejected() {
    let mut hints = HintBudget::new(1, 1);
    hints.activate().unwrap();
    hints.tick();

    assert_eq!(hints.activate(), Err(HintRejection::Exhausted));
    assert_eq!(*hints.state().hints_remaining(), 0);
}

#[test]
fn test_rejections_have_distinct_messages() {
    assert_ne!(
        HintRejection::AlreadyActive.to_string(),
        HintRejection::Exhausted.to_string()
    );
}

#[test]
fn test_zero_window_is_raised_to_one() {
    let mut hints = HintBudget::new(2, 0);
    assert_eq!(*hints.window(), 1);
    hints.activate().unwrap();
    assert_eq!(hints.tick(), HintTick::Expired);
}

#[test]
fn test_reset_restores_budget() {
    let mut hints = HintBudget::new(2, 2);
    hints.activate().unwrap();
    hints.reset();

    assert_eq!(*hints.state().hints_remaining(), 2);
    assert_eq!(*hints.state().rounds_remaining(), 0);
    assert!(!*hints.state().visible());
}
