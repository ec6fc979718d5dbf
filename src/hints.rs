//! Hint budget: a limited number of hints, each visible for a few rounds.

use derive_getters::Getters;
use derive_more::Display;
use tracing::{debug, info, instrument, warn};

/// Hints granted per session unless configured otherwise.
pub const DEFAULT_HINT_BUDGET: u32 = 3;

/// Resolved guesses a hint stays visible for unless configured otherwise.
pub const DEFAULT_HINT_WINDOW: u32 = 3;

/// Observable hint counters for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct HintState {
    /// Activations left this session.
    hints_remaining: u32,
    /// Resolved guesses left before the active hint expires (0 when idle).
    rounds_remaining: u32,
    /// Whether probability data may be shown.
    visible: bool,
}

/// Why a hint activation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum HintRejection {
    /// A hint is still running.
    #[display("A hint is already active. Wait until it expires.")]
    AlreadyActive,
    /// The session's budget is spent.
    #[display("No hints remaining for this game.")]
    Exhausted,
}

/// Result of ticking the machine after a resolved guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintTick {
    /// No hint was running.
    Inactive,
    /// The hint is still visible for this many more rounds.
    Running(u32),
    /// The hint ran out on this tick.
    Expired,
}

/// State machine over [`HintState`].
#[derive(Debug, Clone, Getters)]
pub struct HintBudget {
    /// Current counters.
    state: HintState,
    /// Hints granted at session start.
    budget: u32,
    /// Rounds a single activation lasts.
    window: u32,
}

impl HintBudget {
    /// Creates a machine with the given budget and visibility window.
    ///
    /// A window of zero would never expire, so it is raised to one.
    #[instrument]
    pub fn new(budget: u32, window: u32) -> Self {
        let window = window.max(1);
        Self {
            state: HintState {
                hints_remaining: budget,
                rounds_remaining: 0,
                visible: false,
            },
            budget,
            window,
        }
    }

    /// Spends one hint and makes probabilities visible for the window.
    #[instrument(skip(self), fields(hints_remaining = self.state.hints_remaining, rounds_remaining = self.state.rounds_remaining))]
    pub fn activate(&mut self) -> Result<(), HintRejection> {
        if self.state.rounds_remaining > 0 {
            warn!("Hint activation refused: already active");
            return Err(HintRejection::AlreadyActive);
        }
        if self.state.hints_remaining == 0 {
            warn!("Hint activation refused: budget exhausted");
            return Err(HintRejection::Exhausted);
        }

        self.state.hints_remaining -= 1;
        self.state.rounds_remaining = self.window;
        self.state.visible = true;
        info!(
            hints_remaining = self.state.hints_remaining,
            rounds = self.window,
            "Hint activated"
        );
        Ok(())
    }

    /// Counts down one resolved guess.
    #[instrument(skip(self))]
    pub fn tick(&mut self) -> HintTick {
        match self.state.rounds_remaining {
            0 => HintTick::Inactive,
            1 => {
                self.state.rounds_remaining = 0;
                self.state.visible = false;
                info!("Hint expired");
                HintTick::Expired
            }
            n => {
                self.state.rounds_remaining = n - 1;
                debug!(rounds_remaining = n - 1, "Hint round consumed");
                HintTick::Running(n - 1)
            }
        }
    }

    /// Restores the full budget with no hint running.
    pub fn reset(&mut self) {
        *self = Self::new(self.budget, self.window);
    }
}

impl Default for HintBudget {
    fn default() -> Self {
        Self::new(DEFAULT_HINT_BUDGET, DEFAULT_HINT_WINDOW)
    }
}
