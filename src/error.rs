//! Session error taxonomy.

use crate::hints::HintRejection;
use derive_more::{Display, Error};

/// Intent refused locally, before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ValidationError {
    /// Deck count outside 6..=10.
    #[display("Choose between 6 and 10 decks (got {requested}).")]
    DeckCountOutOfRange {
        /// Requested deck count.
        requested: usize,
    },
    /// Guess with nothing selected.
    #[display("Please select a deck first!")]
    NoDeckSelected,
    /// Hint activation refused.
    #[display("{_0}")]
    Hint(HintRejection),
}

impl From<HintRejection> for ValidationError {
    fn from(rejection: HintRejection) -> Self {
        Self::Hint(rejection)
    }
}

/// Class of a session failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SessionErrorKind {
    /// Refused locally; always shown, never fatal.
    #[display("{_0}")]
    Validation(ValidationError),
    /// Engine unreachable or failing; the player retries.
    #[display("engine unavailable")]
    EngineUnavailable,
    /// Credential rejected; session forced back to the start.
    #[display("authorization expired")]
    AuthExpired,
    /// Post-game statistics could not be saved or loaded.
    #[display("statistics unavailable")]
    StatsPersist,
    /// Odds could not be refreshed; cosmetic.
    #[display("probabilities unavailable")]
    ProbabilityFetch,
}

/// Session error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Session error ({}): {} at {}:{}", kind, message, file, line)]
pub struct SessionError {
    /// Failure class.
    pub kind: SessionErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SessionError {
    /// Creates a new session error with caller location tracking.
    #[track_caller]
    pub fn new(kind: SessionErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Local validation failure.
    #[track_caller]
    pub fn validation(error: ValidationError) -> Self {
        Self::new(SessionErrorKind::Validation(error), error.to_string())
    }

    /// Text shown to the player.
    pub fn user_message(&self) -> String {
        match self.kind {
            SessionErrorKind::Validation(error) => error.to_string(),
            SessionErrorKind::EngineUnavailable => {
                format!("{} Please try again.", self.message)
            }
            SessionErrorKind::AuthExpired => {
                "Your session has expired. Please sign in again.".to_string()
            }
            SessionErrorKind::StatsPersist => self.message.clone(),
            SessionErrorKind::ProbabilityFetch => String::new(),
        }
    }

    /// The validation error, if this is one.
    pub fn validation_error(&self) -> Option<ValidationError> {
        match self.kind {
            SessionErrorKind::Validation(error) => Some(error),
            _ => None,
        }
    }
}
