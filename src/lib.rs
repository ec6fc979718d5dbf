//! highlow - client-side session controller for a multi-deck higher/lower game
//!
//! A remote engine owns the decks, the draws and the odds. This crate drives
//! the interaction loop against it without races: intents are validated
//! against the session phase, each guess is revealed and then committed after
//! a presentation delay, and a budgeted hint layer sits on top.
//!
//! # Architecture
//!
//! - **Cards**: rank/suit codes and the `Active | Eliminated` deck slot
//! - **Navigator**: wraparound selection that skips eliminated decks
//! - **Hints**: the budget and round-expiry state machine
//! - **Pipeline**: flip-then-commit application of a guess response
//! - **Controller**: the session state machine and its task set
//! - **Gateway**: engine and statistics seams, with REST bindings
//!
//! # Example
//!
//! ```no_run
//! use highlow::{
//!     Credentials, Intent, RestEngineGateway, RestStatsClient, SessionController,
//!     SessionSettings, TokenCredentials,
//! };
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio::sync::mpsc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let credentials: Arc<dyn Credentials> = Arc::new(TokenCredentials::from_env());
//! let timeout = Duration::from_secs(30);
//! let engine = Arc::new(RestEngineGateway::new(
//!     "http://localhost:8081/api/game",
//!     Arc::clone(&credentials),
//!     timeout,
//! )?);
//! let stats = Arc::new(RestStatsClient::new("http://localhost:8080", credentials, timeout)?);
//!
//! let (signals, _signal_rx) = mpsc::unbounded_channel();
//! let mut controller = SessionController::new(engine, stats, SessionSettings::default(), signals);
//! controller.dispatch(Intent::Start(6)).await?;
//! controller.settle().await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod cards;
mod config;
mod controller;
mod driver;
mod error;
mod gateway;
mod hints;
mod input;
mod navigator;
mod pipeline;
mod session;
mod signals;

// Crate-level exports - Card model
pub use cards::{Card, CardParseError, DeckSlot, ELIMINATED_CODE, Rank, Suit};

// Crate-level exports - Configuration
pub use config::{ClientConfig, ConfigError, DEFAULT_CONFIG_FILE};

// Crate-level exports - Controller
pub use controller::{Dispatch, Intent, SessionController, SessionSettings};

// Crate-level exports - Terminal driver
pub use driver::{health, play};

// Crate-level exports - Errors
pub use error::{SessionError, SessionErrorKind, ValidationError};

// Crate-level exports - Gateway
pub use gateway::{
    Credentials, DeckOdds, Direction, EngineGateway, EngineState, GatewayError,
    GatewayErrorKind, ProbabilitySnapshot, RestEngineGateway, RestStatsClient, StatsService,
    StatsSummary, TOKEN_ENV_VAR, TokenCredentials, warm_up,
};

// Crate-level exports - Hints
pub use hints::{
    DEFAULT_HINT_BUDGET, DEFAULT_HINT_WINDOW, HintBudget, HintRejection, HintState, HintTick,
};

// Crate-level exports - Input
pub use input::{KeyAction, map_key};

// Crate-level exports - Navigator
pub use navigator::{Step, first_active, next_active, select_direct};

// Crate-level exports - Pipeline
pub use pipeline::extract_drawn_card;

// Crate-level exports - Session
pub use session::{DECK_COUNT_RANGE, Phase, Session, TOTAL_CARDS};

// Crate-level exports - Signals
pub use signals::{Signal, SoundCue};
