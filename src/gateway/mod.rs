//! Seam to the remote game engine and statistics service.
//!
//! The controller only ever talks to [`EngineGateway`] and [`StatsService`];
//! the REST bindings in this module are one implementation, test fakes are
//! another.

mod credentials;
mod engine;
mod error;
mod http;
mod stats;

pub use credentials::{Credentials, TOKEN_ENV_VAR, TokenCredentials};
pub use engine::RestEngineGateway;
pub use error::{GatewayError, GatewayErrorKind};
pub use stats::RestStatsClient;

use crate::cards::{Card, DeckSlot};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Player's call on the next card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Direction {
    /// Next card ranks above the top card.
    #[serde(rename = "h")]
    Higher,
    /// Next card ranks below the top card.
    #[serde(rename = "l")]
    Lower,
}

/// Authoritative game state returned by `start` and `guess`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineState {
    /// Top card of every deck, or eliminated.
    #[serde(rename = "deckValues")]
    pub decks: Vec<DeckSlot>,
    /// Engine-computed score.
    #[serde(default)]
    pub score: u32,
    /// Human-readable outcome message.
    #[serde(default)]
    pub message: String,
    /// Whether the game has ended.
    #[serde(default)]
    pub game_over: bool,
    /// Whether the ended game was won.
    #[serde(default)]
    pub won: bool,
    /// Card revealed by the guess, when the engine reports it directly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drawn_card: Option<Card>,
}

/// Remaining-pool counts for one deck's top card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeckOdds {
    /// Cards that would make "higher" correct.
    pub higher: u32,
    /// Cards that would make "lower" correct.
    pub lower: u32,
    /// Cards of equal rank (scored as correct by the engine).
    #[serde(default)]
    pub equal: u32,
    /// Size of the remaining pool.
    pub total: u32,
}

/// Per-deck odds keyed by deck index.
pub type ProbabilitySnapshot = BTreeMap<usize, DeckOdds>;

/// Post-game summary from the statistics service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsSummary {
    /// Games recorded for the player.
    pub total_games: u64,
    /// Games won.
    pub games_won: u64,
    /// Win rate as a percentage.
    pub win_rate: f64,
    /// Best score ever recorded.
    pub best_score: Option<u32>,
    /// Average score.
    pub average_score: Option<f64>,
    /// Leaderboard rank by best score.
    pub user_rank: Option<u64>,
    /// Consecutive wins up to now.
    pub current_win_streak: u32,
    /// Longest run of wins.
    pub longest_win_streak: u32,
}

/// Remote game engine.
///
/// Implementations must attach the caller's credential to every call, must
/// not retry `start`, `guess` or `reset` on their own, and must report
/// HTTP 401/403 as [`GatewayErrorKind::AuthExpired`].
#[async_trait]
pub trait EngineGateway: Send + Sync {
    /// Deals a new game with `deck_count` decks.
    async fn start(&self, deck_count: usize) -> Result<EngineState, GatewayError>;

    /// Guesses on the deck at `deck` (zero-based).
    async fn guess(&self, deck: usize, direction: Direction)
    -> Result<EngineState, GatewayError>;

    /// Odds for every deck in the current game.
    async fn probabilities(&self) -> Result<ProbabilitySnapshot, GatewayError>;

    /// Discards the current game.
    async fn reset(&self) -> Result<(), GatewayError>;

    /// Liveness check.
    async fn health(&self) -> Result<(), GatewayError>;
}

/// Statistics collaborator, consumed after a game ends.
#[async_trait]
pub trait StatsService: Send + Sync {
    /// Records a finished game.
    async fn save_result(&self, score: u32, deck_count: usize, won: bool)
    -> Result<(), GatewayError>;

    /// Current player's summary.
    async fn fetch_my_summary(&self) -> Result<StatsSummary, GatewayError>;
}

/// Wakes a possibly sleeping engine.
///
/// Calls `health` once and, on failure, once more after `retry_delay`.
/// There is no third attempt.
#[instrument(skip(gateway))]
pub async fn warm_up<G>(gateway: &G, retry_delay: Duration) -> Result<(), GatewayError>
where
    G: EngineGateway + ?Sized,
{
    match gateway.health().await {
        Ok(()) => {
            info!("Engine is awake");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "Engine health check failed, retrying once");
            tokio::time::sleep(retry_delay).await;
            gateway.health().await?;
            info!("Engine is awake after retry");
            Ok(())
        }
    }
}
