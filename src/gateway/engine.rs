//! REST binding for the game engine.

use super::http::AuthorizedClient;
use super::{
    Credentials, Direction, EngineGateway, EngineState, GatewayError, ProbabilitySnapshot,
};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StartRequest {
    num_decks: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GuessRequest {
    /// One-based on the wire.
    deck_number: usize,
    guess: Direction,
}

/// Engine client over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct RestEngineGateway {
    http: AuthorizedClient,
}

impl RestEngineGateway {
    /// Creates a client for the engine rooted at `base_url` (e.g. `http://host/api/game`).
    #[instrument(skip(base_url, credentials), fields(base_url = %base_url.as_ref()))]
    pub fn new(
        base_url: impl AsRef<str>,
        credentials: Arc<dyn Credentials>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        info!("Creating engine gateway");
        Ok(Self {
            http: AuthorizedClient::new(base_url.as_ref(), credentials, timeout)?,
        })
    }
}

#[async_trait]
impl EngineGateway for RestEngineGateway {
    #[instrument(skip(self), fields(base_url = %self.http.base_url()))]
    async fn start(&self, deck_count: usize) -> Result<EngineState, GatewayError> {
        info!("Starting game");
        let state: EngineState = self
            .http
            .post_json(
                "start",
                &StartRequest {
                    num_decks: deck_count,
                },
            )
            .await?;
        debug!(decks = state.decks.len(), score = state.score, "Game started");
        Ok(state)
    }

    #[instrument(skip(self), fields(base_url = %self.http.base_url()))]
    async fn guess(
        &self,
        deck: usize,
        direction: Direction,
    ) -> Result<EngineState, GatewayError> {
        info!("Submitting guess");
        let state: EngineState = self
            .http
            .post_json(
                "guess",
                &GuessRequest {
                    deck_number: deck + 1,
                    guess: direction,
                },
            )
            .await?;
        debug!(
            score = state.score,
            game_over = state.game_over,
            message = %state.message,
            "Guess resolved"
        );
        Ok(state)
    }

    #[instrument(skip(self), fields(base_url = %self.http.base_url()))]
    async fn probabilities(&self) -> Result<ProbabilitySnapshot, GatewayError> {
        let snapshot: ProbabilitySnapshot = self.http.get_json("probabilities").await?;
        debug!(decks = snapshot.len(), "Fetched probabilities");
        Ok(snapshot)
    }

    #[instrument(skip(self), fields(base_url = %self.http.base_url()))]
    async fn reset(&self) -> Result<(), GatewayError> {
        info!("Resetting game");
        self.http.post::<()>("reset", None).await
    }

    #[instrument(skip(self), fields(base_url = %self.http.base_url()))]
    async fn health(&self) -> Result<(), GatewayError> {
        self.http.get("health").await
    }
}
