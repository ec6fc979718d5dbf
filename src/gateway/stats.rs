//! REST binding for the statistics service.

use super::http::AuthorizedClient;
use super::{Credentials, GatewayError, StatsService, StatsSummary};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveResultRequest {
    score: u32,
    num_decks: usize,
    won: bool,
}

/// Statistics client over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct RestStatsClient {
    http: AuthorizedClient,
}

impl RestStatsClient {
    /// Creates a client for the statistics service rooted at `base_url`.
    #[instrument(skip(base_url, credentials), fields(base_url = %base_url.as_ref()))]
    pub fn new(
        base_url: impl AsRef<str>,
        credentials: Arc<dyn Credentials>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        info!("Creating statistics client");
        Ok(Self {
            http: AuthorizedClient::new(base_url.as_ref(), credentials, timeout)?,
        })
    }
}

#[async_trait]
impl StatsService for RestStatsClient {
    #[instrument(skip(self))]
    async fn save_result(
        &self,
        score: u32,
        deck_count: usize,
        won: bool,
    ) -> Result<(), GatewayError> {
        info!("Saving game result");
        self.http
            .post(
                "api/game/save",
                Some(&SaveResultRequest {
                    score,
                    num_decks: deck_count,
                    won,
                }),
            )
            .await
    }

    #[instrument(skip(self))]
    async fn fetch_my_summary(&self) -> Result<StatsSummary, GatewayError> {
        self.http.get_json("api/stats/me").await
    }
}
