//! Shared HTTP plumbing: credential attachment and status mapping.

use super::{Credentials, GatewayError};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// `reqwest` client bound to a base URL, attaching the bearer credential.
#[derive(Debug, Clone)]
pub(crate) struct AuthorizedClient {
    base_url: String,
    client: reqwest::Client,
    credentials: Arc<dyn Credentials>,
}

impl AuthorizedClient {
    /// Builds a client with a per-request timeout.
    pub(crate) fn new(
        base_url: impl Into<String>,
        credentials: Arc<dyn Credentials>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            credentials,
        })
    }

    /// Base URL without a trailing slash.
    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.credentials.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends once and maps the status. No retries.
    #[instrument(skip(self, request))]
    async fn send(&self, request: RequestBuilder, path: &str) -> Result<Response, GatewayError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        debug!(status = %status, "Received response");

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(status = %status, "Credential rejected");
            self.credentials.invalidate();
            return Err(GatewayError::auth_expired(format!(
                "{} returned HTTP {}",
                path, status
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Request failed");
            return Err(GatewayError::unavailable(format!(
                "{} returned HTTP {}",
                path, status
            )));
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response, path: &str) -> Result<T, GatewayError> {
        response
            .json()
            .await
            .map_err(|e| GatewayError::decode(format!("{}: {}", path, e)))
    }

    /// GET and decode a JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let response = self.send(self.client.get(self.url(path)), path).await?;
        Self::decode(response, path).await
    }

    /// GET, ignoring the body.
    pub(crate) async fn get(&self, path: &str) -> Result<(), GatewayError> {
        self.send(self.client.get(self.url(path)), path).await?;
        Ok(())
    }

    /// POST a JSON body and decode the JSON reply.
    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(self.client.post(self.url(path)).json(body), path)
            .await?;
        Self::decode(response, path).await
    }

    /// POST a JSON body, ignoring the reply.
    pub(crate) async fn post<B>(&self, path: &str, body: Option<&B>) -> Result<(), GatewayError>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.client.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(request, path).await?;
        Ok(())
    }
}
