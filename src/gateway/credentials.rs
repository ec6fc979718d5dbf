//! Bearer credential supplied by the auth collaborator.

use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, instrument, warn};

/// Environment variable holding the bearer token.
pub const TOKEN_ENV_VAR: &str = "HIGHLOW_TOKEN";

/// Source of the bearer credential attached to every remote call.
pub trait Credentials: std::fmt::Debug + Send + Sync {
    /// Current bearer token, if the user is signed in.
    fn bearer_token(&self) -> Option<String>;

    /// Drops the credential after the remote side rejected it.
    fn invalidate(&self);
}

/// In-memory token holder.
#[derive(Debug, Default)]
pub struct TokenCredentials {
    token: Mutex<Option<String>>,
}

impl TokenCredentials {
    /// Wraps an optional token.
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: Mutex::new(token),
        }
    }

    /// Reads the token from [`TOKEN_ENV_VAR`].
    #[instrument]
    pub fn from_env() -> Self {
        let token = std::env::var(TOKEN_ENV_VAR)
            .ok()
            .filter(|t| !t.trim().is_empty());
        if token.is_some() {
            info!("Bearer token loaded from environment");
        } else {
            warn!(var = TOKEN_ENV_VAR, "No bearer token set; calls go out unauthenticated");
        }
        Self::new(token)
    }
}

impl Credentials for TokenCredentials {
    fn bearer_token(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn invalidate(&self) {
        debug!("Invalidating bearer token");
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}
