//! Gateway error types.

use derive_more::{Display, Error};

/// Broad class of a gateway failure; the controller reacts per class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum GatewayErrorKind {
    /// Network failure or a non-success response.
    #[display("engine unavailable")]
    Unavailable,
    /// HTTP 401/403: the credential is no longer valid.
    #[display("authorization expired")]
    AuthExpired,
    /// The response body could not be decoded.
    #[display("malformed response")]
    Decode,
}

/// Error from an engine or statistics call, with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Gateway error ({}): {} at {}:{}", kind, message, file, line)]
pub struct GatewayError {
    /// Failure class.
    pub kind: GatewayErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl GatewayError {
    /// Creates a new gateway error with caller location tracking.
    #[track_caller]
    pub fn new(kind: GatewayErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Network or engine failure.
    #[track_caller]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Unavailable, message)
    }

    /// Authorization rejected by the remote side.
    #[track_caller]
    pub fn auth_expired(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::AuthExpired, message)
    }

    /// Undecodable response body.
    #[track_caller]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Decode, message)
    }

    /// Returns true for 401/403 failures.
    pub fn is_auth_expired(&self) -> bool {
        self.kind == GatewayErrorKind::AuthExpired
    }
}

impl From<reqwest::Error> for GatewayError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::decode(format!("Failed to decode response: {}", err))
        } else {
            Self::unavailable(format!("HTTP request failed: {}", err))
        }
    }
}
