//! The remote sender contract.
//!
//! The orchestrator never talks HTTP itself; it hands a finished
//! [`Submission`] to a [`ResultSender`] and interprets the outcome. The
//! seam exists so the transport can be swapped — the production
//! [`HttpSender`](http::HttpSender), a recording mock in tests — without the
//! orchestration logic knowing the difference.
//!
//! Implementations own their retry behavior. In particular, honoring
//! [`Submission::retry_on_active_import`] (waiting out an import already
//! running on the same test plan) happens inside the sender; the
//! orchestrator never retries a failed send.

pub mod http;

use async_trait::async_trait;

use crate::submission::Submission;

/// Outcome of a credential pre-check, used outside the per-build run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialCheck {
    /// URL reachable and credentials accepted.
    Valid,
    /// The tracker rejected the username/password pair.
    InvalidCredentials,
    /// The URL is malformed or no tracker answered there.
    InvalidUrl,
    /// Anything else, with a human-readable description.
    UnexpectedError(String),
}

/// A failed submission, surfaced verbatim to the build log.
///
/// `response_body` carries whatever the tracker returned, when it returned
/// anything at all; `source` carries the underlying transport error, when
/// there was one. Both are logged as-is — the orchestrator adds no
/// interpretation of its own.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct SendError {
    /// Raw response body from the tracker, if a response arrived.
    pub response_body: Option<String>,

    /// Human-readable description of the failure.
    pub message: String,

    /// Underlying cause, typically a transport error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SendError {
    /// A send error with a message and nothing else yet.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            response_body: None,
            message: message.into(),
            source: None,
        }
    }

    /// Attaches the tracker's response body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.response_body = Some(body.into());
        self
    }

    /// Attaches the underlying cause.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

/// Uploads test results to the tracker's test management module.
///
/// Must be safe for concurrent use: one sender instance is typically shared
/// by every build running in the process, and calls take no per-call locks.
#[async_trait]
pub trait ResultSender: Send + Sync {
    /// Checks that the tracker answers at `url` and accepts the credentials.
    ///
    /// This is a connectivity pre-check for configuration time; the
    /// per-build run never calls it.
    async fn validate_credentials(
        &self,
        url: &str,
        username: &str,
        password: &str,
    ) -> CredentialCheck;

    /// Performs the upload described by `submission`.
    ///
    /// Consumes the descriptor — a submission is sent exactly once. A clean
    /// import returns `Ok(())`; everything else, including transport faults,
    /// arrives as a [`SendError`] rather than a panic.
    async fn send(&self, submission: Submission) -> Result<(), SendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_error_display_is_the_message() {
        let err = SendError::new("Import failed with status 400").with_body("bad request");

        assert_eq!(err.to_string(), "Import failed with status 400");
        assert_eq!(err.response_body.as_deref(), Some("bad request"));
    }

    #[test]
    fn test_send_error_carries_its_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err = SendError::new("Failed to send test results").with_source(io);

        let source = std::error::Error::source(&err).unwrap();
        assert!(source.to_string().contains("reset"));
    }
}
