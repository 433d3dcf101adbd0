//! Error types.

use thiserror::Error;

/// Errors returned by [`AuthClient::fetch`](crate::AuthClient::fetch).
#[derive(Debug, Error)]
pub enum Error {
    /// The request target could not be resolved against the API root.
    #[error("invalid request target: {0}")]
    InvalidTarget(String),

    /// The request body could not be encoded.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// A network-level failure on the initial attempt or the retry.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The session could not be restored: the access token expired and the
    /// refresh was denied. The token store has been cleared and the
    /// sign-in redirect fired; there is no response body to interpret.
    #[error("session expired, sign-in required")]
    SessionExpired(#[source] RefreshError),
}

/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Network-level failures surfaced by an [`HttpTransport`](crate::HttpTransport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request did not complete within its deadline.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Deadline that was exceeded, in milliseconds.
        timeout_ms: u64,
    },

    /// DNS resolution failed for the target host.
    #[error("DNS resolution failed for {host}: {message}")]
    Dns {
        /// The host that could not be resolved.
        host: String,
        /// Resolver error detail.
        message: String,
    },

    /// The target host actively refused the connection.
    #[error("connection refused by {host}")]
    ConnectionRefused {
        /// The refusing host.
        host: String,
    },

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Any other transport-level failure.
    #[error("{0}")]
    Other(String),
}

/// Failures of the refresh exchange.
#[derive(Debug, Error)]
pub enum RefreshError {
    /// The refresh endpoint answered with a non-2xx status.
    #[error("refresh denied with status {status}")]
    Denied {
        /// The status code returned by the refresh endpoint.
        status: u16,
    },

    /// The refresh endpoint answered 2xx but the body was not the expected
    /// `{"access_token": ...}` document.
    #[error("malformed refresh response: {0}")]
    InvalidResponse(String),

    /// The refresh request itself failed at the transport level.
    #[error("refresh transport error: {0}")]
    Transport(#[from] TransportError),
}
