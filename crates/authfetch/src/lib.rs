//! Authenticated HTTP fetch with transparent bearer-token refresh.
//!
//! This crate consolidates the fetch-refresh-retry protocol every
//! authenticated call site needs into one client:
//!
//! - attach `Authorization: Bearer <token>` from an in-memory
//!   [`TokenStore`] (omitted entirely when no token is held),
//! - intercept HTTP 401, exchange the cookie-held refresh credential for a
//!   new access token at the refresh endpoint,
//! - retry the original request exactly once with the new token,
//! - on unrecoverable failure clear the store and fire an injectable
//!   sign-in redirect.
//!
//! Everything else passes through: non-401 statuses are returned verbatim
//! and never interpreted here.
//!
//! The network seam is the [`HttpTransport`] port; `authfetch-reqwest`
//! provides the production adapter, and tests script in-memory ones.
//! Concurrent calls that hit 401 at the same time share a single refresh
//! exchange.
//!
//! ```no_run
//! use authfetch::{AuthClient, RequestSpec};
//!
//! async fn load_ticket(client: &AuthClient) -> authfetch::Result<serde_json::Value> {
//!     let response = client.fetch(RequestSpec::get("/api/tickets/7")).await?;
//!     response.json().map_err(|e| authfetch::Error::InvalidBody(e.to_string()))
//! }
//! ```

mod client;
mod error;
mod ports;
mod refresh;
mod request;
mod response;
mod token;
mod token_store;

pub use client::{AuthClient, AuthClientBuilder};
pub use error::{Error, RefreshError, Result, TransportError};
pub use ports::{HttpTransport, NoRedirect, SigninRedirect};
pub use request::{Header, HttpMethod, PreparedRequest, RequestSpec};
pub use response::{ResponseSpec, StatusCode};
pub use token::AccessToken;
pub use token_store::{TokenSnapshot, TokenStore};
