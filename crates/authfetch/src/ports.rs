//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the client core and its host
//! environment. Each port is a trait implemented by an adapter: HTTP
//! transports in a companion crate, navigation by the embedding
//! application, and in-memory fakes in tests.

use std::future::Future;
use std::pin::Pin;

use crate::error::TransportError;
use crate::request::PreparedRequest;
use crate::response::ResponseSpec;

/// Port for executing HTTP requests.
///
/// Implementations must attach ambient credentials (the HTTP-only refresh
/// cookie) to every request they execute; the core never sees that cookie.
/// The response body must be fully read before returning.
pub trait HttpTransport: Send + Sync {
    /// Executes a prepared request and returns the response.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] on network-level failure (DNS, refused
    /// or broken connections, deadline exceeded). HTTP error statuses are
    /// not transport errors; they are returned as responses.
    fn execute<'a>(
        &'a self,
        request: &'a PreparedRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ResponseSpec, TransportError>> + Send + 'a>>;
}

/// Port for the navigate-to-sign-in side effect.
///
/// Fired exactly once per fetch whose session cannot be restored. Kept
/// behind a trait so the core stays testable without a real navigation
/// environment; any `Fn() + Send + Sync` closure qualifies.
pub trait SigninRedirect: Send + Sync {
    /// Navigate the user to the sign-in entry point.
    fn redirect_to_signin(&self);
}

impl<F> SigninRedirect for F
where
    F: Fn() + Send + Sync,
{
    fn redirect_to_signin(&self) {
        self();
    }
}

/// A [`SigninRedirect`] that does nothing.
///
/// The builder default; suitable for tests and non-interactive hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRedirect;

impl SigninRedirect for NoRedirect {
    fn redirect_to_signin(&self) {}
}
