//! Refresh orchestration.
//!
//! Exchanges the cookie-held refresh credential for a new access token by
//! POSTing to the configured refresh endpoint. Concurrent callers that
//! observed the same expired token share a single exchange: a mutex
//! serializes attempts, and after acquiring it each caller re-reads the
//! store. If the epoch moved past its snapshot, another task already
//! refreshed and the stored token is reused without a network call.

use std::time::Duration;

use serde::Deserialize;
use tokio::sync::Mutex;
use url::Url;

use crate::error::RefreshError;
use crate::ports::HttpTransport;
use crate::request::{HttpMethod, PreparedRequest};
use crate::token::AccessToken;
use crate::token_store::TokenStore;

/// Successful refresh endpoint response.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
}

/// Serializes refresh attempts so one expiry triggers one exchange.
#[derive(Debug, Default)]
pub(crate) struct RefreshCoordinator {
    gate: Mutex<()>,
}

impl RefreshCoordinator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Obtains a fresh access token, reusing a token refreshed by a
    /// concurrent caller when possible.
    ///
    /// `seen_epoch` is the store epoch the caller observed when its
    /// request was denied; a store that has moved past it already holds a
    /// newer token. The store is mutated on a successful exchange only.
    pub(crate) async fn refresh(
        &self,
        transport: &dyn HttpTransport,
        refresh_url: &Url,
        store: &TokenStore,
        seen_epoch: u64,
        timeout: Option<Duration>,
    ) -> Result<AccessToken, RefreshError> {
        let _guard = self.gate.lock().await;

        let snapshot = store.snapshot().await;
        if snapshot.epoch != seen_epoch
            && let Some(token) = snapshot.token
        {
            tracing::debug!(token = %token.preview(), "reusing token refreshed by concurrent caller");
            return Ok(token);
        }

        let request = PreparedRequest {
            method: HttpMethod::Post,
            url: refresh_url.clone(),
            headers: Vec::new(),
            body: None,
            timeout,
        };

        let response = transport.execute(&request).await?;
        if !response.status.is_success() {
            return Err(RefreshError::Denied {
                status: response.status.as_u16(),
            });
        }

        let parsed: RefreshResponse = response
            .json()
            .map_err(|e| RefreshError::InvalidResponse(e.to_string()))?;

        let token = AccessToken::new(parsed.access_token);
        store.set(token.clone()).await;
        tracing::info!(token = %token.preview(), "access token refreshed");

        Ok(token)
    }
}
