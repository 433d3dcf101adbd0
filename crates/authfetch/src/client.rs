//! The authenticated fetch wrapper.
//!
//! [`AuthClient`] is the single entry point for backend requests. It
//! attaches the current bearer token, intercepts HTTP 401, transparently
//! refreshes the session through the refresh endpoint, retries the
//! original request exactly once, and on unrecoverable failure clears the
//! token store and fires the injected sign-in redirect.
//!
//! Any status other than 401, success or error alike, passes through
//! unmodified; this wrapper interprets authentication expiry and nothing
//! else.

use std::sync::Arc;

use url::Url;

use crate::error::{Error, Result};
use crate::ports::{HttpTransport, NoRedirect, SigninRedirect};
use crate::refresh::RefreshCoordinator;
use crate::request::{Header, PreparedRequest, RequestSpec};
use crate::response::ResponseSpec;
use crate::token::AccessToken;
use crate::token_store::TokenStore;

const AUTHORIZATION: &str = "Authorization";
const DEFAULT_REFRESH_PATH: &str = "/api/auth/refresh";

/// Authenticated request client.
///
/// Cheap to share behind an `Arc`; all state lives in the injected
/// [`TokenStore`] and the internal refresh coordinator.
pub struct AuthClient {
    transport: Arc<dyn HttpTransport>,
    tokens: TokenStore,
    refresher: RefreshCoordinator,
    api_root: Url,
    refresh_url: Url,
    redirect: Arc<dyn SigninRedirect>,
}

impl AuthClient {
    /// Starts building a client for the given API root and transport.
    #[must_use]
    pub fn builder(api_root: Url, transport: Arc<dyn HttpTransport>) -> AuthClientBuilder {
        AuthClientBuilder {
            api_root,
            transport,
            tokens: TokenStore::new(),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            redirect: Arc::new(NoRedirect),
        }
    }

    /// Returns the token store this client reads through.
    ///
    /// Login and logout flows use this handle to seed and drop the token.
    #[must_use]
    pub const fn token_store(&self) -> &TokenStore {
        &self.tokens
    }

    /// Returns the API root requests are resolved against.
    #[must_use]
    pub const fn api_root(&self) -> &Url {
        &self.api_root
    }

    /// Issues a request with bearer-token attachment and refresh-on-401.
    ///
    /// The request is retried at most once per call, no matter how many
    /// times 401 recurs; a 401 on the retry is returned as-is.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidTarget`] if the path cannot be resolved.
    /// - [`Error::Transport`] on network failure of the attempt or retry.
    /// - [`Error::SessionExpired`] if the refresh was denied; the token
    ///   store has been cleared and the sign-in redirect fired.
    pub async fn fetch(&self, request: RequestSpec) -> Result<ResponseSpec> {
        let snapshot = self.tokens.snapshot().await;
        let prepared = self.prepare(&request, snapshot.token.as_ref())?;

        tracing::debug!(method = %prepared.method, url = %prepared.url, "issuing request");
        let response = self.transport.execute(&prepared).await?;
        if !response.status.is_unauthorized() {
            return Ok(response);
        }

        tracing::debug!(url = %prepared.url, "request denied with 401, refreshing session");
        match self
            .refresher
            .refresh(
                self.transport.as_ref(),
                &self.refresh_url,
                &self.tokens,
                snapshot.epoch,
                request.timeout,
            )
            .await
        {
            Ok(token) => {
                let retry = self.prepare(&request, Some(&token))?;
                // Single retry; a second 401 passes through untouched.
                Ok(self.transport.execute(&retry).await?)
            }
            Err(err) => {
                tracing::warn!(error = %err, "session could not be restored, redirecting to sign-in");
                self.tokens.clear().await;
                self.redirect.redirect_to_signin();
                Err(Error::SessionExpired(err))
            }
        }
    }

    /// Resolves a spec into one attempt's worth of request.
    ///
    /// Caller-supplied `Authorization` headers are dropped so each attempt
    /// carries at most one, owned by this client; when no token is held
    /// the header is omitted entirely.
    fn prepare(
        &self,
        spec: &RequestSpec,
        token: Option<&AccessToken>,
    ) -> Result<PreparedRequest> {
        let url = self
            .api_root
            .join(&spec.path)
            .map_err(|e| Error::InvalidTarget(format!("{e}: {}", spec.path)))?;

        let mut headers: Vec<Header> = spec
            .headers
            .iter()
            .filter(|h| !h.is(AUTHORIZATION))
            .cloned()
            .collect();
        if let Some(token) = token {
            headers.push(Header::new(
                AUTHORIZATION,
                format!("Bearer {}", token.as_str()),
            ));
        }

        Ok(PreparedRequest {
            method: spec.method,
            url,
            headers,
            body: spec.body.clone(),
            timeout: spec.timeout,
        })
    }
}

/// Builder for [`AuthClient`].
pub struct AuthClientBuilder {
    api_root: Url,
    transport: Arc<dyn HttpTransport>,
    tokens: TokenStore,
    refresh_path: String,
    redirect: Arc<dyn SigninRedirect>,
}

impl AuthClientBuilder {
    /// Uses an existing token store (for sharing with login/logout flows).
    #[must_use]
    pub fn token_store(mut self, tokens: TokenStore) -> Self {
        self.tokens = tokens;
        self
    }

    /// Overrides the refresh endpoint path (default `/api/auth/refresh`).
    #[must_use]
    pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    /// Sets the handler fired when the session cannot be restored.
    #[must_use]
    pub fn on_session_expired(mut self, redirect: Arc<dyn SigninRedirect>) -> Self {
        self.redirect = redirect;
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTarget`] if the refresh path cannot be
    /// resolved against the API root.
    pub fn build(self) -> Result<AuthClient> {
        let refresh_url = self
            .api_root
            .join(&self.refresh_path)
            .map_err(|e| Error::InvalidTarget(format!("{e}: {}", self.refresh_path)))?;

        Ok(AuthClient {
            transport: self.transport,
            tokens: self.tokens,
            refresher: RefreshCoordinator::new(),
            api_root: self.api_root,
            refresh_url,
            redirect: self.redirect,
        })
    }
}
