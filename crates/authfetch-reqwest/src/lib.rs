//! reqwest transport adapter for `authfetch`.
//!
//! Implements the [`HttpTransport`] port on `reqwest::Client` with a
//! cookie store enabled, so the HTTP-only refresh credential set by the
//! backend rides along on every request (the equivalent of the browser's
//! `credentials: "include"` fetch mode).

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

use authfetch::{HttpMethod, HttpTransport, PreparedRequest, ResponseSpec, TransportError};
use reqwest::{Client, Method};

/// HTTP transport backed by reqwest.
///
/// Default configuration:
/// - Cookie store: enabled (carries the refresh credential)
/// - Follow redirects: up to 10
/// - TLS verification: enabled
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be created.
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(concat!("authfetch/", env!("CARGO_PKG_VERSION")))
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self { client })
    }

    /// Creates a transport around a custom reqwest client.
    ///
    /// The client should have its cookie store enabled, or the refresh
    /// credential will never reach the backend.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Converts the port's method to a reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Options => Method::OPTIONS,
        }
    }

    /// Maps reqwest errors to the port's `TransportError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> TransportError {
        let host = || {
            error
                .url()
                .and_then(|u| u.host_str())
                .unwrap_or("unknown")
                .to_string()
        };

        if error.is_timeout() {
            return TransportError::Timeout { timeout_ms };
        }

        if error.is_connect() {
            let message = error.to_string();
            let lowered = message.to_lowercase();
            if lowered.contains("dns") || lowered.contains("resolve") {
                return TransportError::Dns {
                    host: host(),
                    message,
                };
            }
            if lowered.contains("refused") {
                return TransportError::ConnectionRefused { host: host() };
            }
            return TransportError::ConnectionFailed(message);
        }

        TransportError::Other(error.to_string())
    }
}

impl HttpTransport for ReqwestTransport {
    fn execute<'a>(
        &'a self,
        request: &'a PreparedRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ResponseSpec, TransportError>> + Send + 'a>> {
        let method = Self::to_reqwest_method(request.method);
        let url = request.url.clone();
        let timeout_ms = request
            .timeout
            .map_or(0, |t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX));

        Box::pin(async move {
            let start = Instant::now();

            let mut builder = self.client.request(method, url.as_str());
            if let Some(timeout) = request.timeout {
                builder = builder.timeout(timeout);
            }
            for header in &request.headers {
                builder = builder.header(&header.name, &header.value);
            }
            if let Some(body) = &request.body {
                builder = builder.body(body.clone());
            }

            tracing::debug!(method = %request.method, url = %url, "executing request");
            let response = builder
                .send()
                .await
                .map_err(|e| Self::map_error(&e, timeout_ms))?;

            let status = response.status().as_u16();
            let headers: HashMap<String, String> = response
                .headers()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
                .collect();

            let body = response
                .bytes()
                .await
                .map_err(|e| TransportError::Other(format!("failed to read body: {e}")))?
                .to_vec();

            Ok(ResponseSpec::new(status, headers, body, start.elapsed()))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Get),
            Method::GET
        );
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Post),
            Method::POST
        );
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Delete),
            Method::DELETE
        );
    }

    #[test]
    fn test_transport_creation() {
        assert!(ReqwestTransport::new().is_ok());
    }
}
