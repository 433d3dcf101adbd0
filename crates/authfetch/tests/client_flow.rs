//! End-to-end flows through the public API, over an in-memory transport
//! that routes by URL instead of replaying a fixed script, so concurrent
//! calls stay deterministic.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use authfetch::{
    AccessToken, AuthClient, HttpTransport, PreparedRequest, RequestSpec, ResponseSpec,
    TransportError,
};
use pretty_assertions::assert_eq;
use url::Url;

const FRESH_TOKEN: &str = "xyz";

/// Backend stand-in: answers the refresh endpoint with a fresh token and
/// every other path with 200 only when that fresh token is presented.
struct RoutingTransport {
    refresh_calls: AtomicUsize,
    api_calls: AtomicUsize,
}

impl RoutingTransport {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            refresh_calls: AtomicUsize::new(0),
            api_calls: AtomicUsize::new(0),
        })
    }
}

impl HttpTransport for RoutingTransport {
    fn execute<'a>(
        &'a self,
        request: &'a PreparedRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ResponseSpec, TransportError>> + Send + 'a>> {
        let path = request.url.path().to_string();
        let expected = format!("Bearer {FRESH_TOKEN}");
        let authorized = request.header_value("authorization") == Some(expected.as_str());

        Box::pin(async move {
            // A small yield so concurrent fetches interleave.
            tokio::task::yield_now().await;

            let (status, body) = if path == "/api/auth/refresh" {
                self.refresh_calls.fetch_add(1, Ordering::SeqCst);
                (200, format!(r#"{{"access_token":"{FRESH_TOKEN}"}}"#))
            } else {
                self.api_calls.fetch_add(1, Ordering::SeqCst);
                if authorized {
                    (200, r#"{"ok":true}"#.to_string())
                } else {
                    (401, String::new())
                }
            };

            Ok(ResponseSpec::new(
                status,
                HashMap::new(),
                body.into_bytes(),
                Duration::from_millis(1),
            ))
        })
    }
}

fn client(transport: Arc<RoutingTransport>) -> Arc<AuthClient> {
    let api_root = Url::parse("https://app.example.com").unwrap();
    Arc::new(AuthClient::builder(api_root, transport).build().unwrap())
}

#[tokio::test]
async fn expired_session_recovers_end_to_end() {
    let transport = RoutingTransport::new();
    let client = client(Arc::clone(&transport));
    client.token_store().set(AccessToken::new("abc")).await;

    let response = client.fetch(RequestSpec::get("/api/tickets/7")).await.unwrap();

    assert_eq!(response.status.as_u16(), 200);
    assert_eq!(response.body_text(), r#"{"ok":true}"#);
    assert_eq!(transport.refresh_calls.load(Ordering::SeqCst), 1);
    assert_eq!(transport.api_calls.load(Ordering::SeqCst), 2);
    assert_eq!(
        client.token_store().get().await.unwrap().as_str(),
        FRESH_TOKEN
    );
}

#[tokio::test]
async fn concurrent_401s_share_one_refresh() {
    let transport = RoutingTransport::new();
    let client = client(Arc::clone(&transport));
    client.token_store().set(AccessToken::new("stale")).await;

    let mut handles = Vec::new();
    for i in 0..4 {
        let client = Arc::clone(&client);
        handles.push(tokio::spawn(async move {
            client.fetch(RequestSpec::get(format!("/api/tickets/{i}"))).await
        }));
    }

    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert_eq!(response.status.as_u16(), 200);
    }

    // One expiry, one exchange; every retry reused the shared result.
    assert_eq!(transport.refresh_calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        client.token_store().get().await.unwrap().as_str(),
        FRESH_TOKEN
    );
}

#[tokio::test]
async fn fetch_after_recovery_needs_no_refresh() {
    let transport = RoutingTransport::new();
    let client = client(Arc::clone(&transport));
    client.token_store().set(AccessToken::new("stale")).await;

    client.fetch(RequestSpec::get("/api/tickets/1")).await.unwrap();
    client.fetch(RequestSpec::get("/api/tickets/2")).await.unwrap();

    assert_eq!(transport.refresh_calls.load(Ordering::SeqCst), 1);
    // First call: attempt + retry. Second call: single attempt.
    assert_eq!(transport.api_calls.load(Ordering::SeqCst), 3);
}
