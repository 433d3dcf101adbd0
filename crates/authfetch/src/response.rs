//! Response types.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::de::DeserializeOwned;

/// HTTP status code with semantic helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// 401 Unauthorized, the one status this library interprets.
    pub const UNAUTHORIZED: Self = Self(401);

    /// Creates a new `StatusCode`.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric status code.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns true if this is a 2xx success status.
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Returns true if this is exactly 401.
    #[must_use]
    pub const fn is_unauthorized(self) -> bool {
        self.0 == 401
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A complete HTTP response: status, headers, body bytes, and timing.
///
/// Bodies are fully read by the transport before the response is returned,
/// so passing a response through (or discarding it before a retry) never
/// invalidates anything.
#[derive(Debug, Clone)]
pub struct ResponseSpec {
    /// Response status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body bytes.
    pub body: Vec<u8>,
    /// Wall-clock duration of the network call.
    pub duration: Duration,
}

impl ResponseSpec {
    /// Creates a response.
    #[must_use]
    pub fn new(
        status: u16,
        headers: HashMap<String, String>,
        body: Vec<u8>,
        duration: Duration,
    ) -> Self {
        Self {
            status: StatusCode::new(status),
            headers,
            body,
            duration,
        }
    }

    /// Returns the body decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserializes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error if the body is not valid
    /// JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_helpers() {
        assert!(StatusCode::new(204).is_success());
        assert!(!StatusCode::new(301).is_success());
        assert!(StatusCode::new(401).is_unauthorized());
        assert_eq!(StatusCode::UNAUTHORIZED.as_u16(), 401);
    }

    #[test]
    fn test_json_body() {
        let response = ResponseSpec::new(
            200,
            HashMap::new(),
            br#"{"color":"red"}"#.to_vec(),
            Duration::from_millis(5),
        );

        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["color"], "red");
    }
}
