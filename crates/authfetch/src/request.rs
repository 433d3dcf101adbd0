//! Request description types.
//!
//! A [`RequestSpec`] is what callers hand to the client: a method, a path
//! relative to the configured API root, headers, an optional body, and an
//! optional per-call deadline. The client turns it into a
//! [`PreparedRequest`] (absolute URL plus a resolved Authorization header)
//! for each attempt; the spec itself is never consumed, so a 401 retry
//! reissues exactly the same bytes.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use url::Url;

use crate::error::Error;

/// Supported HTTP methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpMethod {
    /// HTTP GET method
    #[default]
    Get,
    /// HTTP POST method
    Post,
    /// HTTP PUT method
    Put,
    /// HTTP PATCH method
    Patch,
    /// HTTP DELETE method
    Delete,
    /// HTTP HEAD method
    Head,
    /// HTTP OPTIONS method
    Options,
}

impl HttpMethod {
    /// Returns the method as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single HTTP header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Header name.
    pub name: String,
    /// Header value.
    pub value: String,
}

impl Header {
    /// Creates a header.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Case-insensitive name match.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// A caller-supplied request, addressed relative to the API root.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// HTTP method.
    pub method: HttpMethod,
    /// Target path, joined against the client's API root (an absolute URL
    /// is also accepted and used as-is).
    pub path: String,
    /// Caller headers. Any `Authorization` entry is stripped before the
    /// store's token is attached; the client owns that header.
    pub headers: Vec<Header>,
    /// Request body bytes, reissued verbatim on retry.
    pub body: Option<Vec<u8>>,
    /// Optional deadline applied to each network call made on behalf of
    /// this request (initial attempt, refresh, retry).
    pub timeout: Option<Duration>,
}

impl RequestSpec {
    /// Creates a request with the given method and path.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Creates a PUT request.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    /// Creates a PATCH request.
    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Adds a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header::new(name, value));
        self
    }

    /// Sets a raw body with the given content type.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>, content_type: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self.headers.push(Header::new("Content-Type", content_type));
        self
    }

    /// Sets a JSON body serialized from `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBody`] if `value` cannot be serialized.
    pub fn json<T: Serialize>(self, value: &T) -> Result<Self, Error> {
        let bytes = serde_json::to_vec(value).map_err(|e| Error::InvalidBody(e.to_string()))?;
        Ok(self.body(bytes, "application/json"))
    }

    /// Sets the per-call deadline.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A fully resolved request as handed to an
/// [`HttpTransport`](crate::HttpTransport): absolute URL, final headers
/// (including at most one `Authorization`), body bytes, and deadline.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute target URL.
    pub url: Url,
    /// Final header set for this attempt.
    pub headers: Vec<Header>,
    /// Body bytes, if any.
    pub body: Option<Vec<u8>>,
    /// Deadline for this network call.
    pub timeout: Option<Duration>,
}

impl PreparedRequest {
    /// Returns the value of the named header, case-insensitively.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.is(name))
            .map(|h| h.value.as_str())
    }
}
