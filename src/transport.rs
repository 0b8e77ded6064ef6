//! Transports that carry a built request to FCM and hand back the raw reply.

#[cfg(feature = "http-client")]
pub mod http;

use crate::response::{RawResponse, TransportError};
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;
use std::time::Duration;

/// A fully prepared POST request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    url: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    timeout: Duration,
}

/// Performs the network call for a [`TransportRequest`].
///
/// A failure to obtain any response is a [`TransportError`]. Every status code, errors included,
/// comes back as a [`RawResponse`].
#[async_trait]
pub trait Transport: DynClone + Send + Sync + Debug {
    /// Send the request and return the status and body.
    async fn send(&self, request: TransportRequest) -> Result<RawResponse, TransportError>;
}

dyn_clone::clone_trait_object!(Transport);

impl TransportRequest {
    /// Create a new `TransportRequest`.
    pub fn new<S: AsRef<str>>(url: S, headers: Vec<(String, String)>, body: Vec<u8>, timeout: Duration) -> Self {
        Self { url: url.as_ref().into(), headers, body, timeout }
    }

    /// Return the target URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Return the request headers.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Return the value of the first header with a case-insensitive match on `name`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(key, _)| key.eq_ignore_ascii_case(name)).map(|(_, value)| value.as_str())
    }

    /// Return the request body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Return the timeout for this call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
