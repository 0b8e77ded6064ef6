//! HTTP [`Transport`] implementation backed by reqwest.

use crate::response::{RawResponse, TransportError};
use crate::transport::{Transport, TransportRequest};
use crate::{Error, LIB_LOG_TARGET};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

/// Data structure to represent the reqwest based [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a new `HttpTransport` using rustls.
    pub fn new() -> Result<Self, Error> {
        let client = Client::builder().use_rustls_tls().build()?;
        Ok(Self { client })
    }

    /// Create a new `HttpTransport` from an already configured client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<RawResponse, TransportError> {
        let TransportRequest { url, headers, body, timeout } = request;
        let mut builder = self.client.post(url.as_str()).timeout(timeout).body(body);
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        debug!(target: LIB_LOG_TARGET, "HTTP Transport Response - status: {} url: {}", status, response.url());
        let body = response.bytes().await.map_err(transport_error)?;

        Ok(RawResponse::new(status, body.to_vec()))
    }
}

fn transport_error(error: reqwest::Error) -> TransportError {
    warn!(target: LIB_LOG_TARGET, "HTTP Transport Error: {}", error);
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_connect() {
        TransportError::Connect(error.to_string())
    } else {
        TransportError::Other(error.to_string())
    }
}
