use crate::auth::{Authenticator, Credential};
use crate::configuration::ClientConfiguration;
use crate::notifications::NotificationIntent;
use crate::payload::build;
use crate::response::{DeliveryResult, TransportError, interpret};
use crate::transport::{Transport, TransportRequest};
use crate::{Error, LIB_LOG_TARGET};
use futures_util::StreamExt;
use futures_util::stream;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Results of a batch send, aligned with the input intents.
pub type BatchResults = Vec<Result<DeliveryResult, Error>>;

/// Sends notifications to FCM through a [`Transport`] using credentials from an [`Authenticator`].
#[derive(Debug, Clone)]
pub struct FcmClient {
    config: ClientConfiguration,
    transport: Box<dyn Transport>,
}

impl FcmClient {
    /// Create a new `FcmClient` from a [`ClientConfiguration`] and [`Transport`].
    pub fn new<T: Transport + 'static>(config: ClientConfiguration, transport: T) -> Self {
        Self { config, transport: Box::new(transport) }
    }

    /// Create a new `FcmClient` using the reqwest backed [`HttpTransport`][crate::transport::http::HttpTransport].
    #[cfg(feature = "http-client")]
    pub fn with_http(config: ClientConfiguration) -> Result<Self, Error> {
        Ok(Self::new(config, crate::transport::http::HttpTransport::new()?))
    }

    /// Return the [`ClientConfiguration`].
    pub fn configuration(&self) -> &ClientConfiguration {
        &self.config
    }

    /// Send a single notification.
    ///
    /// The call is bounded by the intent's timeout, or the configured default when it has none.
    pub async fn notify(&self, intent: &NotificationIntent) -> Result<DeliveryResult, Error> {
        let credential = self.credentials().await?;
        let timeout = intent.timeout().unwrap_or(self.config.timeout());
        self.send_one(intent, &credential, timeout).await
    }

    /// Send each notification one after another.
    ///
    /// Per item failures are returned in place, only a credential failure before the first send
    /// fails the whole batch.
    pub async fn notify_batch(
        &self,
        intents: &[NotificationIntent],
        timeout: Option<Duration>,
    ) -> Result<BatchResults, Error> {
        if intents.is_empty() {
            return Ok(Vec::new());
        }

        let credential = self.credentials().await?;
        let timeout = timeout.unwrap_or(self.config.batch_timeout());
        info!(target: LIB_LOG_TARGET, "Sending batch of {} notifications", intents.len());

        let mut results = Vec::with_capacity(intents.len());
        for (index, intent) in intents.iter().enumerate() {
            let result = self.send_one(intent, &credential, intent.timeout().unwrap_or(timeout)).await;
            log_item(index, &result);
            results.push(result);
        }
        Ok(results)
    }

    /// Send notifications with at most `limit` in flight at once.
    ///
    /// Every item carries its own timeout so one slow recipient never cancels the others. Results
    /// come back in the same order as `intents`. `limit` defaults to the configured concurrency.
    pub async fn notify_batch_concurrent(
        &self,
        intents: &[NotificationIntent],
        timeout: Option<Duration>,
        limit: Option<usize>,
    ) -> Result<BatchResults, Error> {
        if intents.is_empty() {
            return Ok(Vec::new());
        }

        let credential = self.credentials().await?;
        let timeout = timeout.unwrap_or(self.config.batch_timeout());
        let limit = limit.unwrap_or(self.config.concurrency()).max(1);
        info!(
            target: LIB_LOG_TARGET,
            "Sending batch of {} notifications with concurrency {}",
            intents.len(),
            limit
        );

        let credential = &credential;
        let mut slots: Vec<Option<Result<DeliveryResult, Error>>> = (0..intents.len()).map(|_| None).collect();
        let mut completed = stream::iter(intents.iter().enumerate())
            .map(|(index, intent)| async move {
                let result = self.send_one(intent, credential, intent.timeout().unwrap_or(timeout)).await;
                log_item(index, &result);
                (index, result)
            })
            .buffer_unordered(limit);

        while let Some((index, result)) = completed.next().await {
            slots[index] = Some(result);
        }

        Ok(slots
            .into_iter()
            .map(|slot| slot.unwrap_or_else(|| Err(Error::server("batch item was never dispatched"))))
            .collect())
    }

    async fn send_one(
        &self,
        intent: &NotificationIntent,
        credential: &Credential,
        timeout: Duration,
    ) -> Result<DeliveryResult, Error> {
        let payload = build(intent)?;
        debug!(target: LIB_LOG_TARGET, "FCM Payload: {}", payload.to_json()?);

        let headers = vec![
            ("Authorization".to_string(), credential.header_value()),
            ("Content-Type".to_string(), "application/json".to_string()),
        ];
        let request = TransportRequest::new(self.config.send_url(), headers, payload.to_vec()?, timeout);

        let response = match tokio::time::timeout(timeout, self.transport.send(request)).await {
            Ok(response) => response,
            Err(_) => Err(TransportError::Timeout),
        };
        interpret(response)
    }

    /// Credentials are bounded by the configured single send timeout.
    async fn credentials(&self) -> Result<Credential, Error> {
        let authenticator: Arc<dyn Authenticator> = self.config.authenticator();
        let timeout = self.config.timeout();
        match tokio::time::timeout(timeout, authenticator.credentials()).await {
            Ok(credential) => credential,
            Err(_) => Err(Error::server(format!("timed out after {:?} acquiring credentials", timeout))),
        }
    }
}

fn log_item(index: usize, result: &Result<DeliveryResult, Error>) {
    match result {
        Ok(delivery) => debug!(target: LIB_LOG_TARGET, "Batch item {} delivered: {:?}", index, delivery.message_ids()),
        Err(error) => warn!(target: LIB_LOG_TARGET, "Batch item {} failed: {}", index, error),
    }
}
