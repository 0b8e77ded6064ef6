#[cfg(feature = "parse-cfg")]
pub mod client_configuration_file;

use crate::Error;
use crate::auth::Authenticator;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub(crate) const DEFAULT_ENDPOINT: &str = "https://fcm.googleapis.com";
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
pub(crate) const DEFAULT_BATCH_TIMEOUT: Duration = Duration::from_secs(5);
pub(crate) const DEFAULT_CONCURRENCY: usize = 10;

/// Client configuration that can be used to create an [`FcmClient`][crate::FcmClient].
#[derive(Debug, Clone)]
pub struct ClientConfiguration {
    project_id: String,
    endpoint: Url,
    timeout: Duration,
    batch_timeout: Duration,
    concurrency: usize,
    authenticator: Arc<dyn Authenticator>,
}

impl ClientConfiguration {
    /// Create a new `ClientConfiguration`.
    ///
    /// When `project_id` is `None` the project id of the [`Authenticator`] is used.
    pub fn new(project_id: Option<&str>, authenticator: Arc<dyn Authenticator>) -> Result<Self, Error> {
        let project_id = match project_id.filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => authenticator.project_id().filter(|id| !id.is_empty()).ok_or(Error::MissingProjectId)?,
        };

        Ok(Self {
            project_id,
            endpoint: Url::parse(DEFAULT_ENDPOINT)?,
            timeout: DEFAULT_TIMEOUT,
            batch_timeout: DEFAULT_BATCH_TIMEOUT,
            concurrency: DEFAULT_CONCURRENCY,
            authenticator,
        })
    }

    /// Send to a different base endpoint, e.g. an emulator.
    pub fn with_endpoint<S: AsRef<str>>(mut self, endpoint: S) -> Result<Self, Error> {
        let url = Url::parse(endpoint.as_ref())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_configuration(format!("unsupported endpoint scheme '{}'", url.scheme())));
        }
        self.endpoint = url;
        Ok(self)
    }

    /// Default timeout for a single `notify` call.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, Error> {
        self.timeout = non_zero_duration("timeout", timeout)?;
        Ok(self)
    }

    /// Default per item timeout for batch sends.
    pub fn with_batch_timeout(mut self, timeout: Duration) -> Result<Self, Error> {
        self.batch_timeout = non_zero_duration("batch timeout", timeout)?;
        Ok(self)
    }

    /// Default number of concurrent sends for batches.
    pub fn with_concurrency(mut self, concurrency: usize) -> Result<Self, Error> {
        match concurrency {
            0 => Err(Error::invalid_configuration("concurrency must be at least 1")),
            n => {
                self.concurrency = n;
                Ok(self)
            }
        }
    }

    /// Return the Firebase project id.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Return the base endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Return the URL of the v1 send method for the configured project.
    pub fn send_url(&self) -> String {
        format!("{}/v1/projects/{}/messages:send", self.endpoint.as_str().trim_end_matches('/'), self.project_id)
    }

    /// Return the default single send timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Return the default per item batch timeout.
    pub fn batch_timeout(&self) -> Duration {
        self.batch_timeout
    }

    /// Return the default batch concurrency.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Return the [`Authenticator`].
    pub fn authenticator(&self) -> Arc<dyn Authenticator> {
        self.authenticator.clone()
    }
}

#[cfg(feature = "parse-cfg")]
impl TryFrom<&str> for ClientConfiguration {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        client_configuration_file::ClientConfigFileParser::from(value)
    }
}

fn non_zero_duration(name: &str, duration: Duration) -> Result<Duration, Error> {
    match duration.is_zero() {
        true => Err(Error::invalid_configuration(format!("{} must be greater than zero", name))),
        false => Ok(duration),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticToken;

    fn token() -> Arc<dyn Authenticator> {
        Arc::new(StaticToken::new("token"))
    }

    #[test]
    fn send_url_for_project() {
        let config = ClientConfiguration::new(Some("demo"), token()).unwrap();
        assert_eq!(config.send_url(), "https://fcm.googleapis.com/v1/projects/demo/messages:send");
    }

    #[test]
    fn project_id_from_authenticator() {
        let auth = Arc::new(StaticToken::new("token").with_project_id("from-creds"));
        let config = ClientConfiguration::new(None, auth).unwrap();
        assert_eq!(config.project_id(), "from-creds");
    }

    #[test]
    fn missing_project_id() {
        let config = ClientConfiguration::new(Some(""), token());
        assert!(matches!(config, Err(Error::MissingProjectId)));
    }

    #[test]
    fn custom_endpoint() {
        let config = ClientConfiguration::new(Some("demo"), token())
            .and_then(|c| c.with_endpoint("http://localhost:9099/"))
            .unwrap();
        assert_eq!(config.send_url(), "http://localhost:9099/v1/projects/demo/messages:send");
    }

    #[test]
    fn invalid_endpoint_scheme() {
        let config = ClientConfiguration::new(Some("demo"), token()).and_then(|c| c.with_endpoint("ftp://example.com"));
        assert!(matches!(config, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn zero_values_rejected() {
        let config = ClientConfiguration::new(Some("demo"), token()).unwrap();
        assert!(config.clone().with_concurrency(0).is_err());
        assert!(config.clone().with_timeout(Duration::ZERO).is_err());
        assert!(config.with_batch_timeout(Duration::ZERO).is_err());
    }
}
