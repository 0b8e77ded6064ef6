//! TOML representation of a [`ClientConfiguration`].
//!
//! # Configuration Example
//! ```toml
//! [client]
//! project_id = "my-project"
//! timeout_secs = 120
//! batch_timeout_secs = 5
//! concurrency = 10
//!
//! [client.credentials]
//! type = "service_account"
//! path = '/path/to/service-account.json'
//! ```

use crate::Error;
use crate::auth::{Authenticator, StaticToken};
use crate::configuration::ClientConfiguration;
use serde::Deserialize;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

/// A data structure that can be deserialized and converted into an [`Authenticator`].
#[typetag::deserialize(tag = "type")]
pub trait CredentialsConfig: Debug {
    /// Convert this `CredentialsConfig` into an [`Authenticator`].
    fn to_authenticator(&self) -> Result<Arc<dyn Authenticator>, Error>;

    /// Perform any necessary validations on the configuration to ensure it's usable.
    fn validate(&self) -> Result<(), Error>;
}

/// Client configuration parsed from TOML that handles any [`CredentialsConfig`].
#[derive(Deserialize, Debug)]
pub struct ClientConfigFileParser {
    client: ClientConfigFile,
}

/// Serde compatible representation of [`ClientConfiguration`]
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct ClientConfigFile {
    project_id: Option<String>,
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
    batch_timeout_secs: Option<u64>,
    concurrency: Option<usize>,
    credentials: Box<dyn CredentialsConfig>,
}

/// Data structure to represent a pre-acquired access token [`CredentialsConfig`].
#[derive(Debug, Deserialize, PartialEq, Eq, Hash, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct TokenConfigFile {
    token: String,
    project_id: Option<String>,
}

/// Data structure to represent a service account key file [`CredentialsConfig`].
#[cfg(feature = "service-account")]
#[derive(Debug, Deserialize, PartialEq, Eq, Hash, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct ServiceAccountConfigFile {
    path: String,
}

impl ClientConfigFileParser {
    /// Parse [`ClientConfiguration`] from provided TOML.
    pub fn from(string: &str) -> Result<ClientConfiguration, Error> {
        let parsed: ClientConfigFileParser = toml::from_str(string)?;
        parsed.client.try_into()
    }
}

impl TryFrom<ClientConfigFile> for ClientConfiguration {
    type Error = Error;

    fn try_from(value: ClientConfigFile) -> Result<Self, Self::Error> {
        value.credentials.validate()?;
        let authenticator = value.credentials.to_authenticator()?;
        let mut config = ClientConfiguration::new(value.project_id.as_deref(), authenticator)?;

        if let Some(endpoint) = value.endpoint {
            config = config.with_endpoint(endpoint)?;
        }
        if let Some(secs) = value.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs))?;
        }
        if let Some(secs) = value.batch_timeout_secs {
            config = config.with_batch_timeout(Duration::from_secs(secs))?;
        }
        if let Some(concurrency) = value.concurrency {
            config = config.with_concurrency(concurrency)?;
        }
        Ok(config)
    }
}

#[typetag::deserialize(name = "token")]
impl CredentialsConfig for TokenConfigFile {
    fn to_authenticator(&self) -> Result<Arc<dyn Authenticator>, Error> {
        let token = StaticToken::new(&self.token);
        Ok(match &self.project_id {
            Some(project_id) => Arc::new(token.with_project_id(project_id)),
            None => Arc::new(token),
        })
    }

    fn validate(&self) -> Result<(), Error> {
        match self.token.trim().is_empty() {
            true => Err(Error::invalid_configuration("Token credentials token is blank")),
            false => Ok(()),
        }
    }
}

#[cfg(feature = "service-account")]
#[typetag::deserialize(name = "service_account")]
impl CredentialsConfig for ServiceAccountConfigFile {
    fn to_authenticator(&self) -> Result<Arc<dyn Authenticator>, Error> {
        use crate::auth::service_account::ServiceAccount;
        Ok(Arc::new(ServiceAccount::from_file(&self.path)?))
    }

    fn validate(&self) -> Result<(), Error> {
        match self.path.trim().is_empty() {
            true => Err(Error::invalid_configuration("Service account configuration path is blank")),
            false => Ok(()),
        }
    }
}
