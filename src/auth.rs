//! Credentials attached to every request sent to FCM.

#[cfg(feature = "service-account")]
pub mod service_account;

use crate::Error;
use async_trait::async_trait;
use std::fmt::{Debug, Formatter};

/// Supplies the credential used to authorize a send.
///
/// Implementations may cache and refresh tokens, the client asks once per `notify` call
/// and once per batch.
#[async_trait]
pub trait Authenticator: Send + Sync + Debug {
    /// Return a currently valid [`Credential`].
    async fn credentials(&self) -> Result<Credential, Error>;

    /// Project id associated with these credentials, if they carry one.
    fn project_id(&self) -> Option<String> {
        None
    }
}

/// An OAuth2 access token sent as a bearer `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    access_token: String,
}

/// [`Authenticator`] for a token acquired outside this library.
#[derive(Clone)]
pub struct StaticToken {
    credential: Credential,
    project_id: Option<String>,
}

impl Credential {
    /// Create a new `Credential` from an access token.
    pub fn bearer<S: AsRef<str>>(access_token: S) -> Self {
        Self { access_token: access_token.as_ref().into() }
    }

    /// Return the value for the `Authorization` header.
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

// Keep tokens out of logs.
impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential").field("access_token", &"<redacted>").finish()
    }
}

impl StaticToken {
    /// Create a new `StaticToken`.
    pub fn new<S: AsRef<str>>(access_token: S) -> Self {
        Self { credential: Credential::bearer(access_token), project_id: None }
    }

    /// Associate a project id with this token.
    pub fn with_project_id<S: AsRef<str>>(mut self, project_id: S) -> Self {
        self.project_id = Some(project_id.as_ref().into());
        self
    }
}

impl Debug for StaticToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticToken").field("project_id", &self.project_id).finish_non_exhaustive()
    }
}

#[async_trait]
impl Authenticator for StaticToken {
    async fn credentials(&self) -> Result<Credential, Error> {
        match self.credential.access_token.is_empty() {
            true => Err(Error::authentication("access token is empty")),
            false => Ok(self.credential.clone()),
        }
    }

    fn project_id(&self) -> Option<String> {
        self.project_id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_token_header() {
        let auth = StaticToken::new("ya29.token");
        let credential = auth.credentials().await.unwrap();
        assert_eq!(credential.header_value(), "Bearer ya29.token");
    }

    #[tokio::test]
    async fn empty_static_token_is_rejected() {
        let auth = StaticToken::new("");
        assert!(matches!(auth.credentials().await, Err(Error::Authentication(_))));
    }

    #[test]
    fn credential_debug_is_redacted() {
        let debug = format!("{:?}", Credential::bearer("secret"));
        assert!(!debug.contains("secret"));
    }
}
