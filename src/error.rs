use thiserror::Error;
use thiserror_ext::Construct;

/// Errors returned by fcm-notify library.
#[derive(Error, Debug, Construct)]
pub enum Error {
    /// Caller supplied parameters are malformed or ambiguous. Nothing was sent.
    #[error("Invalid notification: {0}")]
    Validation(String),

    /// Credentials were missing or rejected by FCM.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// FCM or the transport reported a transient failure. Safe to retry.
    #[error("FCM server error: {0}")]
    Server(String),

    /// FCM rejected the content of the payload.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The registration token is no longer valid for the target app.
    #[error("Registration token not registered: {0}")]
    NotRegistered(String),

    /// FCM answered with a body this client does not know how to read.
    #[error("Unexpected FCM response: {0}")]
    UnexpectedResponse(String),

    /// Validation failed for a client configuration.
    #[error("Invalid Client Configuration: {0}")]
    InvalidConfiguration(String),

    /// No project id was configured and none could be taken from the credentials.
    #[error("A project id must be configured or provided by the credentials")]
    MissingProjectId,

    // ### Converting from other error types ###
    /// Pass-thru [`std::io::Error`].
    #[construct(skip)]
    #[error("std::io Error: {0}")]
    IOError(#[from] std::io::Error),

    /// Pass-thru `serde_json::Error`.
    #[construct(skip)]
    #[error("Serde_json Error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    #[cfg(feature = "parse-cfg")]
    /// Pass-thru `toml::de::Error`.
    #[construct(skip)]
    #[error("Serde Toml Error: {0}")]
    SerdeTomlError(#[from] toml::de::Error),

    #[cfg(feature = "client")]
    /// Pass-thru `url::ParseError`.
    #[construct(skip)]
    #[error("Url Parse Error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[cfg(feature = "http-client")]
    /// Pass-thru `reqwest::Error`.
    #[construct(skip)]
    #[error("Reqwest Error: {0}")]
    ReqwestError(#[from] reqwest::Error),
}

impl Error {
    /// Whether the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Server(_))
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn only_server_errors_are_retryable() {
        assert!(Error::server("timeout").is_retryable());
        assert!(!Error::authentication("401").is_retryable());
        assert!(!Error::invalid_data("bad").is_retryable());
        assert!(!Error::validation("no target").is_retryable());
        assert!(!Error::unexpected_response("drift").is_retryable());
    }

    #[test]
    fn constructor_messages() {
        assert_eq!(Error::validation("no target").to_string(), "Invalid notification: no target");
        assert_eq!(Error::MissingProjectId.to_string(), "A project id must be configured or provided by the credentials");
    }
}
