#![warn(missing_docs)]
//! # FCM-Notify
//! A library that builds Firebase Cloud Messaging v1 requests from a loosely specified notification
//! and interprets the reply into a uniform [`DeliveryResult`][crate::response::DeliveryResult].
//!
//! The [`payload`] and [`response`] modules are pure and usable on their own. The `client` feature adds
//! [`FcmClient`], which combines them with a [`Transport`][crate::transport::Transport] and an
//! [`Authenticator`][crate::auth::Authenticator].
//!
//! ## Client Example
//! ```
//! use fcm_notify::notifications::NotificationIntent;
//! use fcm_notify::{ClientConfiguration, Error, FcmClient};
//!
//! const CLIENT_TOML_CONFIG: &str = r#"
//!     [client]
//!     project_id = "my-project"
//!
//!     [client.credentials]
//!     type = "token"
//!     token = "ya29.access-token"
//! "#;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     let config = ClientConfiguration::try_from(CLIENT_TOML_CONFIG)?;
//!     let client = FcmClient::with_http(config)?;
//!
//!     let intent = NotificationIntent::new().with_token("device-registration-token").with_title("Hi");
//!     let result = client.notify(&intent).await?;
//!     println!("{:?}", result.message_ids());
//!
//!     Ok(())
//! }
//! ```

#[cfg(feature = "client")]
pub mod auth;
#[cfg(feature = "client")]
mod client;
#[cfg(feature = "client")]
mod configuration;
mod error;
pub mod notifications;
pub mod payload;
pub mod response;
#[cfg(feature = "client")]
pub mod transport;

#[cfg(feature = "client")]
pub use self::client::{BatchResults, FcmClient};
#[cfg(feature = "client")]
pub use self::configuration::ClientConfiguration;
#[cfg(feature = "parse-cfg")]
pub use self::configuration::client_configuration_file::{ClientConfigFileParser, CredentialsConfig};
pub use self::error::Error;

/// Logging target value used for the library.
pub const LIB_LOG_TARGET: &str = "fcm_notify";
