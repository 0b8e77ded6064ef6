use fcm_notify::auth::service_account::ServiceAccount;
use fcm_notify::notifications::NotificationIntent;
use fcm_notify::{ClientConfiguration, Error, FcmClient};
use std::sync::Arc;
use tracing::{Level, info};

const LOG_TARGET: &str = "fcm_notify_send_example";

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    let key_path = std::env::var("GOOGLE_APPLICATION_CREDENTIALS")
        .map_err(|_| Error::invalid_configuration("GOOGLE_APPLICATION_CREDENTIALS is not set"))?;
    let token = std::env::var("FCM_DEVICE_TOKEN")
        .map_err(|_| Error::invalid_configuration("FCM_DEVICE_TOKEN is not set"))?;

    let account = ServiceAccount::from_file(key_path)?;
    let config = ClientConfiguration::new(None, Arc::new(account))?;
    let client = FcmClient::with_http(config)?;

    let intent = NotificationIntent::new()
        .with_token(token)
        .with_title("Example")
        .with_body("Sent by the fcm-notify example")
        .with_data_entry("source", "example")
        .with_dry_run(true);

    let result = client.notify(&intent).await?;
    info!(target: LOG_TARGET, "Delivered: {:?}", result.message_ids());

    Ok(())
}
