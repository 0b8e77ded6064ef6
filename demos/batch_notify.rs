use fcm_notify::notifications::NotificationIntent;
use fcm_notify::{ClientConfiguration, Error, FcmClient};
use std::time::Duration;
use tracing::{Level, info, warn};

const LOG_TARGET: &str = "fcm_notify_batch_example";

const CLIENT_TOML_CONFIG: &str = r#"
    [client]
    project_id = "my-project"
    concurrency = 4

    [client.credentials]
    type = "token"
    token = "ya29.access-token"
"#;

const PARAMS_JSON: &[&str] = &[
    r#"{"fcm_token": "token-1", "notification_title": "Hello", "dry_run": true}"#,
    r#"{"topic_name": "news", "data_payload": {"story": "42"}, "dry_run": true}"#,
    r#"{"topic_condition": "'a' in topics && 'b' in topics", "notification_body": "Both", "dry_run": true}"#,
];

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    let config = ClientConfiguration::try_from(CLIENT_TOML_CONFIG)?;
    let client = FcmClient::with_http(config)?;
    let intents = PARAMS_JSON.iter().map(NotificationIntent::from_json).collect::<Result<Vec<_>, _>>()?;

    let results = client.notify_batch_concurrent(&intents, Some(Duration::from_secs(5)), None).await?;
    for (index, result) in results.iter().enumerate() {
        match result {
            Ok(delivery) => info!(target: LOG_TARGET, "{}: {:?}", index, delivery.message_ids()),
            Err(error) => warn!(target: LOG_TARGET, "{}: {}", index, error),
        }
    }

    Ok(())
}
