use clap::Parser;
use fcm_notify::notifications::NotificationIntent;
use fcm_notify::{ClientConfiguration, Error, FcmClient};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{Level, error, info};

const LOG_TARGET: &str = "fcm_notify_cli";

#[derive(Parser, Debug)]
#[clap(name = "fcm-notify", author, version, about = "Send a single FCM notification", long_about = None)]
struct CliArgs {
    /// Path to fcm-notify client configuration file
    #[clap(short, long, value_parser)]
    configuration: Option<PathBuf>,
    /// Set the logging level [default: INFO]
    #[clap(short, long, value_parser)]
    log_level: Option<Level>,
    /// Device registration token to send to
    #[clap(long, value_parser)]
    token: Option<String>,
    /// Topic name to send to
    #[clap(long, value_parser)]
    topic: Option<String>,
    /// Topic condition expression to send to
    #[clap(long, value_parser)]
    condition: Option<String>,
    /// Notification title
    #[clap(long, value_parser)]
    title: Option<String>,
    /// Notification body
    #[clap(long, value_parser)]
    body: Option<String>,
    /// Notification image URL
    #[clap(long, value_parser)]
    image: Option<String>,
    /// Data payload entry as key=value, may be repeated
    #[clap(short, long, value_parser = parse_data_entry)]
    data: Vec<(String, String)>,
    /// Ask FCM to validate without delivering
    #[clap(long)]
    dry_run: bool,
    /// Request timeout in seconds
    #[clap(long, value_parser)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() {
    let cli = CliArgs::parse();
    tracing_subscriber::fmt().with_max_level(cli.log_level.unwrap_or(Level::INFO)).init();

    if let Err(error) = run(cli).await {
        error!(target: LOG_TARGET, "{}", error)
    }
}

async fn run(args: CliArgs) -> Result<(), Error> {
    let config = {
        let config_path = match args.configuration.clone() {
            Some(path) => path,
            None => default_config_path()?,
        };

        info!(target: LOG_TARGET, "Reading configuration from: {}", config_path.display());
        ClientConfiguration::try_from(std::fs::read_to_string(config_path)?.as_str())?
    };

    let client = FcmClient::with_http(config)?;
    let result = client.notify(&intent_from_args(args)).await?;
    println!("{}", result.to_json()?);
    Ok(())
}

fn intent_from_args(args: CliArgs) -> NotificationIntent {
    let mut intent = NotificationIntent::new().with_dry_run(args.dry_run);
    if let Some(token) = args.token {
        intent = intent.with_token(token);
    }
    if let Some(topic) = args.topic {
        intent = intent.with_topic(topic);
    }
    if let Some(condition) = args.condition {
        intent = intent.with_condition(condition);
    }
    if let Some(title) = args.title {
        intent = intent.with_title(title);
    }
    if let Some(body) = args.body {
        intent = intent.with_body(body);
    }
    if let Some(image) = args.image {
        intent = intent.with_image(image);
    }
    for (key, value) in args.data {
        intent = intent.with_data_entry(key, value);
    }
    if let Some(secs) = args.timeout_secs {
        intent = intent.with_timeout(Duration::from_secs(secs));
    }
    intent
}

fn default_config_path() -> Result<PathBuf, Error> {
    directories::ProjectDirs::from("com", "fcm-notify", "fcm-notify")
        .map(|dirs| dirs.config_dir().join("client.toml"))
        .ok_or_else(|| Error::invalid_configuration("unable to determine a default configuration directory"))
}

fn parse_data_entry(entry: &str) -> Result<(String, String), String> {
    entry
        .split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", entry))
}
