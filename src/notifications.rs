//! Representation of a single notification request before it is shaped for the wire.

use crate::Error;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// Loosely typed JSON object used for data payloads and platform override blocks.
pub type JsonMap = Map<String, Value>;

/// Everything a caller can say about one notification.
///
/// Exactly one of token, topic or condition has to be supplied for [`build`][crate::payload::build]
/// to succeed. Empty strings and empty maps count as not supplied.
///
/// Deserializes from the keyword style parameter names so batch parameter sets can be read from JSON:
/// ```json
/// {"fcm_token": "abc", "notification_title": "Hi", "data_payload": {"k": "v"}}
/// ```
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationIntent {
    #[serde(default, rename = "fcm_token")]
    token: Option<String>,
    #[serde(default, rename = "topic_name")]
    topic: Option<String>,
    #[serde(default, rename = "topic_condition")]
    condition: Option<String>,
    #[serde(default, rename = "notification_title")]
    title: Option<String>,
    #[serde(default, rename = "notification_body")]
    body: Option<String>,
    #[serde(default, rename = "notification_image")]
    image: Option<String>,
    #[serde(default, rename = "data_payload")]
    data: Option<JsonMap>,
    #[serde(default, rename = "android_config")]
    android: Option<JsonMap>,
    #[serde(default, rename = "apns_config")]
    apns: Option<JsonMap>,
    #[serde(default, rename = "webpush_config")]
    webpush: Option<JsonMap>,
    #[serde(default)]
    fcm_options: Option<JsonMap>,
    #[serde(default)]
    dry_run: bool,
    #[serde(skip)]
    timeout: Option<Duration>,
}

/// The resolved recipient of a message.
///
/// Serializes as a single `token`, `topic` or `condition` member of the enclosing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// A single device registration token.
    Token(String),
    /// A topic name such as `weather`.
    Topic(String),
    /// A topic condition such as `'foo' in topics && 'bar' in topics`.
    Condition(String),
}

impl NotificationIntent {
    /// Create an empty `NotificationIntent`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Address a single device by registration token.
    pub fn with_token<S: AsRef<str>>(mut self, token: S) -> Self {
        self.token = Some(token.as_ref().into());
        self
    }

    /// Address every device subscribed to a topic.
    pub fn with_topic<S: AsRef<str>>(mut self, topic: S) -> Self {
        self.topic = Some(topic.as_ref().into());
        self
    }

    /// Address devices matching a topic condition expression.
    pub fn with_condition<S: AsRef<str>>(mut self, condition: S) -> Self {
        self.condition = Some(condition.as_ref().into());
        self
    }

    /// Title shown in the notification tray.
    pub fn with_title<S: AsRef<str>>(mut self, title: S) -> Self {
        self.title = Some(title.as_ref().into());
        self
    }

    /// Body text shown in the notification tray.
    pub fn with_body<S: AsRef<str>>(mut self, body: S) -> Self {
        self.body = Some(body.as_ref().into());
        self
    }

    /// Image URL shown with the notification.
    pub fn with_image<S: AsRef<str>>(mut self, image: S) -> Self {
        self.image = Some(image.as_ref().into());
        self
    }

    /// Replace the whole data payload.
    pub fn with_data(mut self, data: JsonMap) -> Self {
        self.data = Some(data);
        self
    }

    /// Add one string entry to the data payload.
    pub fn with_data_entry<K: AsRef<str>, V: AsRef<str>>(mut self, key: K, value: V) -> Self {
        self.data
            .get_or_insert_with(JsonMap::new)
            .insert(key.as_ref().into(), Value::String(value.as_ref().into()));
        self
    }

    /// Android specific options, passed through as given.
    pub fn with_android(mut self, android: JsonMap) -> Self {
        self.android = Some(android);
        self
    }

    /// APNs specific options, passed through as given.
    pub fn with_apns(mut self, apns: JsonMap) -> Self {
        self.apns = Some(apns);
        self
    }

    /// Webpush specific options, passed through as given.
    pub fn with_webpush(mut self, webpush: JsonMap) -> Self {
        self.webpush = Some(webpush);
        self
    }

    /// Platform independent FCM options, passed through as given.
    pub fn with_fcm_options(mut self, fcm_options: JsonMap) -> Self {
        self.fcm_options = Some(fcm_options);
        self
    }

    /// Ask FCM to validate the message without delivering it.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Bound the network call for this notification.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Parse a single `NotificationIntent` from JSON.
    pub fn from_json<S: AsRef<str>>(input: S) -> Result<Self, Error> {
        Ok(serde_json::from_str(input.as_ref())?)
    }

    /// Resolve the recipient using the precedence token, topic, condition.
    ///
    /// Fails when none or more than one of them was supplied.
    pub fn target(&self) -> Result<Target, Error> {
        let supplied: Vec<(&str, Target)> = [
            ("token", non_empty(&self.token).map(Target::Token)),
            ("topic", non_empty(&self.topic).map(Target::Topic)),
            ("condition", non_empty(&self.condition).map(Target::Condition)),
        ]
        .into_iter()
        .filter_map(|(key, target)| target.map(|t| (key, t)))
        .collect();

        let mut supplied = supplied.into_iter();
        match (supplied.next(), supplied.next()) {
            (None, _) => Err(Error::validation("one of token, topic or condition must be supplied")),
            (Some((_, target)), None) => Ok(target),
            (Some((first, _)), Some((second, _))) => {
                let mut keys = vec![first, second];
                keys.extend(supplied.map(|(key, _)| key));
                Err(Error::validation(format!("only one target may be supplied, got {}", keys.join(", "))))
            }
        }
    }

    /// Return the notification title.
    pub fn title(&self) -> Option<&str> {
        non_empty_str(&self.title)
    }

    /// Return the notification body.
    pub fn body(&self) -> Option<&str> {
        non_empty_str(&self.body)
    }

    /// Return the notification image URL.
    pub fn image(&self) -> Option<&str> {
        non_empty_str(&self.image)
    }

    /// Return the data payload if it has any entries.
    pub fn data(&self) -> Option<&JsonMap> {
        non_empty_map(&self.data)
    }

    /// Return the Android block if it has any entries.
    pub fn android(&self) -> Option<&JsonMap> {
        non_empty_map(&self.android)
    }

    /// Return the APNs block if it has any entries.
    pub fn apns(&self) -> Option<&JsonMap> {
        non_empty_map(&self.apns)
    }

    /// Return the webpush block if it has any entries.
    pub fn webpush(&self) -> Option<&JsonMap> {
        non_empty_map(&self.webpush)
    }

    /// Return the FCM options block if it has any entries.
    pub fn fcm_options(&self) -> Option<&JsonMap> {
        non_empty_map(&self.fcm_options)
    }

    /// Return whether this is a validate only request.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Return the timeout for the network call, if one was set.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    non_empty_str(value).map(String::from)
}

fn non_empty_str(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn non_empty_map(value: &Option<JsonMap>) -> Option<&JsonMap> {
    value.as_ref().filter(|map| !map.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_precedence_single() {
        let intent = NotificationIntent::new().with_condition("'a' in topics");
        assert_eq!(intent.target().unwrap(), Target::Condition("'a' in topics".to_string()));
    }

    #[test]
    fn empty_target_counts_as_missing() {
        let intent = NotificationIntent::new().with_token("").with_topic("news");
        assert_eq!(intent.target().unwrap(), Target::Topic("news".to_string()));
    }

    #[test]
    fn conflicting_targets_named_in_error() {
        let intent = NotificationIntent::new().with_token("abc").with_topic("news").with_condition("c");
        let error = intent.target().unwrap_err();
        assert_eq!(error.to_string(), "Invalid notification: only one target may be supplied, got token, topic, condition");
    }

    #[test]
    fn parse_keyword_parameters() {
        let intent = NotificationIntent::from_json(
            r#"{"fcm_token": "abc", "notification_title": "Hi", "data_payload": {"k": "v"}, "dry_run": true}"#,
        )
        .unwrap();

        assert_eq!(intent.target().unwrap(), Target::Token("abc".to_string()));
        assert_eq!(intent.title(), Some("Hi"));
        assert_eq!(intent.data().and_then(|d| d.get("k")), Some(&Value::String("v".to_string())));
        assert!(intent.dry_run());
    }

    #[test]
    fn parse_rejects_unknown_parameter() {
        let intent = NotificationIntent::from_json(r#"{"fcm_token": "abc", "badge": 1}"#);
        assert!(intent.is_err());
    }

    #[test]
    fn data_entry_accumulates() {
        let intent = NotificationIntent::new().with_data_entry("a", "1").with_data_entry("b", "2");
        assert_eq!(intent.data().map(|d| d.len()), Some(2));
    }
}
