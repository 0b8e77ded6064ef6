//! Shapes a [`NotificationIntent`] into the FCM v1 `messages:send` request body.
//!
//! ```json
//! {
//!   "message": {
//!     "token": "abc",
//!     "notification": {"title": "Hi"},
//!     "data": {"key": "value"}
//!   },
//!   "validate_only": true
//! }
//! ```

use crate::Error;
use crate::notifications::{JsonMap, NotificationIntent, Target};
use serde::Serialize;
use serde_json::Value;

const ANDROID_KEYS: &[&str] = &[
    "collapse_key",
    "priority",
    "ttl",
    "restricted_package_name",
    "data",
    "notification",
    "fcm_options",
    "direct_boot_ok",
];
const APNS_KEYS: &[&str] = &["headers", "payload", "fcm_options", "live_activity_token"];
const WEBPUSH_KEYS: &[&str] = &["headers", "data", "notification", "fcm_options"];
const FCM_OPTIONS_KEYS: &[&str] = &["analytics_label"];

/// How much checking [`build_with`] applies to platform override blocks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// Override blocks are passed through untouched.
    #[default]
    Lenient,
    /// Unrecognized top level keys inside override blocks are rejected.
    Strict,
}

/// Request body for the FCM v1 send endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WirePayload {
    message: Message,
    #[serde(skip_serializing_if = "is_false")]
    validate_only: bool,
}

/// The `message` object of a [`WirePayload`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    #[serde(flatten)]
    target: Target,
    #[serde(skip_serializing_if = "Option::is_none")]
    notification: Option<DisplayNotification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<JsonMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    android: Option<JsonMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    apns: Option<JsonMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    webpush: Option<JsonMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fcm_options: Option<JsonMap>,
}

/// User visible part of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayNotification {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
}

/// Build a [`WirePayload`] passing override blocks through untouched.
pub fn build(intent: &NotificationIntent) -> Result<WirePayload, Error> {
    build_with(intent, Validation::Lenient)
}

/// Build a [`WirePayload`] with the requested level of override block checking.
pub fn build_with(intent: &NotificationIntent, validation: Validation) -> Result<WirePayload, Error> {
    let target = intent.target()?;

    let data = match intent.data() {
        Some(data) => Some(string_data(data)?),
        None => None,
    };

    if validation == Validation::Strict {
        check_keys("android", intent.android(), ANDROID_KEYS)?;
        check_keys("apns", intent.apns(), APNS_KEYS)?;
        check_keys("webpush", intent.webpush(), WEBPUSH_KEYS)?;
        check_keys("fcm_options", intent.fcm_options(), FCM_OPTIONS_KEYS)?;
    }

    let message = Message {
        target,
        notification: DisplayNotification::from_intent(intent),
        data,
        android: intent.android().cloned(),
        apns: intent.apns().cloned(),
        webpush: intent.webpush().cloned(),
        fcm_options: intent.fcm_options().cloned(),
    };

    Ok(WirePayload { message, validate_only: intent.dry_run() })
}

impl WirePayload {
    /// Return the `message` object.
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Return whether FCM should only validate this request.
    pub fn validate_only(&self) -> bool {
        self.validate_only
    }

    /// Serialize `WirePayload` to JSON.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize `WirePayload` to a JSON request body.
    pub fn to_vec(&self) -> Result<Vec<u8>, Error> {
        Ok(serde_json::to_vec(self)?)
    }
}

impl Message {
    /// Return the resolved recipient.
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Return the user visible notification block.
    pub fn notification(&self) -> Option<&DisplayNotification> {
        self.notification.as_ref()
    }

    /// Return the data payload.
    pub fn data(&self) -> Option<&JsonMap> {
        self.data.as_ref()
    }
}

impl DisplayNotification {
    fn from_intent(intent: &NotificationIntent) -> Option<Self> {
        let notification = Self {
            title: intent.title().map(String::from),
            body: intent.body().map(String::from),
            image: intent.image().map(String::from),
        };

        match notification.title.is_none() && notification.body.is_none() && notification.image.is_none() {
            true => None,
            false => Some(notification),
        }
    }

    /// Return the title.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Return the body.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Return the image URL.
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

fn string_data(data: &JsonMap) -> Result<JsonMap, Error> {
    match data.iter().find(|(_, value)| !value.is_string()) {
        Some((key, value)) => Err(Error::validation(format!(
            "data payload value for key '{}' must be a string, got {}",
            key,
            json_kind(value)
        ))),
        None => Ok(data.clone()),
    }
}

fn check_keys(block: &str, values: Option<&JsonMap>, known: &[&str]) -> Result<(), Error> {
    let unknown = values
        .into_iter()
        .flat_map(|map| map.keys())
        .find(|key| !known.contains(&key.as_str()));

    match unknown {
        Some(key) => Err(Error::validation(format!("unrecognized key '{}' in {} options", key, block))),
        None => Ok(()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> JsonMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected a JSON object"),
        }
    }

    fn to_value(intent: &NotificationIntent) -> Value {
        serde_json::to_value(build(intent).unwrap()).unwrap()
    }

    #[test]
    fn token_and_title() {
        let intent = NotificationIntent::new().with_token("abc").with_title("Hi");
        assert_eq!(to_value(&intent), json!({"message": {"token": "abc", "notification": {"title": "Hi"}}}));
    }

    #[test]
    fn each_target_lands_under_its_key() {
        let cases = [
            (NotificationIntent::new().with_token("t"), "token"),
            (NotificationIntent::new().with_topic("news"), "topic"),
            (NotificationIntent::new().with_condition("'a' in topics"), "condition"),
        ];

        for (intent, key) in cases {
            let value = to_value(&intent);
            let message = value["message"].as_object().unwrap();
            assert_eq!(message.len(), 1, "only the target should be present for {}", key);
            assert!(message.contains_key(key));
        }
    }

    #[test]
    fn no_target_fails() {
        let intent = NotificationIntent::new().with_title("Hi").with_body("there");
        assert!(matches!(build(&intent), Err(Error::Validation(_))));
    }

    #[test]
    fn topic_and_condition_fails() {
        let intent = NotificationIntent::new().with_topic("news").with_condition("'news' in topics");
        assert!(matches!(build(&intent), Err(Error::Validation(_))));
    }

    #[test]
    fn token_and_topic_fails() {
        let intent = NotificationIntent::new().with_token("abc").with_topic("news");
        assert!(matches!(build(&intent), Err(Error::Validation(_))));
    }

    #[test]
    fn non_string_data_fails() {
        let intent = NotificationIntent::new().with_token("abc").with_data(object(json!({"count": 3})));
        let error = build(&intent).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid notification: data payload value for key 'count' must be a string, got a number"
        );
    }

    #[test]
    fn data_only_message_has_no_notification() {
        let intent = NotificationIntent::new().with_topic("news").with_data_entry("id", "42");
        assert_eq!(to_value(&intent), json!({"message": {"topic": "news", "data": {"id": "42"}}}));
    }

    #[test]
    fn empty_groups_are_omitted() {
        let intent = NotificationIntent::new()
            .with_token("abc")
            .with_title("")
            .with_data(JsonMap::new())
            .with_android(JsonMap::new())
            .with_apns(JsonMap::new())
            .with_webpush(JsonMap::new())
            .with_fcm_options(JsonMap::new());
        assert_eq!(to_value(&intent), json!({"message": {"token": "abc"}}));
    }

    #[test]
    fn dry_run_sets_validate_only() {
        let intent = NotificationIntent::new().with_token("abc").with_dry_run(true);
        assert_eq!(to_value(&intent), json!({"message": {"token": "abc"}, "validate_only": true}));
    }

    #[test]
    fn overrides_pass_through_verbatim() {
        let android = object(json!({"priority": "high", "custom_vendor_key": {"nested": [1, 2]}}));
        let intent = NotificationIntent::new()
            .with_token("abc")
            .with_android(android.clone())
            .with_fcm_options(object(json!({"analytics_label": "promo"})));

        let value = to_value(&intent);
        assert_eq!(value["message"]["android"], Value::Object(android));
        assert_eq!(value["message"]["fcm_options"], json!({"analytics_label": "promo"}));
    }

    #[test]
    fn strict_rejects_unknown_override_key() {
        let intent = NotificationIntent::new()
            .with_token("abc")
            .with_apns(object(json!({"headers": {}, "badge": 1})));

        assert!(build(&intent).is_ok());
        let error = build_with(&intent, Validation::Strict).unwrap_err();
        assert_eq!(error.to_string(), "Invalid notification: unrecognized key 'badge' in apns options");
    }

    #[test]
    fn strict_accepts_known_override_keys() {
        let intent = NotificationIntent::new()
            .with_token("abc")
            .with_android(object(json!({"ttl": "3600s", "collapse_key": "c"})))
            .with_webpush(object(json!({"headers": {"Urgency": "high"}})));

        assert!(build_with(&intent, Validation::Strict).is_ok());
    }

    #[test]
    fn building_twice_is_identical() {
        let intent = NotificationIntent::new()
            .with_condition("'a' in topics || 'b' in topics")
            .with_title("t")
            .with_body("b")
            .with_image("https://example.com/i.png")
            .with_data_entry("k", "v");

        assert_eq!(build(&intent).unwrap(), build(&intent).unwrap());
        assert_eq!(build(&intent).unwrap().to_json().unwrap(), build(&intent).unwrap().to_json().unwrap());
    }
}
