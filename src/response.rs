//! Normalizes whatever came back from FCM into a [`DeliveryResult`] or one [`Error`].
//!
//! Both the v1 single message reply (`{"name": "projects/p/messages/1"}`) and the multicast
//! style reply with a `results` array are understood.

use crate::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};

/// Status and body as returned by a transport (`fcm_notify::transport::Transport` with the `client` feature).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    status: u16,
    body: Vec<u8>,
}

/// The request never produced a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The call did not complete before its timeout.
    Timeout,
    /// The connection could not be established.
    Connect(String),
    /// Any other failure before a status was received.
    Other(String),
}

/// Outcome of one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    /// FCM accepted the message and assigned it an identifier.
    Delivered {
        /// Identifier assigned by FCM.
        message_id: String,
    },
    /// FCM rejected the message for this recipient.
    Failed {
        /// Error code such as `NotRegistered`.
        error: String,
        /// Optional human readable description.
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

/// Uniform result of a send, with one [`Outcome`] per recipient in request order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    multicast_id: Option<String>,
    outcomes: Vec<Outcome>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SuccessBody {
    Multicast {
        #[serde(default)]
        multicast_id: Option<Value>,
        results: Vec<MulticastEntry>,
    },
    Named {
        name: String,
    },
    Legacy {
        message_id: Value,
    },
}

#[derive(Debug, Deserialize)]
struct MulticastEntry {
    #[serde(default)]
    message_id: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

/// Google API error envelope: `{"error": {"code": 400, "message": "...", "status": "...", "details": [...]}}`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: ErrorStatus,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorStatus {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default, rename = "errorCode")]
    error_code: Option<String>,
}

const AUTH_STATUSES: &[&str] = &["UNAUTHENTICATED", "PERMISSION_DENIED"];
const AUTH_ERROR_CODES: &[&str] = &["THIRD_PARTY_AUTH_ERROR", "SENDER_ID_MISMATCH"];

/// Interpret the result of a transport call.
pub fn interpret(response: Result<RawResponse, TransportError>) -> Result<DeliveryResult, Error> {
    match response {
        Ok(response) => interpret_response(&response),
        Err(error) => Err(Error::server(format!("transport failure: {}", error))),
    }
}

/// Interpret a status and body received from FCM.
pub fn interpret_response(response: &RawResponse) -> Result<DeliveryResult, Error> {
    match response.status {
        200..=299 => parse_success(&response.body),
        401 | 403 => Err(Error::authentication(describe(response))),
        400 => match is_auth_rejection(&response.body) {
            true => Err(Error::authentication(describe(response))),
            false => Err(Error::invalid_data(describe(response))),
        },
        404 => Err(Error::not_registered(describe(response))),
        429 => Err(Error::server(describe(response))),
        400..=499 => Err(Error::invalid_data(describe(response))),
        500..=599 => Err(Error::server(describe(response))),
        _ => Err(Error::unexpected_response(describe(response))),
    }
}

fn parse_success(body: &[u8]) -> Result<DeliveryResult, Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(Error::server("FCM server connection error, the response is empty"));
    }

    let parsed: SuccessBody = serde_json::from_slice(body)
        .map_err(|e| Error::unexpected_response(format!("{}: {}", e, String::from_utf8_lossy(body))))?;

    match parsed {
        SuccessBody::Multicast { multicast_id, results } => {
            let outcomes = results
                .into_iter()
                .enumerate()
                .map(|(i, entry)| entry.into_outcome(i))
                .collect::<Result<Vec<_>, Error>>()?;
            Ok(DeliveryResult { multicast_id: multicast_id.map(|id| id_string(&id)), outcomes })
        }
        SuccessBody::Named { name } => Ok(DeliveryResult::single(name)),
        SuccessBody::Legacy { message_id } => Ok(DeliveryResult::single(id_string(&message_id))),
    }
}

fn is_auth_rejection(body: &[u8]) -> bool {
    let error = serde_json::from_slice::<ErrorBody>(body).unwrap_or_default().error;
    let status_matches = error.status.as_deref().is_some_and(|s| AUTH_STATUSES.contains(&s));
    let code_matches = error
        .details
        .iter()
        .filter_map(|d| d.error_code.as_deref())
        .any(|code| AUTH_ERROR_CODES.contains(&code));
    status_matches || code_matches
}

fn describe(response: &RawResponse) -> String {
    let message = serde_json::from_slice::<ErrorBody>(&response.body).ok().and_then(|b| b.error.message);
    match message {
        Some(message) => format!("status {}: {}", response.status, message),
        None if response.body.is_empty() => format!("status {}", response.status),
        None => format!("status {}: {}", response.status, String::from_utf8_lossy(&response.body)),
    }
}

fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl MulticastEntry {
    fn into_outcome(self, index: usize) -> Result<Outcome, Error> {
        match (self.message_id, self.error) {
            (Some(message_id), None) => Ok(Outcome::Delivered { message_id: id_string(&message_id) }),
            (_, Some(Value::String(error))) => Ok(Outcome::Failed { error, message: None }),
            (_, Some(Value::Object(error))) => {
                let code = error.get("code").or_else(|| error.get("status")).map(id_string);
                let message = error.get("message").and_then(Value::as_str).map(String::from);
                match code {
                    Some(error) => Ok(Outcome::Failed { error, message }),
                    None => Err(Error::unexpected_response(format!("result {} has an error without a code", index))),
                }
            }
            _ => Err(Error::unexpected_response(format!(
                "result {} has neither a message_id nor a recognizable error",
                index
            ))),
        }
    }
}

impl RawResponse {
    /// Create a new `RawResponse`.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }

    /// Return the HTTP status.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Return the raw body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Timeout => write!(f, "request timed out"),
            TransportError::Connect(e) => write!(f, "connection failed: {}", e),
            TransportError::Other(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for TransportError {}

impl Outcome {
    /// Return whether this recipient was delivered to.
    pub fn is_delivered(&self) -> bool {
        matches!(self, Outcome::Delivered { .. })
    }

    /// Return the message identifier when delivered.
    pub fn message_id(&self) -> Option<&str> {
        match self {
            Outcome::Delivered { message_id } => Some(message_id),
            Outcome::Failed { .. } => None,
        }
    }
}

impl DeliveryResult {
    fn single(message_id: String) -> Self {
        Self { multicast_id: None, outcomes: vec![Outcome::Delivered { message_id }] }
    }

    /// Return whether every recipient was delivered to.
    pub fn is_success(&self) -> bool {
        !self.outcomes.is_empty() && self.outcomes.iter().all(Outcome::is_delivered)
    }

    /// Return per recipient outcomes in request order.
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Return identifiers of every delivered message.
    pub fn message_ids(&self) -> Vec<&str> {
        self.outcomes.iter().filter_map(Outcome::message_id).collect()
    }

    /// Return the multicast id of a legacy multicast response.
    pub fn multicast_id(&self) -> Option<&str> {
        self.multicast_id.as_deref()
    }

    /// Return the number of delivered recipients.
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_delivered()).count()
    }

    /// Return the number of failed recipients.
    pub fn failure_count(&self) -> usize {
        self.outcomes.len() - self.success_count()
    }

    /// Serialize `DeliveryResult` to JSON.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }
}
