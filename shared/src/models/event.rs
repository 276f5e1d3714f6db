//! Check result event model.
//!
//! Defines the `Event` record Sensu hands to a handler and the validation
//! that turns it into a `ValidatedEvent` the reporter can act on.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The check portion of a Sensu event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    /// Name of the check (e.g., "`check_disk`").
    #[serde(default)]
    pub name: Option<String>,

    /// Unix timestamp (seconds) at which the check was executed.
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub executed: Option<i64>,
}

/// The client (agent) that produced the check result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Name of the client.
    #[serde(default)]
    pub name: Option<String>,
}

/// A check result event as delivered on stdin.
///
/// Every field is optional so that malformed events can be reported rather
/// than rejected by the parser. Unknown fields are ignored.
///
/// # Example
///
/// ```
/// use shared::models::Event;
///
/// let event = Event::from_json(
///     r#"{"check": {"name": "disk", "executed": 1000}, "client": {"name": "host1"}}"#,
/// )
/// .unwrap();
///
/// let validated = event.validate_event().unwrap();
/// assert_eq!(validated.age_at(1050), 50);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Check data, if the event carried any.
    #[serde(default)]
    pub check: Option<Check>,

    /// Client data, if the event carried any.
    #[serde(default)]
    pub client: Option<Client>,
}

/// Errors that can occur while parsing an event.
#[derive(Debug, Error)]
pub enum EventParseError {
    /// The input was not a valid event document.
    #[error("error reading event: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Errors that can occur during event validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EventValidationError {
    /// The event has no `check` object.
    #[error("Check result does not appear to contain check data")]
    NoCheckData,

    /// The check has no name, or an empty one.
    #[error("Check result did not have a 'name'")]
    MissingCheckName,

    /// The client has no name, or the client object is missing.
    #[error("Check result did not have a 'client name'")]
    MissingClientName,

    /// The check does not say when it was executed.
    #[error("Check result does not have an 'executed' field")]
    MissingExecuted,
}

/// An event whose required fields are known to be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEvent {
    /// Name of the check.
    pub check_name: String,
    /// Name of the client that ran the check.
    pub client_name: String,
    /// Unix timestamp (seconds) the check was executed at.
    pub executed: i64,
}

impl ValidatedEvent {
    /// Returns the age of the check result in seconds relative to `now`.
    ///
    /// Negative when the recorded execution time lies in the future.
    #[must_use]
    pub fn age_at(&self, now: i64) -> i64 {
        now.saturating_sub(self.executed)
    }
}

impl Event {
    /// Creates a fully populated check result event.
    #[must_use]
    pub fn check_result(
        check_name: impl Into<String>,
        executed: i64,
        client_name: impl Into<String>,
    ) -> Self {
        Self {
            check: Some(Check {
                name: Some(check_name.into()),
                executed: Some(executed),
            }),
            client: Some(Client {
                name: Some(client_name.into()),
            }),
        }
    }

    /// Parses an event from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not valid JSON or a field has a type
    /// that cannot be interpreted.
    pub fn from_json(input: &str) -> Result<Self, EventParseError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Validates the event.
    ///
    /// Checks run in order: check data, check name, client name, executed
    /// timestamp. The first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - There is no `check` object
    /// - The check name is absent or empty
    /// - The client name is absent or empty
    /// - The check has no usable `executed` timestamp
    pub fn validate_event(&self) -> Result<ValidatedEvent, EventValidationError> {
        let check = self
            .check
            .as_ref()
            .ok_or(EventValidationError::NoCheckData)?;

        let check_name =
            non_empty(check.name.as_deref()).ok_or(EventValidationError::MissingCheckName)?;

        let client_name = self
            .client
            .as_ref()
            .and_then(|client| non_empty(client.name.as_deref()))
            .ok_or(EventValidationError::MissingClientName)?;

        let executed = check
            .executed
            .ok_or(EventValidationError::MissingExecuted)?;

        Ok(ValidatedEvent {
            check_name: check_name.to_string(),
            client_name: client_name.to_string(),
            executed,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Accepts integers, floats (truncated) and numeric strings.
/// Anything else is treated as an absent timestamp.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(timestamp_from_value))
}

fn timestamp_from_value(value: &Value) -> Option<i64> {
    match value {
        // Sub-second precision is not part of the reported age
        #[allow(clippy::cast_possible_truncation)]
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
