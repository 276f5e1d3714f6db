//! Handler settings for the `sensu_slo` namespace.
//!
//! Every key is optional in the settings files. Absent or `null` keys take
//! the defaults below.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

/// Settings namespace the handler reads its keys from.
pub const SETTINGS_NAMESPACE: &str = "sensu_slo";
/// Default metric name.
pub const DEFAULT_METRIC_NAME: &str = "sensu.check_age";
/// Default statsite host.
pub const DEFAULT_STATSITE_HOST: &str = "127.0.0.1";
/// Default statsite UDP port.
pub const DEFAULT_STATSITE_PORT: u16 = 8125;

/// Resolved handler settings.
///
/// # Examples
///
/// ```
/// use shared::config::SloSettings;
///
/// let settings: SloSettings =
///     serde_json::from_str(r#"{"statsite_port": 9125}"#).unwrap();
///
/// assert_eq!(settings.metric_name, "sensu.check_age");
/// assert_eq!(settings.statsite_host, "127.0.0.1");
/// assert_eq!(settings.statsite_port, 9125);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(from = "RawSloSettings")]
pub struct SloSettings {
    /// Value of the `metric_name` dimension.
    #[validate(length(min = 1, message = "metric_name cannot be empty"))]
    pub metric_name: String,

    /// Host statsite listens on.
    #[validate(length(min = 1, message = "statsite_host cannot be empty"))]
    pub statsite_host: String,

    /// UDP port statsite listens on.
    #[validate(range(min = 1, message = "statsite_port must be greater than zero"))]
    pub statsite_port: u16,
}

impl SloSettings {
    /// Sets the metric name.
    #[must_use]
    pub fn with_metric_name(mut self, metric_name: impl Into<String>) -> Self {
        self.metric_name = metric_name.into();
        self
    }

    /// Sets the statsite host.
    #[must_use]
    pub fn with_statsite_host(mut self, host: impl Into<String>) -> Self {
        self.statsite_host = host.into();
        self
    }

    /// Sets the statsite port.
    #[must_use]
    pub fn with_statsite_port(mut self, port: u16) -> Self {
        self.statsite_port = port;
        self
    }

    /// Returns the `host:port` destination datagrams are sent to.
    #[must_use]
    pub fn destination(&self) -> String {
        format_destination(&self.statsite_host, self.statsite_port)
    }
}

impl Default for SloSettings {
    fn default() -> Self {
        Self {
            metric_name: DEFAULT_METRIC_NAME.to_string(),
            statsite_host: DEFAULT_STATSITE_HOST.to_string(),
            statsite_port: DEFAULT_STATSITE_PORT,
        }
    }
}

/// Formats a `host:port` pair, bracketing IPv6 literals.
#[must_use]
pub fn format_destination(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

/// On-disk shape of the namespace, before defaults are applied.
#[derive(Debug, Default, Deserialize)]
struct RawSloSettings {
    #[serde(default)]
    metric_name: Option<String>,
    #[serde(default)]
    statsite_host: Option<String>,
    #[serde(default, deserialize_with = "deserialize_port")]
    statsite_port: Option<u16>,
}

impl From<RawSloSettings> for SloSettings {
    fn from(raw: RawSloSettings) -> Self {
        let defaults = Self::default();
        Self {
            metric_name: raw.metric_name.unwrap_or(defaults.metric_name),
            statsite_host: raw.statsite_host.unwrap_or(defaults.statsite_host),
            statsite_port: raw.statsite_port.unwrap_or(defaults.statsite_port),
        }
    }
}

/// Ports may be written as a number or a numeric string.
fn deserialize_port<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|p| u16::try_from(p).ok())
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid statsite_port: {n}"))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u16>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid statsite_port: {s:?}"))),
        Some(other) => Err(de::Error::custom(format!(
            "invalid statsite_port: {other}"
        ))),
    }
}
