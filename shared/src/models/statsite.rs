//! Statsite wire format.
//!
//! A line looks like `<json-array>:<value>|g`: the metric "name" is the
//! JSON-encoded dimension set, followed by the gauge value.

use std::fmt;

use super::dimension::DimensionSet;

/// Stat type discriminator for gauges.
pub const GAUGE_SUFFIX: &str = "g";

/// A single gauge line destined for statsite.
///
/// # Example
///
/// ```
/// use shared::models::{DimensionSet, StatsiteLine};
///
/// let dims = DimensionSet::new().with("metric_name", "sensu.check_age");
/// let line = StatsiteLine::gauge(dims, 50);
///
/// assert_eq!(line.to_string(), r#"[["metric_name","sensu.check_age"]]:50|g"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsiteLine {
    /// Dimensions encoded into the metric name.
    pub dimensions: DimensionSet,
    /// The gauge value.
    pub value: i64,
}

impl StatsiteLine {
    /// Creates a new gauge line.
    #[must_use]
    pub fn gauge(dimensions: DimensionSet, value: i64) -> Self {
        Self { dimensions, value }
    }
}

impl fmt::Display for StatsiteLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.dimensions.to_json().map_err(|_| fmt::Error)?;
        write!(f, "{name}:{}|{GAUGE_SUFFIX}", self.value)
    }
}
