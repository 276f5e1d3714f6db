//! Metric dimension model.
//!
//! A dimension is a `(key, value)` label. Statsite receives them as an
//! ordered JSON array of two-element arrays, so order is preserved.

use serde::{Serialize, Serializer};

/// Key of the dimension carrying the metric name.
pub const METRIC_NAME_KEY: &str = "metric_name";
/// Key of the dimension carrying the check name.
pub const CHECK_NAME_KEY: &str = "check_name";
/// Key of the dimension carrying the client name.
pub const CLIENT_NAME_KEY: &str = "client_name";

/// A single metric label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    /// The label key.
    pub key: String,
    /// The label value.
    pub value: String,
}

impl Dimension {
    /// Creates a new dimension.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl Serialize for Dimension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.key, &self.value).serialize(serializer)
    }
}

/// An ordered sequence of dimensions.
///
/// # Example
///
/// ```
/// use shared::models::DimensionSet;
///
/// let dims = DimensionSet::new()
///     .with("metric_name", "sensu.check_age")
///     .with("region", "us-east");
///
/// assert_eq!(
///     dims.to_json().unwrap(),
///     r#"[["metric_name","sensu.check_age"],["region","us-east"]]"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DimensionSet(Vec<Dimension>);

impl DimensionSet {
    /// Creates an empty dimension set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a dimension.
    pub fn push(&mut self, dimension: Dimension) {
        self.0.push(dimension);
    }

    /// Appends a dimension, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(Dimension::new(key, value));
        self
    }

    /// Returns the number of dimensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the set holds no dimensions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the dimensions in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Dimension> {
        self.0.iter()
    }

    /// Returns the dimension keys in order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.0.iter().map(|d| d.key.as_str()).collect()
    }

    /// Returns the value of the first dimension with the given key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|d| d.key == key)
            .map(|d| d.value.as_str())
    }

    /// Serializes the set as a JSON array of `[key, value]` arrays.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Extend<Dimension> for DimensionSet {
    fn extend<T: IntoIterator<Item = Dimension>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl FromIterator<Dimension> for DimensionSet {
    fn from_iter<T: IntoIterator<Item = Dimension>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a DimensionSet {
    type Item = &'a Dimension;
    type IntoIter = std::slice::Iter<'a, Dimension>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_serializes_as_pair() {
        let json = serde_json::to_string(&Dimension::new("region", "us-east")).unwrap();
        assert_eq!(json, r#"["region","us-east"]"#);
    }

    #[test]
    fn test_dimension_set_preserves_order() {
        let dims = DimensionSet::new()
            .with("b", "2")
            .with("a", "1")
            .with("c", "3");

        assert_eq!(dims.keys(), vec!["b", "a", "c"]);
        assert_eq!(dims.to_json().unwrap(), r#"[["b","2"],["a","1"],["c","3"]]"#);
    }

    #[test]
    fn test_dimension_set_escapes_values() {
        let dims = DimensionSet::new().with("check_name", "say \"hi\":now");
        assert_eq!(
            dims.to_json().unwrap(),
            r#"[["check_name","say \"hi\":now"]]"#
        );
    }

    #[test]
    fn test_empty_dimension_set() {
        let dims = DimensionSet::new();
        assert!(dims.is_empty());
        assert_eq!(dims.to_json().unwrap(), "[]");
    }

    #[test]
    fn test_dimension_set_get_and_extend() {
        let mut dims = DimensionSet::new().with(METRIC_NAME_KEY, "sensu.check_age");
        dims.extend([Dimension::new("region", "eu"), Dimension::new("habitat", "az2")]);

        assert_eq!(dims.len(), 3);
        assert_eq!(dims.get("habitat"), Some("az2"));
        assert_eq!(dims.get(CLIENT_NAME_KEY), None);
    }
}
