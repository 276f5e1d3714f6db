//! Sensu settings loading.
//!
//! Settings are spread over JSON files: a main `config.json` and any number
//! of snippets in `conf.d`. Sources are read in order and deep-merged, so
//! later files win for scalar keys.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use validator::Validate;

use super::settings::{SloSettings, SETTINGS_NAMESPACE};

/// Default main settings file.
pub const DEFAULT_CONFIG_FILE: &str = "/etc/sensu/config.json";
/// Default settings snippet directory.
pub const DEFAULT_CONFIG_DIR: &str = "/etc/sensu/conf.d";
/// Environment variable listing settings sources, separated by `:`.
pub const CONFIG_FILES_ENV: &str = "SENSU_CONFIG_FILES";

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A settings file or directory exists but could not be read.
    #[error("Failed to read settings from {}: {source}", path.display())]
    Read {
        /// The path that failed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A settings file is not valid JSON.
    #[error("Invalid JSON in settings file {}: {source}", path.display())]
    Parse {
        /// The offending file.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A settings file holds JSON that is not an object.
    #[error("Settings file {} does not contain a JSON object", path.display())]
    NotAnObject {
        /// The offending file.
        path: PathBuf,
    },

    /// The `sensu_slo` namespace has keys of the wrong type.
    #[error("Invalid sensu_slo settings: {0}")]
    Namespace(#[source] serde_json::Error),

    /// The resolved settings failed validation.
    #[error("Settings validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Loads and merges settings from an ordered list of sources.
///
/// # Examples
///
/// ```
/// use shared::config::SettingsLoader;
///
/// let loader = SettingsLoader::new(["/etc/a.json", "/etc/b.json"]);
/// assert_eq!(loader.sources().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsLoader {
    sources: Vec<PathBuf>,
}

impl SettingsLoader {
    /// Creates a loader reading the given files and directories in order.
    #[must_use]
    pub fn new<I, P>(sources: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the configured sources.
    #[must_use]
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Reads every source and returns the merged settings document.
    ///
    /// Missing paths are skipped. Directories contribute their `*.json`
    /// files in file name order.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing source cannot be read, is not valid
    /// JSON or is not a JSON object.
    pub fn load(&self) -> Result<Value, SettingsError> {
        let mut merged = Value::Object(Map::new());

        for source in &self.sources {
            for file in expand_source(source)? {
                let document = read_document(&file)?;
                tracing::debug!(path = %file.display(), "Loaded settings file");
                deep_merge(&mut merged, document);
            }
        }

        Ok(merged)
    }

    /// Loads the sources and extracts the validated `sensu_slo` settings.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or the namespace is invalid.
    pub fn load_slo_settings(&self) -> Result<SloSettings, SettingsError> {
        slo_settings_from(&self.load()?)
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new([DEFAULT_CONFIG_FILE, DEFAULT_CONFIG_DIR])
    }
}

/// Extracts the `sensu_slo` namespace from a merged settings document.
///
/// A missing namespace yields the default settings.
///
/// # Errors
///
/// Returns an error if the namespace has keys of the wrong type or the
/// resulting settings fail validation.
pub fn slo_settings_from(document: &Value) -> Result<SloSettings, SettingsError> {
    let settings = match document.get(SETTINGS_NAMESPACE) {
        None | Some(Value::Null) => SloSettings::default(),
        Some(namespace) => SloSettings::deserialize(namespace).map_err(SettingsError::Namespace)?,
    };

    settings.validate()?;
    Ok(settings)
}

/// Merges `overlay` into `base`.
///
/// Objects merge key by key, arrays are concatenated without duplicates and
/// any other value in `overlay` replaces the one in `base`.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (Value::Array(base_items), Value::Array(overlay_items)) => {
            for item in overlay_items {
                if !base_items.contains(&item) {
                    base_items.push(item);
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

fn expand_source(path: &Path) -> Result<Vec<PathBuf>, SettingsError> {
    if path.is_dir() {
        let entries = fs::read_dir(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();
        Ok(files)
    } else if path.exists() {
        Ok(vec![path.to_path_buf()])
    } else {
        tracing::debug!(path = %path.display(), "Settings source does not exist, skipping");
        Ok(Vec::new())
    }
}

fn read_document(path: &Path) -> Result<Value, SettingsError> {
    let contents = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let document: Value =
        serde_json::from_str(&contents).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if document.is_object() {
        Ok(document)
    } else {
        Err(SettingsError::NotAnObject {
            path: path.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_default_sources() {
        let loader = SettingsLoader::default();
        assert_eq!(
            loader.sources(),
            &[
                PathBuf::from("/etc/sensu/config.json"),
                PathBuf::from("/etc/sensu/conf.d")
            ]
        );
    }

    #[test]
    fn test_deep_merge() {
        let mut base = json!({
            "sensu_slo": {"metric_name": "a", "statsite_port": 1},
            "handlers": {"list": ["x"]},
            "other": true
        });
        deep_merge(
            &mut base,
            json!({
                "sensu_slo": {"statsite_port": 2},
                "handlers": {"list": ["x", "y"]},
                "other": {"nested": 1}
            }),
        );

        assert_eq!(
            base,
            json!({
                "sensu_slo": {"metric_name": "a", "statsite_port": 2},
                "handlers": {"list": ["x", "y"]},
                "other": {"nested": 1}
            })
        );
    }

    #[test]
    fn test_missing_sources_yield_defaults() {
        let dir = TempDir::new().unwrap();
        let loader = SettingsLoader::new([dir.path().join("absent.json")]);

        assert_eq!(loader.load().unwrap(), json!({}));
        assert_eq!(loader.load_slo_settings().unwrap(), SloSettings::default());
    }

    #[test]
    fn test_directory_files_merge_in_name_order() {
        let dir = TempDir::new().unwrap();
        write(&dir, "20-port.json", r#"{"sensu_slo": {"statsite_port": 9200}}"#);
        write(
            &dir,
            "10-base.json",
            r#"{"sensu_slo": {"statsite_host": "stats", "statsite_port": 9100}}"#,
        );
        write(&dir, "notes.txt", "not json");

        let settings = SettingsLoader::new([dir.path()])
            .load_slo_settings()
            .unwrap();

        assert_eq!(settings.statsite_host, "stats");
        assert_eq!(settings.statsite_port, 9200);
        assert_eq!(settings.metric_name, "sensu.check_age");
    }

    #[test]
    fn test_later_sources_win() {
        let dir = TempDir::new().unwrap();
        let first = write(&dir, "config.json", r#"{"sensu_slo": {"metric_name": "first"}}"#);
        let second = write(&dir, "override.json", r#"{"sensu_slo": {"metric_name": "second"}}"#);

        let settings = SettingsLoader::new([first, second])
            .load_slo_settings()
            .unwrap();
        assert_eq!(settings.metric_name, "second");
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "config.json", "{ broken");

        let result = SettingsLoader::new([path]).load();
        assert!(matches!(result, Err(SettingsError::Parse { .. })));
    }

    #[test]
    fn test_non_object_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "config.json", "[1, 2]");

        let result = SettingsLoader::new([path]).load();
        assert!(matches!(result, Err(SettingsError::NotAnObject { .. })));
    }

    #[test]
    fn test_namespace_type_errors() {
        let result = slo_settings_from(&json!({"sensu_slo": {"statsite_port": "nope"}}));
        assert!(matches!(result, Err(SettingsError::Namespace(_))));

        let result = slo_settings_from(&json!({"sensu_slo": "not an object"}));
        assert!(matches!(result, Err(SettingsError::Namespace(_))));
    }

    #[test]
    fn test_namespace_validation_errors() {
        let result = slo_settings_from(&json!({"sensu_slo": {"statsite_host": ""}}));
        assert!(matches!(result, Err(SettingsError::Validation(_))));
    }
}
