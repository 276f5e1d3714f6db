//! Configuration module for sensu-slo.
//!
//! This module contains the handler settings and the loader that reads them
//! from Sensu's JSON settings files.

pub mod loader;
pub mod settings;

pub use loader::{
    deep_merge, slo_settings_from, SettingsError, SettingsLoader, CONFIG_FILES_ENV,
    DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILE,
};
pub use settings::{
    format_destination, SloSettings, DEFAULT_METRIC_NAME, DEFAULT_STATSITE_HOST, DEFAULT_STATSITE_PORT,
    SETTINGS_NAMESPACE,
};
