//! Default dimensions read from the host environment.
//!
//! Each file under the environment directory holds a single label value,
//! e.g. `/nail/etc/region` containing `us-east`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::Dimension;

/// Directory holding the default dimension files.
pub const DEFAULT_ENV_DIR: &str = "/nail/etc";

/// Default dimension files, in the order they are reported.
pub const DEFAULT_DIMENSION_FILES: [&str; 4] = ["runtimeenv", "ecosystem", "region", "habitat"];

/// Errors that can occur while reading a dimension file.
#[derive(Debug, Error)]
pub enum DimensionReadError {
    /// The dimension file does not exist.
    #[error("Could not read {name}")]
    NotFound {
        /// Name of the dimension.
        name: String,
        /// Path that was read.
        path: PathBuf,
    },

    /// The dimension file exists but reading it failed.
    #[error("An unknown error occurred reading {name}: {source}")]
    Io {
        /// Name of the dimension.
        name: String,
        /// Path that was read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl DimensionReadError {
    /// Returns the name of the dimension that could not be read.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::NotFound { name, .. } | Self::Io { name, .. } => name,
        }
    }
}

/// Reader for the default environment dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentDimensions {
    base_dir: PathBuf,
    files: Vec<String>,
}

impl EnvironmentDimensions {
    /// Creates a reader for the default dimension files under `base_dir`.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self::with_files(base_dir, DEFAULT_DIMENSION_FILES)
    }

    /// Creates a reader for a custom list of dimension files.
    #[must_use]
    pub fn with_files<I, S>(base_dir: impl Into<PathBuf>, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            base_dir: base_dir.into(),
            files: files.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the directory dimension files are read from.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns the dimension file names in report order.
    #[must_use]
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Reads a single dimension file.
    ///
    /// Surrounding whitespace, including the trailing newline, is trimmed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the file is missing and `Io` for any other
    /// read failure.
    pub fn read(&self, name: &str) -> Result<Dimension, DimensionReadError> {
        let path = self.base_dir.join(name);

        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Dimension::new(name, contents.trim())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(DimensionReadError::NotFound {
                name: name.to_string(),
                path,
            }),
            Err(source) => Err(DimensionReadError::Io {
                name: name.to_string(),
                path,
                source,
            }),
        }
    }

    /// Reads every dimension file, one result per file in report order.
    #[must_use]
    pub fn read_all(&self) -> Vec<Result<Dimension, DimensionReadError>> {
        self.files.iter().map(|name| self.read(name)).collect()
    }

    /// Reads every dimension file and keeps the ones that could be read.
    ///
    /// Each failure is logged as a warning.
    #[must_use]
    pub fn collect(&self) -> Vec<Dimension> {
        self.read_all()
            .into_iter()
            .filter_map(|result| match result {
                Ok(dimension) => Some(dimension),
                Err(error @ DimensionReadError::NotFound { .. }) => {
                    tracing::warn!(dimension = error.name(), "{error}");
                    None
                }
                Err(error @ DimensionReadError::Io { .. }) => {
                    tracing::warn!(dimension = error.name(), error = %error, "Failed to read dimension file");
                    None
                }
            })
            .collect()
    }
}

impl Default for EnvironmentDimensions {
    fn default() -> Self {
        Self::new(DEFAULT_ENV_DIR)
    }
}
