//! Tool configuration.
//!
//! Locating the `ogr2ogr` executable: an explicit path wins, then the
//! `OGR2OGR_PATH` environment variable, then [`DEFAULT_OGR2OGR_PATH`].

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Where `ogr2ogr` lives on a stock GDAL install.
pub const DEFAULT_OGR2OGR_PATH: &str = "/usr/bin/ogr2ogr";

/// Environment variable consulted for the executable path.
pub const OGR2OGR_PATH_ENV: &str = "OGR2OGR_PATH";

/// Settings shared by every command built from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    command_path: PathBuf,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            command_path: PathBuf::from(DEFAULT_OGR2OGR_PATH),
        }
    }
}

impl ToolConfig {
    /// Uses the given executable.
    #[must_use]
    pub fn with_command_path(path: impl Into<PathBuf>) -> Self {
        Self {
            command_path: path.into(),
        }
    }

    /// Applies the resolution order to an explicit path and the value of
    /// `OGR2OGR_PATH` (as read by `std::env::var_os`).
    ///
    /// Empty values count as unset.
    #[must_use]
    pub fn resolve(explicit: Option<PathBuf>, env_value: Option<OsString>) -> Self {
        let command_path = explicit
            .filter(|p| !p.as_os_str().is_empty())
            .or_else(|| env_value.filter(|v| !v.is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OGR2OGR_PATH));
        log::debug!("Using ogr2ogr at {}", command_path.display());
        Self { command_path }
    }

    /// The `ogr2ogr` executable.
    #[must_use]
    pub fn command_path(&self) -> &Path {
        &self.command_path
    }
}
