//! Layered `KEY=VALUE` option sets.
//!
//! `ogr2ogr` takes three families of string options: dataset-creation options
//! (`-dsco`), layer-creation options (`-lco`) and configuration options
//! (`--config`). For each family the command builder keeps an [`OptionLayer`]:
//! defaults it derives itself (from the encoding or the output format) sit
//! underneath the overrides the user supplies, and the effective set is
//! computed on demand.

use std::collections::BTreeMap;

use crate::error::{ConfigError, Result};

/// A string-to-string option map with deterministic (sorted) iteration.
pub type OptionMap = BTreeMap<String, String>;

/// Builder-derived defaults overlaid with user overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionLayer {
    defaults: OptionMap,
    overrides: OptionMap,
}

impl OptionLayer {
    /// Creates an empty layer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a default. User overrides for the same key still win.
    pub fn set_default(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.defaults.insert(key.into(), value.into());
    }

    /// Replaces the whole override map. Defaults are left untouched.
    pub fn set_overrides(&mut self, overrides: OptionMap) {
        self.overrides = overrides;
    }

    /// The builder-derived defaults.
    #[must_use]
    pub fn defaults(&self) -> &OptionMap {
        &self.defaults
    }

    /// The user-supplied overrides.
    #[must_use]
    pub fn overrides(&self) -> &OptionMap {
        &self.overrides
    }

    /// The effective options: defaults, with overrides winning on collision.
    #[must_use]
    pub fn merged(&self) -> OptionMap {
        merge(&self.defaults, &self.overrides)
    }
}

/// Overlays `overrides` on top of `defaults`.
#[must_use]
pub fn merge(defaults: &OptionMap, overrides: &OptionMap) -> OptionMap {
    let mut result = defaults.clone();
    result.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    result
}

/// Parses a `KEY=VALUE` pair as given on a command line.
///
/// The value may itself contain `=`; only the first one separates.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidOption`] if there is no `=` or the key is empty.
pub fn parse_option_pair(text: &str) -> Result<(String, String)> {
    let (key, value) = text.split_once('=').ok_or_else(|| ConfigError::InvalidOption {
        option: text.to_string(),
        message: "expected KEY=VALUE".to_string(),
    })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ConfigError::InvalidOption {
            option: text.to_string(),
            message: "option name must not be empty".to_string(),
        }
        .into());
    }
    Ok((key.to_string(), value.to_string()))
}

/// Builds an [`OptionMap`] from any iterator of pairs.
pub fn option_map<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> OptionMap
where
    K: Into<String>,
    V: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}
