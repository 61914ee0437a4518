//! Formosan-specific configuration that extends the base `Config` from core.
//!
//! This configuration includes:
//! - All generic options from `libfox_core::Config` (flattened via serde)
//! - The table option index (`0..42`, see `tables::TABLE_CODES`)
//! - An explicit table data directory
//!
//! # Example
//!
//! ```rust
//! use libformosan::FormosanConfig;
//!
//! let config = FormosanConfig::from_toml_str("table = 3\nmax_cache_size = 64\n").unwrap();
//! assert_eq!(config.table, 3);
//! assert_eq!(config.base().max_cache_size, 64);
//! ```

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FormosanConfig {
    /// Base configuration fields (cache size, strictness, default table)
    #[serde(flatten)]
    pub base: libfox_core::Config,

    /// Index into the table options; out-of-range values are ignored
    pub table: usize,

    /// Directory holding the `TW_xx.json` tables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl FormosanConfig {
    /// Convert this config into the base config
    pub fn into_base(self) -> libfox_core::Config {
        self.base
    }

    /// Get a reference to the base config
    pub fn base(&self) -> &libfox_core::Config {
        &self.base
    }

    /// Get a mutable reference to the base config
    pub fn base_mut(&mut self) -> &mut libfox_core::Config {
        &mut self.base
    }

    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_toml_string()?)
            .with_context(|| format!("writing config {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = FormosanConfig::from_toml_str("").unwrap();
        assert_eq!(config, FormosanConfig::default());
        assert_eq!(config.table, 0);
        assert_eq!(config.base.max_cache_size, 256);
    }

    #[test]
    fn flattened_fields_round_trip() {
        let mut config = FormosanConfig {
            table: 12,
            data_dir: Some(PathBuf::from("/usr/share/fox/data")),
            ..FormosanConfig::default()
        };
        config.base_mut().strict_tables = true;

        let text = config.to_toml_string().unwrap();
        assert!(text.contains("strict_tables = true"));
        assert_eq!(FormosanConfig::from_toml_str(&text).unwrap(), config);
    }
}
