//! libfox-core
//!
//! Language-agnostic composition engine shared by table-based input methods
//! (libformosan).
//!
//! Public API:
//! - `PhraseTable` - Sorted phrase/description table with prefix lookup
//! - `TableCatalog` - Discovers tables under a storage root, owns the active one
//! - `CandidateMatcher` - Prefix completion with case-folded merging and a cache
//! - `CompositionState` - Idle / Composing / Committing
//! - `KeyRouter` - Pure key decision function over composition states
//! - `ImeEngine` - Applies routed states and keeps the `ImeContext` current
//! - `Config` - Configuration shared by language crates
use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod table;
pub use table::{LoadStrictness, PhraseEntry, PhraseTable, TableError, TableFile};

pub mod catalog;
pub use catalog::{scan_directory, scan_ids, ScanConvention, TableCatalog, TableDescriptor, TableSelector};

pub mod candidate;
pub use candidate::{Candidate, CandidateList, CANDIDATES_PER_PAGE};

pub mod input_buffer;
pub use input_buffer::InputBuffer;

pub mod matcher;
pub use matcher::{CandidateMatcher, Completer};

pub mod key;
pub use key::{KeyDescriptor, NamedKey};

pub mod state;
pub use state::{Composing, CompositionState};

pub mod router;
pub use router::{is_input_char, KeyResult, KeyRouter};

pub mod context;
pub use context::ImeContext;

pub mod ime_engine;
pub use ime_engine::{ImeEngine, KeyResponse};

/// Generic configuration for the composition engine.
///
/// Language-specific options (table codes, data locations) belong in the
/// language crate's config, which flattens this one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of entries in the prefix -> candidates cache (0 disables it)
    pub max_cache_size: usize,

    /// Abort a table load on the first malformed entry instead of skipping it
    pub strict_tables: bool,

    /// Table id or display name selected when the engine starts
    pub default_table: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_cache_size: matcher::DEFAULT_CACHE_SIZE,
            strict_tables: false,
            default_table: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("writing config {}", path.display()))?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Table load strictness implied by `strict_tables`.
    pub fn strictness(&self) -> LoadStrictness {
        if self.strict_tables {
            LoadStrictness::Strict
        } else {
            LoadStrictness::Lenient
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_uses_defaults() {
        let config = Config::from_toml_str("strict_tables = true\n").unwrap();
        assert!(config.strict_tables);
        assert_eq!(config.max_cache_size, 256);
        assert_eq!(config.default_table, None);
        assert_eq!(config.strictness(), LoadStrictness::Strict);
    }

    #[test]
    fn toml_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fox.toml");
        let config = Config {
            max_cache_size: 16,
            strict_tables: false,
            default_table: Some("TW_03".to_string()),
        };
        config.save_toml(&path).unwrap();
        assert_eq!(Config::load_toml(&path).unwrap(), config);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let err = Config::load_toml("/nonexistent/fox.toml").unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }
}
