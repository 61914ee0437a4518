//! # libformosan
//!
//! Phrase-table input method for Formosan languages built on libfox-core.
//!
//! Each language is a `TW_xx.json` table in the data directory; the engine
//! completes romanized input against the selected table.

pub mod config;
pub mod engine;
pub mod keys;
pub mod tables;

// Re-export IME components from core
pub use libfox_core::{
    Candidate, CompositionState, ImeContext, ImeEngine, KeyDescriptor, KeyResponse, NamedKey,
    TableDescriptor, TableSelector,
};

pub use config::FormosanConfig;
pub use engine::{
    apply_config, create_ime_engine, create_ime_engine_at, resolve_data_dir, DATA_DIR_ENV,
};
pub use keys::parse_keys;
pub use tables::{code_for_option, formosan_catalog, table_ids, TABLE_CODES};
