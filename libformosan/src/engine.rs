//! Building a Formosan `ImeEngine` from configuration.
//!
//! Table data lives in a `fox/data` directory. It is located by, in order:
//! the config's `data_dir`, `$FOX_DATA_DIR`, `$XDG_DATA_HOME/fox/data`, and
//! `$HOME/.local/share/fox/data`. The first candidate that exists wins.

use crate::config::FormosanConfig;
use crate::tables::{code_for_option, formosan_catalog};
use anyhow::bail;
use libfox_core::ImeEngine;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the table data directory.
pub const DATA_DIR_ENV: &str = "FOX_DATA_DIR";

/// Data directory path below a platform data home.
pub const DATA_SUBDIR: &str = "fox/data";

/// Candidate data directories in lookup order, from config and `env`.
pub fn data_dir_candidates<F>(config: &FormosanConfig, env: F) -> Vec<PathBuf>
where
    F: Fn(&str) -> Option<OsString>,
{
    let mut candidates = Vec::new();
    if let Some(dir) = &config.data_dir {
        candidates.push(dir.clone());
    }
    if let Some(dir) = env(DATA_DIR_ENV) {
        candidates.push(PathBuf::from(dir));
    }
    if let Some(xdg) = env("XDG_DATA_HOME") {
        candidates.push(PathBuf::from(xdg).join(DATA_SUBDIR));
    }
    if let Some(home) = env("HOME") {
        candidates.push(PathBuf::from(home).join(".local/share").join(DATA_SUBDIR));
    }
    candidates
}

/// First existing data directory for `config`, reading the process environment.
pub fn resolve_data_dir(config: &FormosanConfig) -> anyhow::Result<PathBuf> {
    resolve_data_dir_with(config, |key| std::env::var_os(key))
}

/// Like `resolve_data_dir` with an explicit environment lookup.
pub fn resolve_data_dir_with<F>(config: &FormosanConfig, env: F) -> anyhow::Result<PathBuf>
where
    F: Fn(&str) -> Option<OsString>,
{
    let candidates = data_dir_candidates(config, env);
    if let Some(found) = candidates.iter().find(|dir| dir.is_dir()) {
        info!(path = %found.display(), "using table data directory");
        return Ok(found.clone());
    }
    let tried: Vec<String> = candidates.iter().map(|p| p.display().to_string()).collect();
    bail!(
        "no table data directory found (tried: {})",
        if tried.is_empty() {
            "nothing".to_string()
        } else {
            tried.join(", ")
        }
    )
}

/// Create an engine over the resolved data directory.
pub fn create_ime_engine(config: &FormosanConfig) -> anyhow::Result<ImeEngine> {
    let data_dir = resolve_data_dir(config)?;
    Ok(create_ime_engine_at(data_dir, config))
}

/// Create an engine over `data_dir`.
///
/// The first available table is activated, then the configured one.
pub fn create_ime_engine_at<P: AsRef<Path>>(data_dir: P, config: &FormosanConfig) -> ImeEngine {
    let catalog = formosan_catalog(data_dir.as_ref(), config.base.strictness());
    let mut engine = ImeEngine::new(catalog, &config.base);
    if engine.catalog().active_descriptor().is_none() && !engine.catalog().tables().is_empty() {
        engine.select_table(0);
    }
    apply_config(&mut engine, config);
    engine
}

/// Select the table named by `config.table`.
///
/// An explicit `default_table` in the base config takes precedence and is
/// applied when the engine is created, so the index is skipped then. Returns
/// whether a table was switched.
pub fn apply_config(engine: &mut ImeEngine, config: &FormosanConfig) -> bool {
    if config.base.default_table.is_some() {
        return false;
    }
    let Some(code) = code_for_option(config.table) else {
        warn!(index = config.table, "table option out of range, ignored");
        return false;
    };
    let switched = engine.select_table(code);
    if !switched {
        warn!(code, "configured table unavailable, keeping current");
    }
    switched
}
