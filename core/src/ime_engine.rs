//! IME engine: owns the current composition state and applies key routing.
//!
//! The `ImeEngine` wraps a `TableCatalog` and a `CandidateMatcher` with the
//! single "current state" cell. `process_key()` asks the `KeyRouter` what to
//! do, applies the produced states in order, folds `Committing` back to
//! `Idle`, and mirrors the result into an `ImeContext` for the platform.

use crate::catalog::{TableCatalog, TableSelector};
use crate::context::ImeContext;
use crate::key::KeyDescriptor;
use crate::matcher::CandidateMatcher;
use crate::router::{KeyResult, KeyRouter};
use crate::state::CompositionState;
use crate::Config;
use tracing::{debug, info, warn};

/// What the platform should do with a key after `process_key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyResponse {
    /// Suppress the key's default behavior
    pub handled: bool,
    /// Signal an audible or visual error cue
    pub error: bool,
}

/// IME engine with a single composition session.
pub struct ImeEngine {
    catalog: TableCatalog,
    matcher: CandidateMatcher,
    state: CompositionState,
    context: ImeContext,
}

impl ImeEngine {
    /// Create an engine over `catalog`.
    ///
    /// `config.strict_tables` applies to later loads; `config.default_table`
    /// is selected immediately when set.
    pub fn new(mut catalog: TableCatalog, config: &Config) -> Self {
        catalog.set_strictness(config.strictness());
        if let Some(id) = &config.default_table {
            if !catalog.select_table(id.as_str()) {
                warn!(table = %id, "default table could not be selected");
            }
        }
        let matcher =
            CandidateMatcher::with_cache_size(catalog.active_table().clone(), config.max_cache_size);
        Self {
            catalog,
            matcher,
            state: CompositionState::Idle,
            context: ImeContext::new(),
        }
    }

    /// Get a reference to the context for reading IME state.
    pub fn context(&self) -> &ImeContext {
        &self.context
    }

    /// Get a mutable reference to the context.
    pub fn context_mut(&mut self) -> &mut ImeContext {
        &mut self.context
    }

    /// Current durable state (never `Committing`).
    pub fn state(&self) -> &CompositionState {
        &self.state
    }

    pub fn catalog(&self) -> &TableCatalog {
        &self.catalog
    }

    pub fn matcher(&self) -> &CandidateMatcher {
        &self.matcher
    }

    /// Take text committed since the last call.
    pub fn take_commit(&mut self) -> String {
        self.context.take_commit()
    }

    /// Process a key event.
    pub fn process_key(&mut self, key: &KeyDescriptor) -> KeyResponse {
        if key.is_release {
            return KeyResponse::default();
        }

        let result = KeyRouter::new(&self.matcher).route(key, &self.state);
        match result {
            KeyResult::NotHandled => KeyResponse::default(),
            KeyResult::Handled(states) => {
                for state in states {
                    self.enter_state(state);
                }
                KeyResponse {
                    handled: true,
                    error: false,
                }
            }
            KeyResult::Rejected { consumed } => KeyResponse {
                handled: consumed,
                error: true,
            },
        }
    }

    /// Commit the candidate at `index` on the current page, followed by a
    /// space. Returns false when there is no such candidate.
    pub fn select_candidate(&mut self, index: usize) -> bool {
        let text = match &self.state {
            CompositionState::Composing(composing) => composing
                .candidate_list()
                .page_candidate(index)
                .map(|c| format!("{} ", c.display_text)),
            _ => None,
        };
        match text {
            Some(text) => {
                self.enter_state(CompositionState::committing(text));
                true
            }
            None => false,
        }
    }

    /// Reset to `Idle`, committing any composed text as typed.
    pub fn reset(&mut self) {
        let pending = self
            .state
            .as_composing()
            .map(|c| c.buffer().to_string())
            .filter(|buffer| !buffer.is_empty());
        if let Some(buffer) = pending {
            self.context.commit_text.push_str(&buffer);
        }
        self.enter_state(CompositionState::Idle);
    }

    /// Switch the active table. On failure the previous table stays active.
    pub fn select_table<S: Into<TableSelector>>(&mut self, selector: S) -> bool {
        if !self.catalog.select_table(selector) {
            return false;
        }
        self.matcher.set_table(self.catalog.active_table().clone());
        info!(table = %self.catalog.active_table().name(), "engine table switched");
        true
    }

    fn enter_state(&mut self, state: CompositionState) {
        match state {
            CompositionState::Committing { text } => {
                debug!(%text, "commit");
                self.context.commit_text.push_str(&text);
                self.state = CompositionState::Idle;
            }
            other => self.state = other,
        }
        self.context.sync_from_state(&self.state);
    }
}
