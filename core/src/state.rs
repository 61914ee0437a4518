//! Composition states.
//!
//! The engine is always in exactly one `CompositionState`. States are values:
//! every transition builds a fresh one and the owner replaces its current
//! state wholesale, so a new buffer can never be seen with stale candidates.

use crate::candidate::{Candidate, CandidateList};
use crate::input_buffer::InputBuffer;

/// Current mode of the composition engine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CompositionState {
    /// Nothing typed
    #[default]
    Idle,
    /// Buffer being composed, with candidates for it
    Composing(Composing),
    /// One-shot: emit `text` to the host, then return to `Idle`
    Committing { text: String },
}

impl CompositionState {
    pub fn committing<T: Into<String>>(text: T) -> Self {
        CompositionState::Committing { text: text.into() }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, CompositionState::Idle)
    }

    pub fn as_composing(&self) -> Option<&Composing> {
        match self {
            CompositionState::Composing(c) => Some(c),
            _ => None,
        }
    }
}

/// Payload of the composing state: buffer, cursor and the candidate list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Composing {
    buffer: InputBuffer,
    candidates: CandidateList,
}

impl Composing {
    /// Build a composing state.
    ///
    /// `cursor` is clamped to the buffer length (in chars). A non-empty
    /// candidate list always ends up with a selection (0 when `selected`
    /// is `None`); an empty one never has one.
    pub fn new<T: Into<String>>(
        buffer: T,
        cursor: usize,
        candidates: Vec<Candidate>,
        selected: Option<usize>,
    ) -> Self {
        Self {
            buffer: InputBuffer::with_cursor(buffer, cursor),
            candidates: CandidateList::new(candidates, selected),
        }
    }

    pub(crate) fn from_parts(buffer: InputBuffer, candidates: CandidateList) -> Self {
        Self { buffer, candidates }
    }

    pub fn buffer(&self) -> &str {
        self.buffer.text()
    }

    /// Cursor position in chars.
    pub fn cursor(&self) -> usize {
        self.buffer.cursor()
    }

    pub(crate) fn input(&self) -> &InputBuffer {
        &self.buffer
    }

    pub fn candidate_list(&self) -> &CandidateList {
        &self.candidates
    }

    pub fn candidates(&self) -> &[Candidate] {
        self.candidates.candidates()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.candidates.selected_index()
    }

    pub fn selected_candidate(&self) -> Option<&Candidate> {
        self.candidates.selected_candidate()
    }

    pub fn page_candidates(&self) -> &[Candidate] {
        self.candidates.page_candidates()
    }

    pub fn page_index(&self) -> Option<usize> {
        self.candidates.page_index()
    }

    pub fn page_count(&self) -> Option<usize> {
        self.candidates.page_count()
    }

    pub fn selected_index_in_page(&self) -> Option<usize> {
        self.candidates.selected_index_in_page()
    }
}
