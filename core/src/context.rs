//! IME context for platform communication.
//!
//! The `ImeContext` struct is a simple data container with public fields that
//! platforms use to render the IME. After calling `process_key()` on the
//! engine, the platform reads these fields to update the UI.
//!
//! Zero abstraction: no callbacks, no traits. Platform code reads fields
//! directly and consumes `commit_text`.

use crate::state::{Composing, CompositionState};

/// IME context for platform communication.
///
/// # Fields
///
/// - `preedit_text`: Text being composed (displayed with underline)
/// - `preedit_cursor`: Cursor position within preedit (char offset)
/// - `commit_text`: Text to insert into the application (consume and clear)
/// - `candidates`: Display texts of the current candidate page
/// - `descriptions`: Descriptions matching `candidates`
/// - `candidate_cursor`: Highlighted candidate within the page
/// - `auxiliary_text`: Page indicator such as "2/3" when there are several pages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImeContext {
    pub preedit_text: String,

    /// Cursor position within preedit text (char offset)
    pub preedit_cursor: usize,

    /// Committed text not yet consumed by the platform
    pub commit_text: String,

    pub candidates: Vec<String>,

    pub descriptions: Vec<String>,

    pub candidate_cursor: usize,

    pub auxiliary_text: String,
}

impl ImeContext {
    /// Create a new empty IME context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all state (preedit, candidates, auxiliary).
    /// Does NOT clear commit_text (platform should consume it first).
    pub fn clear(&mut self) {
        self.preedit_text.clear();
        self.preedit_cursor = 0;
        self.candidates.clear();
        self.descriptions.clear();
        self.candidate_cursor = 0;
        self.auxiliary_text.clear();
    }

    /// Take the commit text, leaving it empty.
    pub fn take_commit(&mut self) -> String {
        std::mem::take(&mut self.commit_text)
    }

    /// Check if there's any visible state (preedit or candidates).
    pub fn has_visible_state(&self) -> bool {
        !self.preedit_text.is_empty() || !self.candidates.is_empty()
    }

    /// Check if there's text to commit.
    pub fn has_commit(&self) -> bool {
        !self.commit_text.is_empty()
    }

    /// Mirror a durable state into the visible fields.
    pub fn sync_from_state(&mut self, state: &CompositionState) {
        match state {
            CompositionState::Composing(composing) => self.show_composing(composing),
            CompositionState::Idle | CompositionState::Committing { .. } => self.clear(),
        }
    }

    fn show_composing(&mut self, composing: &Composing) {
        self.preedit_text = composing.buffer().to_string();
        self.preedit_cursor = composing.cursor();

        let page = composing.page_candidates();
        self.candidates = page.iter().map(|c| c.display_text.clone()).collect();
        self.descriptions = page.iter().map(|c| c.description.clone()).collect();
        self.candidate_cursor = composing.selected_index_in_page().unwrap_or(0);

        self.auxiliary_text = match (composing.page_index(), composing.page_count()) {
            (Some(index), Some(count)) if count > 1 => format!("{}/{}", index + 1, count),
            _ => String::new(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::Candidate;

    #[test]
    fn composing_fills_page_and_indicator() {
        let candidates: Vec<Candidate> = (0..12)
            .map(|i| Candidate::new(format!("w{}", i), format!("d{}", i)))
            .collect();
        let state = CompositionState::Composing(Composing::new("w", 1, candidates, Some(10)));

        let mut ctx = ImeContext::new();
        ctx.sync_from_state(&state);
        assert_eq!(ctx.preedit_text, "w");
        assert_eq!(ctx.preedit_cursor, 1);
        assert_eq!(ctx.candidates, vec!["w9", "w10", "w11"]);
        assert_eq!(ctx.descriptions[1], "d10");
        assert_eq!(ctx.candidate_cursor, 1);
        assert_eq!(ctx.auxiliary_text, "2/2");
        assert!(ctx.has_visible_state());
    }

    #[test]
    fn single_page_has_no_indicator() {
        let state = CompositionState::Composing(Composing::new(
            "a",
            1,
            vec![Candidate::new("a", "A")],
            None,
        ));
        let mut ctx = ImeContext::new();
        ctx.sync_from_state(&state);
        assert!(ctx.auxiliary_text.is_empty());
    }

    #[test]
    fn idle_clears_but_keeps_commit() {
        let mut ctx = ImeContext::new();
        ctx.preedit_text = "abc".into();
        ctx.commit_text = "done".into();
        ctx.sync_from_state(&CompositionState::Idle);
        assert!(!ctx.has_visible_state());
        assert_eq!(ctx.take_commit(), "done");
        assert!(!ctx.has_commit());
    }
}
