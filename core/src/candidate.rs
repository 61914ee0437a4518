//! Candidate types for table completion.
//!
//! This module provides:
//! - `Candidate`: a display text plus its (possibly merged) description
//! - `CandidateList`: candidates with a selection and the derived page view

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Number of candidates shown per page (and selectable with digits 1-9).
pub const CANDIDATES_PER_PAGE: usize = 9;

/// A selectable completion derived from one or more phrase table entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub display_text: String,
    /// Source descriptions joined by `/` when several entries share a display text
    pub description: String,
}

impl Candidate {
    pub fn new<T: Into<String>, D: Into<String>>(display_text: T, description: D) -> Self {
        Candidate {
            display_text: display_text.into(),
            description: description.into(),
        }
    }
}

/// Page of the candidate list that contains the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PageView {
    index: usize,
    count: usize,
    range: Range<usize>,
    selected_in_page: usize,
}

impl PageView {
    fn compute(len: usize, selected: usize) -> Self {
        let index = selected / CANDIDATES_PER_PAGE;
        let start = index * CANDIDATES_PER_PAGE;
        let end = (start + CANDIDATES_PER_PAGE).min(len);
        Self {
            index,
            count: len.div_ceil(CANDIDATES_PER_PAGE),
            range: start..end,
            selected_in_page: selected % CANDIDATES_PER_PAGE,
        }
    }
}

/// An immutable candidate list with a selection and its page view.
///
/// A non-empty list always has a selection inside bounds; an empty list has
/// neither a selection nor a page. The page view is recomputed on every
/// construction, so values built from the same candidates and selection
/// compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CandidateList {
    candidates: Vec<Candidate>,
    selected: Option<usize>,
    page: Option<PageView>,
}

impl CandidateList {
    /// Build a list; the selection defaults to 0 and is clamped into range.
    pub fn new(candidates: Vec<Candidate>, selected: Option<usize>) -> Self {
        if candidates.is_empty() {
            return Self::default();
        }
        let selected = selected.unwrap_or(0).min(candidates.len() - 1);
        let page = PageView::compute(candidates.len(), selected);
        Self {
            candidates,
            selected: Some(selected),
            page: Some(page),
        }
    }

    /// Build a list selecting the first candidate, if any.
    pub fn from_candidates(candidates: Vec<Candidate>) -> Self {
        Self::new(candidates, None)
    }

    /// Get all candidates.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Global index of the selected candidate.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_candidate(&self) -> Option<&Candidate> {
        self.selected.and_then(|i| self.candidates.get(i))
    }

    /// Index of the page holding the selection.
    pub fn page_index(&self) -> Option<usize> {
        self.page.as_ref().map(|p| p.index)
    }

    /// Total number of pages.
    pub fn page_count(&self) -> Option<usize> {
        self.page.as_ref().map(|p| p.count)
    }

    /// Position of the selection within its page.
    pub fn selected_index_in_page(&self) -> Option<usize> {
        self.page.as_ref().map(|p| p.selected_in_page)
    }

    /// Candidates on the page holding the selection.
    pub fn page_candidates(&self) -> &[Candidate] {
        match &self.page {
            Some(p) => &self.candidates[p.range.clone()],
            None => &[],
        }
    }

    /// Candidate at a 0-based position on the current page.
    pub fn page_candidate(&self, position: usize) -> Option<&Candidate> {
        self.page_candidates().get(position)
    }

    /// Same candidates with a different selection.
    pub fn with_selected(&self, selected: usize) -> Self {
        Self::new(self.candidates.clone(), Some(selected))
    }

    /// Move the selection up one, wrapping to the last candidate.
    pub fn select_previous(&self) -> Option<Self> {
        let count = self.len();
        let current = self.selected?;
        Some(self.with_selected((current + count - 1) % count))
    }

    /// Move the selection down one, wrapping to the first candidate.
    pub fn select_next(&self) -> Option<Self> {
        let count = self.len();
        let current = self.selected?;
        Some(self.with_selected((current + 1) % count))
    }

    /// Jump to the first candidate of the next page, or the last candidate.
    pub fn select_next_page(&self) -> Option<Self> {
        let current = self.selected?;
        let next = ((current / CANDIDATES_PER_PAGE) + 1) * CANDIDATES_PER_PAGE;
        Some(self.with_selected(next.min(self.len() - 1)))
    }

    /// Jump to the first candidate of the previous page, or the first candidate.
    pub fn select_previous_page(&self) -> Option<Self> {
        let current = self.selected?;
        let page = current / CANDIDATES_PER_PAGE;
        let target = if page > 0 {
            (page - 1) * CANDIDATES_PER_PAGE
        } else {
            0
        };
        Some(self.with_selected(target))
    }
}
