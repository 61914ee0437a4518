//! Prefix completion against the active phrase table.
//!
//! `CandidateMatcher::complete` turns the composing buffer into a ranked,
//! deduplicated candidate list:
//! 1. Locate the block of entries starting with the prefix (binary search on
//!    the sorted table, then a forward scan).
//! 2. Merge entries whose phrases are equal ignoring case; their descriptions
//!    are joined with `/`.
//! 3. For a prefix starting with an uppercase letter, also complete the
//!    lowercased prefix and capitalize those results, appended after the
//!    literal matches.
//! 4. Stable-sort everything by display length.
//!
//! Results are kept in an LRU cache keyed by prefix, cleared whenever the
//! table is replaced.

use crate::candidate::Candidate;
use crate::table::PhraseTable;
use ahash::AHashMap;
use lru::LruCache;
use std::cell::{Cell, RefCell};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::debug;

/// Default number of cached completions.
pub const DEFAULT_CACHE_SIZE: usize = 256;

/// Anything that can turn a composing buffer into candidates.
///
/// The key router only needs this; tests can stub it.
pub trait Completer {
    fn complete(&self, prefix: &str) -> Vec<Candidate>;
}

/// Completion over one phrase table with a result cache.
pub struct CandidateMatcher {
    table: Arc<PhraseTable>,
    cache: Option<RefCell<LruCache<String, Vec<Candidate>>>>,
    cache_hits: Cell<usize>,
    cache_misses: Cell<usize>,
}

impl CandidateMatcher {
    pub fn new(table: Arc<PhraseTable>) -> Self {
        Self::with_cache_size(table, DEFAULT_CACHE_SIZE)
    }

    /// A matcher caching up to `cache_size` completions; 0 disables the cache.
    pub fn with_cache_size(table: Arc<PhraseTable>, cache_size: usize) -> Self {
        Self {
            table,
            cache: NonZeroUsize::new(cache_size).map(|cap| RefCell::new(LruCache::new(cap))),
            cache_hits: Cell::new(0),
            cache_misses: Cell::new(0),
        }
    }

    pub fn table(&self) -> &Arc<PhraseTable> {
        &self.table
    }

    /// Replace the table being searched. Cached results are dropped.
    pub fn set_table(&mut self, table: Arc<PhraseTable>) {
        self.table = table;
        self.clear_cache();
    }

    /// Ranked candidates for `prefix`. Empty prefix gives no candidates.
    pub fn complete(&self, prefix: &str) -> Vec<Candidate> {
        if prefix.is_empty() {
            return Vec::new();
        }

        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.borrow_mut().get(prefix) {
                self.cache_hits.set(self.cache_hits.get() + 1);
                return cached.clone();
            }
            self.cache_misses.set(self.cache_misses.get() + 1);
        }

        let mut results = self.complete_literal(prefix);
        if prefix.chars().next().is_some_and(char::is_uppercase) {
            let lowered = self.complete_literal(&prefix.to_lowercase());
            results.extend(lowered.into_iter().map(|c| Candidate {
                display_text: capitalize_first(&c.display_text),
                description: c.description,
            }));
        }
        results.sort_by_key(|c| c.display_text.chars().count());
        debug!(prefix, count = results.len(), "completed prefix");

        if let Some(cache) = &self.cache {
            cache.borrow_mut().put(prefix.to_string(), results.clone());
        }
        results
    }

    /// Entries starting with `prefix` exactly as typed, case-insensitive
    /// duplicates merged, in table order.
    fn complete_literal(&self, prefix: &str) -> Vec<Candidate> {
        if prefix.is_empty() {
            return Vec::new();
        }

        let range = self.table.prefix_range(prefix);
        let entries = &self.table.entries()[range];

        let mut results: Vec<Candidate> = Vec::new();
        // lowercased display text -> index in results
        let mut seen: AHashMap<String, usize> = AHashMap::new();
        for entry in entries {
            let folded = entry.phrase.to_lowercase();
            match seen.get(&folded) {
                Some(&i) => {
                    let existing = &mut results[i];
                    existing.description.push('/');
                    existing.description.push_str(&entry.description);
                }
                None => {
                    seen.insert(folded, results.len());
                    results.push(Candidate::new(entry.phrase.clone(), entry.description.clone()));
                }
            }
        }
        results
    }

    /// Get cache statistics as `(hits, misses)`.
    pub fn cache_stats(&self) -> (usize, usize) {
        (self.cache_hits.get(), self.cache_misses.get())
    }

    /// Hit rate as a percentage, or `None` before the first lookup.
    pub fn cache_hit_rate(&self) -> Option<f64> {
        let (hits, misses) = self.cache_stats();
        let total = hits + misses;
        (total > 0).then(|| hits as f64 * 100.0 / total as f64)
    }

    /// Current number of cached completions.
    pub fn cache_size(&self) -> usize {
        self.cache.as_ref().map_or(0, |c| c.borrow().len())
    }

    /// Drop cached completions and reset statistics.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.borrow_mut().clear();
        }
        self.cache_hits.set(0);
        self.cache_misses.set(0);
    }
}

impl Completer for CandidateMatcher {
    fn complete(&self, prefix: &str) -> Vec<Candidate> {
        CandidateMatcher::complete(self, prefix)
    }
}

/// Uppercase the first character, leaving the rest untouched.
fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
