//! Phrase tables for one input language.
//!
//! A table resource is a JSON document of the form
//!
//! ```json
//! { "name": "...", "data": [["phrase", "description"], ...] }
//! ```
//!
//! Loading always produces entries sorted by phrase (byte order), which is what
//! the candidate matcher's binary search depends on.
//!
//! Public API:
//! - `PhraseEntry`: one (phrase, description) pair
//! - `PhraseTable`: sorted, immutable entry list with exact and prefix lookup
//! - `TableFile`: serde model of the on-disk resource (used by writers)
//! - `TableError`: unreadable vs malformed resource

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A single (phrase, description) pair from a table resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseEntry {
    pub phrase: String,
    pub description: String,
}

impl PhraseEntry {
    pub fn new<P: Into<String>, D: Into<String>>(phrase: P, description: D) -> Self {
        Self {
            phrase: phrase.into(),
            description: description.into(),
        }
    }
}

/// Errors raised while loading a table resource.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("cannot read table {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed table {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

impl TableError {
    fn malformed<R: Into<String>>(path: &Path, reason: R) -> Self {
        TableError::Malformed {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// How to treat individual entries that do not look like `[phrase, description]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStrictness {
    /// Skip entries that are not arrays of at least two strings.
    #[default]
    Lenient,
    /// Abort the load on the first entry that is not exactly two strings.
    Strict,
}

/// On-disk table resource, as written by the conversion tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub data: Vec<(String, String)>,
}

impl TableFile {
    /// Read only the `name` field of a table resource.
    ///
    /// Returns `None` when the file cannot be read or parsed, or carries no
    /// name. The `data` array is skipped without being materialized.
    pub fn peek_name<P: AsRef<Path>>(path: P) -> Option<String> {
        #[derive(Deserialize)]
        struct NameOnly {
            #[serde(default)]
            name: Option<String>,
        }

        let text = fs::read_to_string(path).ok()?;
        let parsed: NameOnly = serde_json::from_str(&text).ok()?;
        parsed.name.filter(|n| !n.is_empty())
    }
}

/// An immutable phrase table sorted by phrase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhraseTable {
    name: String,
    entries: Vec<PhraseEntry>,
}

impl PhraseTable {
    /// The empty fallback table.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from unsorted entries. Entries are stable-sorted by phrase.
    pub fn from_entries<N: Into<String>>(name: N, mut entries: Vec<PhraseEntry>) -> Self {
        entries.sort_by(|a, b| a.phrase.cmp(&b.phrase));
        Self {
            name: name.into(),
            entries,
        }
    }

    /// Load a table resource from disk.
    pub fn load<P: AsRef<Path>>(path: P, strictness: LoadStrictness) -> Result<Self, TableError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| TableError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::parse(&text, path, strictness)?;
        info!(
            path = %path.display(),
            name = %table.name,
            entries = table.len(),
            "loaded phrase table"
        );
        Ok(table)
    }

    /// Parse a table resource from a JSON string. `origin` is only used in errors.
    pub fn parse(text: &str, origin: &Path, strictness: LoadStrictness) -> Result<Self, TableError> {
        let root: Value = serde_json::from_str(text)
            .map_err(|e| TableError::malformed(origin, format!("invalid JSON: {}", e)))?;
        let Value::Object(root) = root else {
            return Err(TableError::malformed(origin, "top level is not an object"));
        };

        let name = match root.get("name") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(_) if strictness == LoadStrictness::Strict => {
                return Err(TableError::malformed(origin, "`name` is not a string"));
            }
            Some(_) => String::new(),
        };

        let items = match root.get("data") {
            Some(Value::Array(items)) => items.as_slice(),
            None => &[],
            Some(_) if strictness == LoadStrictness::Strict => {
                return Err(TableError::malformed(origin, "`data` is not an array"));
            }
            Some(_) => &[],
        };

        let mut entries = Vec::with_capacity(items.len());
        let mut skipped = 0usize;
        for (i, item) in items.iter().enumerate() {
            match parse_pair(item, strictness) {
                Some(entry) => entries.push(entry),
                None if strictness == LoadStrictness::Strict => {
                    return Err(TableError::malformed(
                        origin,
                        format!("entry {} is not a [phrase, description] pair", i),
                    ));
                }
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            warn!(path = %origin.display(), skipped, "skipped malformed table entries");
        }

        Ok(Self::from_entries(name, entries))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All entries in sorted order.
    pub fn entries(&self) -> &[PhraseEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose phrase equals `phrase`.
    pub fn get_exact(&self, phrase: &str) -> &[PhraseEntry] {
        let start = self.lower_bound(phrase);
        let len = self.entries[start..]
            .iter()
            .take_while(|e| e.phrase == phrase)
            .count();
        &self.entries[start..start + len]
    }

    /// Index range of the entries whose phrase starts with `prefix`.
    ///
    /// Anything ordered before `prefix` cannot start with it, so the first
    /// match is the lower bound of `prefix`; sortedness makes matches contiguous.
    pub fn prefix_range(&self, prefix: &str) -> Range<usize> {
        let start = self.lower_bound(prefix);
        let len = self.entries[start..]
            .iter()
            .take_while(|e| e.phrase.starts_with(prefix))
            .count();
        start..start + len
    }

    fn lower_bound(&self, key: &str) -> usize {
        self.entries.partition_point(|e| e.phrase.as_str() < key)
    }
}

fn parse_pair(item: &Value, strictness: LoadStrictness) -> Option<PhraseEntry> {
    let fields = item.as_array()?;
    match strictness {
        LoadStrictness::Strict if fields.len() != 2 => return None,
        _ if fields.len() < 2 => return None,
        _ => {}
    }
    let phrase = fields[0].as_str()?;
    let description = fields[1].as_str()?;
    Some(PhraseEntry::new(phrase, description))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str, strictness: LoadStrictness) -> Result<PhraseTable, TableError> {
        PhraseTable::parse(text, Path::new("test.json"), strictness)
    }

    #[test]
    fn parse_sorts_entries_by_phrase() {
        let table = parse(
            r#"{"name": "T", "data": [["b", "B"], ["a", "A"], ["ab", "AB"]]}"#,
            LoadStrictness::Lenient,
        )
        .unwrap();
        let phrases: Vec<&str> = table.entries().iter().map(|e| e.phrase.as_str()).collect();
        assert_eq!(phrases, vec!["a", "ab", "b"]);
        assert_eq!(table.name(), "T");
    }

    #[test]
    fn sort_is_stable_for_equal_phrases() {
        let table = parse(
            r#"{"data": [["dup", "D1"], ["a", "A"], ["dup", "D2"]]}"#,
            LoadStrictness::Lenient,
        )
        .unwrap();
        let dup = table.get_exact("dup");
        assert_eq!(dup.len(), 2);
        assert_eq!(dup[0].description, "D1");
        assert_eq!(dup[1].description, "D2");
    }

    #[test]
    fn missing_name_defaults_to_empty() {
        let table = parse(r#"{"data": [["a", "A"]]}"#, LoadStrictness::Lenient).unwrap();
        assert_eq!(table.name(), "");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn lenient_skips_malformed_pairs() {
        let table = parse(
            r#"{"name": "T", "data": [["a", "A"], ["lonely"], 42, ["x", 1], ["c", "C", "extra"]]}"#,
            LoadStrictness::Lenient,
        )
        .unwrap();
        let phrases: Vec<&str> = table.entries().iter().map(|e| e.phrase.as_str()).collect();
        assert_eq!(phrases, vec!["a", "c"]);
    }

    #[test]
    fn strict_rejects_malformed_pairs() {
        let err = parse(
            r#"{"name": "T", "data": [["a", "A"], ["c", "C", "extra"]]}"#,
            LoadStrictness::Strict,
        )
        .unwrap_err();
        assert!(matches!(err, TableError::Malformed { .. }));
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = parse("{not json", LoadStrictness::Lenient).unwrap_err();
        assert!(matches!(err, TableError::Malformed { .. }));
        let err = parse("[1, 2]", LoadStrictness::Lenient).unwrap_err();
        assert!(matches!(err, TableError::Malformed { .. }));
    }

    #[test]
    fn missing_file_is_unreadable() {
        let err = PhraseTable::load("/definitely/not/here.json", LoadStrictness::Lenient).unwrap_err();
        assert!(matches!(err, TableError::Unreadable { .. }));
    }

    #[test]
    fn get_exact_finds_only_equal_phrases() {
        let table = PhraseTable::from_entries(
            "T",
            vec![
                PhraseEntry::new("ab", "AB"),
                PhraseEntry::new("a", "A"),
                PhraseEntry::new("abc", "ABC"),
            ],
        );
        assert_eq!(table.get_exact("ab"), &[PhraseEntry::new("ab", "AB")]);
        assert!(table.get_exact("zz").is_empty());
        assert!(table.get_exact("").is_empty());
    }

    #[test]
    fn prefix_range_is_contiguous_block() {
        let table = PhraseTable::from_entries(
            "T",
            vec![
                PhraseEntry::new("a", "A"),
                PhraseEntry::new("ab", "AB"),
                PhraseEntry::new("abc", "ABC"),
                PhraseEntry::new("b", "B"),
                PhraseEntry::new("ba", "BA"),
            ],
        );
        assert_eq!(table.prefix_range("a"), 0..3);
        assert_eq!(table.prefix_range("ab"), 1..3);
        assert_eq!(table.prefix_range("b"), 3..5);
        assert!(table.prefix_range("c").is_empty());
        assert!(table.prefix_range("abcd").is_empty());
    }

    #[test]
    fn table_file_roundtrips_through_loader() {
        let file = TableFile {
            name: "阿美語".to_string(),
            data: vec![("nga'ay".to_string(), "你好".to_string())],
        };
        let json = serde_json::to_string(&file).unwrap();
        let table = parse(&json, LoadStrictness::Strict).unwrap();
        assert_eq!(table.name(), "阿美語");
        assert_eq!(table.get_exact("nga'ay")[0].description, "你好");
    }
}
