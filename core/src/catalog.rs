//! Discovery and selection of phrase tables under a storage root.
//!
//! The catalog scans its root once, keeps a list of `TableDescriptor`s and
//! owns exactly one active `PhraseTable`. Before any successful selection the
//! active table is the empty table, so callers never see an absent table.

use crate::table::{LoadStrictness, PhraseTable, TableFile};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Metadata used to list and select a table without loading it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    /// Stable identifier, the resource's file stem (e.g. `TW_00`)
    pub id: String,
    /// The resource's `name` field, or the id when unavailable
    pub display_name: String,
    /// Where the resource lives
    pub location: PathBuf,
}

impl TableDescriptor {
    fn from_path(path: PathBuf) -> Option<Self> {
        let id = path.file_stem()?.to_str()?.to_string();
        let display_name = TableFile::peek_name(&path).unwrap_or_else(|| id.clone());
        Some(Self {
            id,
            display_name,
            location: path,
        })
    }
}

/// Identifies a table either by position in the catalog or by id/name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSelector {
    Index(usize),
    Id(String),
}

impl From<usize> for TableSelector {
    fn from(index: usize) -> Self {
        TableSelector::Index(index)
    }
}

impl From<&str> for TableSelector {
    fn from(id: &str) -> Self {
        TableSelector::Id(id.to_string())
    }
}

impl From<String> for TableSelector {
    fn from(id: String) -> Self {
        TableSelector::Id(id)
    }
}

/// How a storage root is enumerated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScanConvention {
    /// Every `*.json` file directly under the root, ordered by file name.
    #[default]
    Directory,
    /// `<root>/<id>.json` for each id, in order, when the file exists.
    FixedIds(Vec<String>),
}

/// Enumerate every `*.json` table resource directly under `root`.
///
/// A missing or unreadable root yields an empty list.
pub fn scan_directory<P: AsRef<Path>>(root: P) -> Vec<TableDescriptor> {
    let root = root.as_ref();
    let dir = match fs::read_dir(root) {
        Ok(dir) => dir,
        Err(e) => {
            warn!(root = %root.display(), error = %e, "table root is not readable");
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = dir
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let tables: Vec<TableDescriptor> = paths
        .into_iter()
        .filter_map(TableDescriptor::from_path)
        .collect();
    info!(root = %root.display(), count = tables.len(), "scanned table directory");
    tables
}

/// Enumerate `<root>/<id>.json` for each of `ids` that exists.
pub fn scan_ids<P: AsRef<Path>, S: AsRef<str>>(root: P, ids: &[S]) -> Vec<TableDescriptor> {
    let root = root.as_ref();
    if !root.is_dir() {
        warn!(root = %root.display(), "table root does not exist or is not a directory");
        return Vec::new();
    }

    let tables: Vec<TableDescriptor> = ids
        .iter()
        .map(|id| root.join(format!("{}.json", id.as_ref())))
        .filter(|path| path.is_file())
        .filter_map(TableDescriptor::from_path)
        .collect();
    info!(root = %root.display(), count = tables.len(), "scanned table ids");
    tables
}

/// The set of discovered tables plus the single active one.
#[derive(Debug, Clone)]
pub struct TableCatalog {
    root: PathBuf,
    convention: ScanConvention,
    strictness: LoadStrictness,
    tables: Vec<TableDescriptor>,
    active: Arc<PhraseTable>,
    active_index: Option<usize>,
}

impl TableCatalog {
    /// Scan `root` with the directory convention.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self::with_convention(root, ScanConvention::Directory, LoadStrictness::default())
    }

    /// Scan `root` with an explicit convention and load strictness.
    pub fn with_convention<P: Into<PathBuf>>(
        root: P,
        convention: ScanConvention,
        strictness: LoadStrictness,
    ) -> Self {
        let root = root.into();
        let tables = Self::scan(&root, &convention);
        Self {
            root,
            convention,
            strictness,
            tables,
            active: Arc::new(PhraseTable::empty()),
            active_index: None,
        }
    }

    /// A catalog with no storage behind it, holding only the given table.
    ///
    /// Useful for embedding a table built in memory.
    pub fn from_table(table: PhraseTable) -> Self {
        Self {
            root: PathBuf::new(),
            convention: ScanConvention::Directory,
            strictness: LoadStrictness::default(),
            tables: Vec::new(),
            active: Arc::new(table),
            active_index: None,
        }
    }

    fn scan(root: &Path, convention: &ScanConvention) -> Vec<TableDescriptor> {
        match convention {
            ScanConvention::Directory => scan_directory(root),
            ScanConvention::FixedIds(ids) => scan_ids(root, ids),
        }
    }

    /// Re-enumerate the storage root. The active table is kept.
    pub fn rescan(&mut self) {
        let active_location = self.active_descriptor().map(|d| d.location.clone());
        self.tables = Self::scan(&self.root, &self.convention);
        self.active_index = active_location
            .and_then(|loc| self.tables.iter().position(|d| d.location == loc));
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn strictness(&self) -> LoadStrictness {
        self.strictness
    }

    pub fn set_strictness(&mut self, strictness: LoadStrictness) {
        self.strictness = strictness;
    }

    /// All discovered tables, in scan order.
    pub fn tables(&self) -> &[TableDescriptor] {
        &self.tables
    }

    /// The active table; the empty table until a selection succeeds.
    pub fn active_table(&self) -> &Arc<PhraseTable> {
        &self.active
    }

    /// Descriptor of the active table, if it came from this catalog.
    pub fn active_descriptor(&self) -> Option<&TableDescriptor> {
        self.active_index.and_then(|i| self.tables.get(i))
    }

    /// Resolve a selector to a position in `tables()`.
    pub fn position(&self, selector: &TableSelector) -> Option<usize> {
        match selector {
            TableSelector::Index(i) => (*i < self.tables.len()).then_some(*i),
            TableSelector::Id(id) => self
                .tables
                .iter()
                .position(|d| d.id == *id)
                .or_else(|| self.tables.iter().position(|d| d.display_name == *id)),
        }
    }

    /// Load and activate a table.
    ///
    /// Returns false, leaving the active table untouched, when the selector
    /// matches nothing or the resource fails to load.
    pub fn select_table<S: Into<TableSelector>>(&mut self, selector: S) -> bool {
        let selector = selector.into();
        let Some(index) = self.position(&selector) else {
            warn!(?selector, "no such table");
            return false;
        };

        let descriptor = &self.tables[index];
        debug!(id = %descriptor.id, path = %descriptor.location.display(), "loading table");
        match PhraseTable::load(&descriptor.location, self.strictness) {
            Ok(table) => {
                info!(id = %descriptor.id, name = %descriptor.display_name, "switched active table");
                self.active = Arc::new(table);
                self.active_index = Some(index);
                true
            }
            Err(e) => {
                warn!(id = %descriptor.id, error = %e, "failed to load table, keeping previous");
                false
            }
        }
    }
}
