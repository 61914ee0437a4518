//! Formosan table codes.
//!
//! Tables are stored as `TW_xx.json` under the data directory. The
//! configuration option `table` is an index into `TABLE_CODES`, which has no
//! entry for `TW_11`.

use libfox_core::{LoadStrictness, ScanConvention, TableCatalog};
use std::path::PathBuf;

/// Codes selectable through `FormosanConfig::table`, in option order.
pub const TABLE_CODES: [&str; 42] = [
    "TW_00", "TW_01", "TW_02", "TW_03", "TW_04", "TW_05", "TW_06", "TW_07", "TW_08", "TW_09",
    "TW_10", "TW_12", "TW_13", "TW_14", "TW_15", "TW_16", "TW_17", "TW_18", "TW_19", "TW_20",
    "TW_21", "TW_22", "TW_23", "TW_24", "TW_25", "TW_26", "TW_27", "TW_28", "TW_29", "TW_30",
    "TW_31", "TW_32", "TW_33", "TW_34", "TW_35", "TW_36", "TW_37", "TW_38", "TW_39", "TW_40",
    "TW_41", "TW_42",
];

/// Highest table number looked for on disk.
pub const MAX_TABLE_NUMBER: u32 = 43;

/// Table code for a configuration option index.
pub fn code_for_option(index: usize) -> Option<&'static str> {
    TABLE_CODES.get(index).copied()
}

/// Ids probed in the data directory, `TW_00` through `TW_43`.
pub fn table_ids() -> Vec<String> {
    (0..=MAX_TABLE_NUMBER).map(|n| format!("TW_{:02}", n)).collect()
}

/// A catalog over the `TW_xx` resources present in `data_dir`.
pub fn formosan_catalog<P: Into<PathBuf>>(data_dir: P, strictness: LoadStrictness) -> TableCatalog {
    TableCatalog::with_convention(data_dir, ScanConvention::FixedIds(table_ids()), strictness)
}
