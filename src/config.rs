//! Table construction settings.

use serde::{Deserialize, Serialize};

/// Initial sizing for a [`DynamicTable`](crate::DynamicTable).
///
/// Both counts become the initial capacities of the table; the logical shape of a
/// freshly built table is always `0 x 0`. Zero is accepted and clamped to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Initial row capacity.
    pub initial_rows: usize,

    /// Initial column capacity.
    pub initial_cols: usize,
}

impl TableConfig {
    /// Creates a config with the given initial row and column counts.
    pub fn new(initial_rows: usize, initial_cols: usize) -> Self {
        Self {
            initial_rows,
            initial_cols,
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_rows: 1,
            initial_cols: 1,
        }
    }
}
