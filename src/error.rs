//! Error types for table operations.

use std::fmt;

/// The table axis an index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Row,
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => f.write_str("row"),
            Axis::Column => f.write_str("column"),
        }
    }
}

/// Error type for table operations.
///
/// A rejected call never mutates the table and never notifies the sink.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// An index fell outside the valid interval of the operation.
    #[error("{op}: {axis} index {index} out of range for {axis} count {len}")]
    OutOfRange {
        op: &'static str,
        axis: Axis,
        index: usize,
        len: usize,
    },
}

impl TableError {
    /// Creates a new out-of-range error.
    pub fn out_of_range(op: &'static str, axis: Axis, index: usize, len: usize) -> Self {
        Self::OutOfRange {
            op,
            axis,
            index,
            len,
        }
    }
}

pub type Result<T> = std::result::Result<T, TableError>;
