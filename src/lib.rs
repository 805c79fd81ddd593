//! # dyntable
//!
//! This crate provides a growable two-dimensional integer table whose row and column
//! capacities are managed independently of its logical shape. Rows and columns can be
//! pushed, popped, inserted or removed at arbitrary positions. Capacity doubles when an
//! axis runs out of room and halves once the axis falls to a quarter of its capacity,
//! so appends cost O(1) amortized per touched cell.
//!
//! Every mutation can optionally be reported to an [`InstrumentationSink`], such as the
//! bundled [`OperationCounter`], without affecting the table's contents.

pub mod config;
pub mod counter;
pub mod dynamic_table;
pub mod error;

pub use config::TableConfig;
pub use counter::{InstrumentationSink, OperationCounter, OperationCounts, TableEvent};
pub use dynamic_table::{DynamicTable, Shape, DEFAULT_VALUE};
pub use error::{Axis, Result, TableError};
