//! # DynamicTable with Independent Row and Column Capacity
//!
//! This module implements a two-dimensional table of `i32` cells whose logical shape
//! (`rows x cols`) is tracked separately from its allocated extent
//! (`row_capacity x col_capacity`).
//!
//! Cells live in a single contiguous buffer indexed by `row * col_capacity + col`.
//! When an axis runs out of room its capacity doubles until the request fits. After
//! every change to the logical size of an axis, the axis is halved if it has fallen to
//! a quarter of its capacity or less. Both policies go through one reallocation routine
//! that keeps every cell inside the old logical bounds which still fits.
//!
//! ## Example
//!
//! ```rust
//! use dyntable::dynamic_table::DynamicTable;
//!
//! // Capacity 2 x 2, logical shape 0 x 0.
//! let mut table = DynamicTable::new(2, 2);
//! table.push_col();
//! for _ in 0..3 {
//!     table.push_row();
//! }
//! // The third row did not fit, so the row capacity doubled.
//! assert_eq!(table.row_capacity(), 4);
//!
//! table.set(2, 0, 42).unwrap();
//! table.insert_row_at(0).unwrap();
//! assert_eq!(table.get(3, 0), Ok(42));
//! assert!(table.get(4, 0).is_err());
//! ```

use std::fmt;

use serde::Serialize;

use crate::config::TableConfig;
use crate::counter::{InstrumentationSink, TableEvent};
use crate::error::{Axis, Result, TableError};

/// Value of every cell that has not been written by the caller.
pub const DEFAULT_VALUE: i32 = 0;

/// Logical size and capacity of a table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
    pub row_capacity: usize,
    pub col_capacity: usize,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rows={} cols={} row_cap={} col_cap={}",
            self.rows, self.cols, self.row_capacity, self.col_capacity
        )
    }
}

/// A growable table of `i32` cells.
///
/// The optional sink is borrowed for the lifetime `'s`; the table only reports to it
/// and never reads anything back.
pub struct DynamicTable<'s> {
    data: Vec<i32>,
    rows: usize,
    cols: usize,
    row_capacity: usize,
    col_capacity: usize,
    sink: Option<&'s dyn InstrumentationSink>,
}

impl<'s> DynamicTable<'s> {
    /// Creates an empty table whose capacities are `initial_rows` and `initial_cols`,
    /// each clamped to at least one.
    pub fn new(initial_rows: usize, initial_cols: usize) -> Self {
        Self::build(initial_rows, initial_cols, None)
    }

    /// Like [`new`](Self::new), reporting every operation to `sink`.
    pub fn with_sink(
        sink: &'s dyn InstrumentationSink,
        initial_rows: usize,
        initial_cols: usize,
    ) -> Self {
        Self::build(initial_rows, initial_cols, Some(sink))
    }

    /// Creates an empty table sized by `config`.
    pub fn from_config(config: &TableConfig, sink: Option<&'s dyn InstrumentationSink>) -> Self {
        Self::build(config.initial_rows, config.initial_cols, sink)
    }

    fn build(
        initial_rows: usize,
        initial_cols: usize,
        sink: Option<&'s dyn InstrumentationSink>,
    ) -> Self {
        let row_capacity = initial_rows.max(1);
        let col_capacity = initial_cols.max(1);
        let table = Self {
            data: vec![DEFAULT_VALUE; row_capacity * col_capacity],
            rows: 0,
            cols: 0,
            row_capacity,
            col_capacity,
            sink,
        };
        table.notify(TableEvent::ElementWrite, row_capacity * col_capacity);
        table
    }

    /// Returns the number of logical rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of logical columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the number of allocated rows.
    #[inline]
    pub fn row_capacity(&self) -> usize {
        self.row_capacity
    }

    /// Returns the number of allocated columns.
    #[inline]
    pub fn col_capacity(&self) -> usize {
        self.col_capacity
    }

    /// Returns `true` if the table has no logical cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Returns the logical size and capacity of both axes.
    pub fn shape(&self) -> Shape {
        Shape {
            rows: self.rows,
            cols: self.cols,
            row_capacity: self.row_capacity,
            col_capacity: self.col_capacity,
        }
    }

    /// Appends a default-valued row.
    ///
    /// The new row is written across the whole column capacity so that cells beyond
    /// the logical columns stay defined if columns are pushed later.
    pub fn push_row(&mut self) {
        self.ensure_row_capacity(self.rows + 1);
        let cc = self.col_capacity;
        let start = self.rows * cc;
        self.data[start..start + cc].fill(DEFAULT_VALUE);
        self.notify(TableEvent::ElementWrite, cc);
        self.rows += 1;
        self.notify(TableEvent::RowInsert, 1);
        self.shrink_rows_if_sparse();
    }

    /// Inserts a default-valued row at `idx`, shifting rows `idx..` down by one.
    ///
    /// `idx == rows()` behaves like [`push_row`](Self::push_row).
    pub fn insert_row_at(&mut self, idx: usize) -> Result<()> {
        if idx > self.rows {
            return Err(TableError::out_of_range("insert_row_at", Axis::Row, idx, self.rows));
        }
        self.ensure_row_capacity(self.rows + 1);
        let cc = self.col_capacity;
        self.data.copy_within(idx * cc..self.rows * cc, (idx + 1) * cc);
        self.notify(TableEvent::ElementAssign, (self.rows - idx) * cc);
        self.data[idx * cc..(idx + 1) * cc].fill(DEFAULT_VALUE);
        self.notify(TableEvent::ElementWrite, cc);
        self.rows += 1;
        self.notify(TableEvent::RowInsert, 1);
        self.shrink_rows_if_sparse();
        Ok(())
    }

    /// Removes the last row. Its cells become capacity slack.
    pub fn pop_row(&mut self) -> Result<()> {
        if self.rows == 0 {
            return Err(TableError::out_of_range("pop_row", Axis::Row, 0, 0));
        }
        self.notify(TableEvent::ElementDestroy, self.col_capacity);
        self.rows -= 1;
        self.notify(TableEvent::RowRemove, 1);
        self.shrink_rows_if_sparse();
        Ok(())
    }

    /// Removes the row at `idx`, shifting the rows after it up by one.
    pub fn remove_row_at(&mut self, idx: usize) -> Result<()> {
        if idx >= self.rows {
            return Err(TableError::out_of_range("remove_row_at", Axis::Row, idx, self.rows));
        }
        let cc = self.col_capacity;
        self.data.copy_within((idx + 1) * cc..self.rows * cc, idx * cc);
        self.notify(TableEvent::ElementAssign, (self.rows - 1 - idx) * cc);
        self.notify(TableEvent::ElementDestroy, cc);
        self.rows -= 1;
        self.notify(TableEvent::RowRemove, 1);
        self.shrink_rows_if_sparse();
        Ok(())
    }

    /// Appends a default-valued column across the whole row capacity.
    pub fn push_col(&mut self) {
        self.ensure_col_capacity(self.cols + 1);
        let cols = self.cols;
        for row in self.data.chunks_exact_mut(self.col_capacity) {
            row[cols] = DEFAULT_VALUE;
        }
        self.notify(TableEvent::ElementWrite, self.row_capacity);
        self.cols += 1;
        self.notify(TableEvent::ColInsert, 1);
        self.shrink_cols_if_sparse();
    }

    /// Inserts a default-valued column at `idx`, shifting columns `idx..` right by one.
    pub fn insert_col_at(&mut self, idx: usize) -> Result<()> {
        if idx > self.cols {
            return Err(TableError::out_of_range("insert_col_at", Axis::Column, idx, self.cols));
        }
        self.ensure_col_capacity(self.cols + 1);
        let cols = self.cols;
        for row in self.data.chunks_exact_mut(self.col_capacity) {
            row.copy_within(idx..cols, idx + 1);
            row[idx] = DEFAULT_VALUE;
        }
        self.notify(TableEvent::ElementAssign, self.row_capacity * (cols - idx));
        self.notify(TableEvent::ElementWrite, self.row_capacity);
        self.cols += 1;
        self.notify(TableEvent::ColInsert, 1);
        self.shrink_cols_if_sparse();
        Ok(())
    }

    /// Removes the last column.
    pub fn pop_col(&mut self) -> Result<()> {
        if self.cols == 0 {
            return Err(TableError::out_of_range("pop_col", Axis::Column, 0, 0));
        }
        self.notify(TableEvent::ElementDestroy, self.row_capacity);
        self.cols -= 1;
        self.notify(TableEvent::ColRemove, 1);
        self.shrink_cols_if_sparse();
        Ok(())
    }

    /// Removes the column at `idx`, shifting the columns after it left by one.
    pub fn remove_col_at(&mut self, idx: usize) -> Result<()> {
        if idx >= self.cols {
            return Err(TableError::out_of_range("remove_col_at", Axis::Column, idx, self.cols));
        }
        let cols = self.cols;
        for row in self.data.chunks_exact_mut(self.col_capacity) {
            row.copy_within(idx + 1..cols, idx);
        }
        self.notify(TableEvent::ElementAssign, self.row_capacity * (cols - 1 - idx));
        self.notify(TableEvent::ElementDestroy, self.row_capacity);
        self.cols -= 1;
        self.notify(TableEvent::ColRemove, 1);
        self.shrink_cols_if_sparse();
        Ok(())
    }

    /// Returns the value at `(r, c)`.
    pub fn get(&self, r: usize, c: usize) -> Result<i32> {
        let offset = self.cell_offset("get", r, c)?;
        Ok(self.data[offset])
    }

    /// Overwrites the value at `(r, c)`.
    pub fn set(&mut self, r: usize, c: usize, value: i32) -> Result<()> {
        let offset = self.cell_offset("set", r, c)?;
        self.data[offset] = value;
        self.notify(TableEvent::ElementWrite, 1);
        Ok(())
    }

    /// Returns the logical cells of row `r`.
    pub fn row(&self, r: usize) -> Result<&[i32]> {
        if r >= self.rows {
            return Err(TableError::out_of_range("row", Axis::Row, r, self.rows));
        }
        let start = r * self.col_capacity;
        Ok(&self.data[start..start + self.cols])
    }

    /// Resets the logical shape to `0 x 0`. Capacity is kept.
    pub fn clear(&mut self) {
        self.notify(TableEvent::ElementDestroy, self.rows * self.cols);
        self.notify(TableEvent::RowRemove, self.rows);
        self.notify(TableEvent::ColRemove, self.cols);
        self.rows = 0;
        self.cols = 0;
    }

    fn cell_offset(&self, op: &'static str, r: usize, c: usize) -> Result<usize> {
        if r >= self.rows {
            return Err(TableError::out_of_range(op, Axis::Row, r, self.rows));
        }
        if c >= self.cols {
            return Err(TableError::out_of_range(op, Axis::Column, c, self.cols));
        }
        Ok(r * self.col_capacity + c)
    }

    #[inline]
    fn notify(&self, event: TableEvent, count: usize) {
        if let Some(sink) = self.sink {
            if count > 0 {
                sink.record(event, count);
            }
        }
    }

    fn ensure_row_capacity(&mut self, needed: usize) {
        if needed > self.row_capacity {
            let new_row_capacity = grown_capacity(self.row_capacity, needed);
            self.reallocate(new_row_capacity, self.col_capacity);
        }
    }

    fn ensure_col_capacity(&mut self, needed: usize) {
        if needed > self.col_capacity {
            let new_col_capacity = grown_capacity(self.col_capacity, needed);
            self.reallocate(self.row_capacity, new_col_capacity);
        }
    }

    fn shrink_rows_if_sparse(&mut self) {
        if self.row_capacity > 1 && self.rows <= self.row_capacity / 4 {
            log::trace!("[table] {} rows in capacity {}, halving", self.rows, self.row_capacity);
            self.reallocate((self.row_capacity / 2).max(1), self.col_capacity);
        }
    }

    fn shrink_cols_if_sparse(&mut self) {
        if self.col_capacity > 1 && self.cols <= self.col_capacity / 4 {
            log::trace!("[table] {} cols in capacity {}, halving", self.cols, self.col_capacity);
            self.reallocate(self.row_capacity, (self.col_capacity / 2).max(1));
        }
    }

    /// Replaces the backing buffer with a default-filled one of the given capacities,
    /// copying the overlap of the old logical bounds and the new capacities.
    fn reallocate(&mut self, new_row_capacity: usize, new_col_capacity: usize) {
        let new_row_capacity = new_row_capacity.max(1);
        let new_col_capacity = new_col_capacity.max(1);
        log::debug!(
            "[table] reallocating {}x{} -> {}x{} (logical {}x{})",
            self.row_capacity,
            self.col_capacity,
            new_row_capacity,
            new_col_capacity,
            self.rows,
            self.cols
        );

        let mut data = vec![DEFAULT_VALUE; new_row_capacity * new_col_capacity];
        self.notify(TableEvent::ElementWrite, data.len());

        let kept_rows = self.rows.min(new_row_capacity);
        let kept_cols = self.cols.min(new_col_capacity);
        for r in 0..kept_rows {
            let src = r * self.col_capacity;
            let dst = r * new_col_capacity;
            data[dst..dst + kept_cols].copy_from_slice(&self.data[src..src + kept_cols]);
        }
        self.notify(TableEvent::ElementAssign, kept_rows * kept_cols);

        self.notify(TableEvent::RowResize, 1);
        self.notify(TableEvent::ColResize, 1);
        self.notify(TableEvent::RowCapacityChange, 1);
        self.notify(TableEvent::ColCapacityChange, 1);
        self.notify(TableEvent::ElementDestroy, self.data.len());

        self.data = data;
        self.row_capacity = new_row_capacity;
        self.col_capacity = new_col_capacity;
    }
}

/// Doubles `capacity` until it holds `needed` slots.
fn grown_capacity(capacity: usize, needed: usize) -> usize {
    let mut capacity = capacity.max(1);
    while capacity < needed {
        capacity *= 2;
    }
    capacity
}

impl Drop for DynamicTable<'_> {
    fn drop(&mut self) {
        self.notify(TableEvent::ElementDestroy, self.data.len());
    }
}

impl fmt::Debug for DynamicTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicTable")
            .field("shape", &self.shape())
            .field("instrumented", &self.sink.is_some())
            .finish()
    }
}
