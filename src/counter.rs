//! # Operation counting
//!
//! A [`DynamicTable`](crate::DynamicTable) can report what it does to an
//! [`InstrumentationSink`]. The sink only observes: a table behaves identically with
//! or without one. [`OperationCounter`] is the stock sink; it tallies every event
//! category and renders a plain-text report.

use std::cell::Cell;
use std::fmt;

use serde::Serialize;

/// Categories of work performed by a table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TableEvent {
    RowInsert,
    RowRemove,
    ColInsert,
    ColRemove,
    /// A cell was written with a fresh or caller-supplied value.
    ElementWrite,
    /// A cell was copied from another cell (shifts and reallocations).
    ElementAssign,
    /// A cell left the table, logically or because its storage was released.
    ElementDestroy,
    RowResize,
    ColResize,
    RowCapacityChange,
    ColCapacityChange,
}

impl TableEvent {
    /// Every category, in report order.
    pub const ALL: [TableEvent; 11] = [
        TableEvent::RowInsert,
        TableEvent::RowRemove,
        TableEvent::ColInsert,
        TableEvent::ColRemove,
        TableEvent::ElementWrite,
        TableEvent::ElementAssign,
        TableEvent::ElementDestroy,
        TableEvent::RowResize,
        TableEvent::ColResize,
        TableEvent::RowCapacityChange,
        TableEvent::ColCapacityChange,
    ];

    #[inline]
    fn slot(self) -> usize {
        self as usize
    }
}

/// Receiver of table notifications.
///
/// Calls are synchronous and must not touch the table that issued them.
pub trait InstrumentationSink {
    /// Records `count` occurrences of `event`.
    fn record(&self, event: TableEvent, count: usize);
}

/// A sink that counts events per category.
///
/// Counters live in [`Cell`]s so the counter can be shared by reference with a table
/// and still be read while the table is alive.
#[derive(Debug, Default)]
pub struct OperationCounter {
    counts: [Cell<usize>; 11],
}

impl OperationCounter {
    /// Creates a counter with every category at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Zeroes every category.
    pub fn reset(&self) {
        for slot in &self.counts {
            slot.set(0);
        }
    }

    /// Returns the tally for one category.
    #[inline]
    pub fn count(&self, event: TableEvent) -> usize {
        self.counts[event.slot()].get()
    }

    /// Copies the current tallies into a plain struct.
    pub fn snapshot(&self) -> OperationCounts {
        OperationCounts {
            row_inserts: self.count(TableEvent::RowInsert),
            row_removes: self.count(TableEvent::RowRemove),
            col_inserts: self.count(TableEvent::ColInsert),
            col_removes: self.count(TableEvent::ColRemove),
            element_writes: self.count(TableEvent::ElementWrite),
            element_assignments: self.count(TableEvent::ElementAssign),
            element_destroys: self.count(TableEvent::ElementDestroy),
            row_resizes: self.count(TableEvent::RowResize),
            col_resizes: self.count(TableEvent::ColResize),
            row_capacity_changes: self.count(TableEvent::RowCapacityChange),
            col_capacity_changes: self.count(TableEvent::ColCapacityChange),
        }
    }

    /// See [`OperationCounts::total_cost_estimate`].
    pub fn total_cost_estimate(&self) -> usize {
        self.snapshot().total_cost_estimate()
    }

    /// Renders a titled, human-readable report of the current tallies.
    pub fn report(&self, title: &str) -> String {
        format!("Report: {}\n{}", title, self.snapshot())
    }
}

impl InstrumentationSink for OperationCounter {
    #[inline]
    fn record(&self, event: TableEvent, count: usize) {
        let slot = &self.counts[event.slot()];
        slot.set(slot.get().saturating_add(count));
    }
}

/// A point-in-time copy of an [`OperationCounter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OperationCounts {
    pub row_inserts: usize,
    pub row_removes: usize,
    pub col_inserts: usize,
    pub col_removes: usize,
    pub element_writes: usize,
    pub element_assignments: usize,
    pub element_destroys: usize,
    pub row_resizes: usize,
    pub col_resizes: usize,
    pub row_capacity_changes: usize,
    pub col_capacity_changes: usize,
}

impl OperationCounts {
    /// Sums every category except the capacity-change counters, which duplicate the
    /// resize counters.
    pub fn total_cost_estimate(&self) -> usize {
        self.row_inserts
            + self.row_removes
            + self.col_inserts
            + self.col_removes
            + self.element_writes
            + self.element_assignments
            + self.element_destroys
            + self.row_resizes
            + self.col_resizes
    }
}

impl fmt::Display for OperationCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Row inserts:             {}", self.row_inserts)?;
        writeln!(f, "Row removes:             {}", self.row_removes)?;
        writeln!(f, "Column inserts:          {}", self.col_inserts)?;
        writeln!(f, "Column removes:          {}", self.col_removes)?;
        writeln!(f, "Element writes:          {}", self.element_writes)?;
        writeln!(
            f,
            "Element assignments:     {} (copies during shifts and reallocation)",
            self.element_assignments
        )?;
        writeln!(f, "Element destroys:        {}", self.element_destroys)?;
        writeln!(f, "Row resizes:             {}", self.row_resizes)?;
        writeln!(f, "Column resizes:          {}", self.col_resizes)?;
        writeln!(f, "Row capacity changes:    {}", self.row_capacity_changes)?;
        writeln!(f, "Column capacity changes: {}", self.col_capacity_changes)?;
        writeln!(f, "Total:                   {}", self.total_cost_estimate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_reset() {
        let counter = OperationCounter::new();
        counter.record(TableEvent::ElementWrite, 4);
        counter.record(TableEvent::ElementWrite, 2);
        counter.record(TableEvent::RowInsert, 1);
        assert_eq!(counter.count(TableEvent::ElementWrite), 6);
        assert_eq!(counter.count(TableEvent::RowInsert), 1);
        assert_eq!(counter.count(TableEvent::ColInsert), 0);

        counter.reset();
        for event in TableEvent::ALL {
            assert_eq!(counter.count(event), 0);
        }
    }

    /// Capacity changes are reported but left out of the cost estimate.
    #[test]
    fn test_total_cost_excludes_capacity_changes() {
        let counter = OperationCounter::new();
        for event in TableEvent::ALL {
            counter.record(event, 1);
        }
        assert_eq!(counter.total_cost_estimate(), 9);
    }

    #[test]
    fn test_report_lists_title_and_total() {
        let counter = OperationCounter::new();
        counter.record(TableEvent::ColRemove, 3);
        let report = counter.report("COL_ONLY N=3");
        assert!(report.starts_with("Report: COL_ONLY N=3\n"));
        assert!(report.contains("Column removes:          3"));
        assert!(report.contains("Total:                   3"));
    }

    #[test]
    fn test_snapshot_serializes() {
        let counter = OperationCounter::new();
        counter.record(TableEvent::RowResize, 2);
        let json = serde_json::to_value(counter.snapshot()).unwrap();
        assert_eq!(json["row_resizes"], 2);
        assert_eq!(json["col_resizes"], 0);
    }
}
