use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use dyntable::{DynamicTable, OperationCounter, TableConfig, TableError, TableEvent};

fn assert_invariants(table: &DynamicTable<'_>) {
    assert!(table.rows() <= table.row_capacity());
    assert!(table.cols() <= table.col_capacity());
    assert!(table.row_capacity() >= 1);
    assert!(table.col_capacity() >= 1);
}

/// Compares every logical cell against a row-major model.
fn assert_matches(table: &DynamicTable<'_>, model: &[Vec<i32>], cols: usize) {
    assert_eq!(table.rows(), model.len());
    assert_eq!(table.cols(), cols);
    for (r, row) in model.iter().enumerate() {
        assert_eq!(table.row(r).unwrap(), row.as_slice());
    }
}

#[test]
fn integration_random_ops_match_model() {
    let mut rng = StdRng::seed_from_u64(12345);
    let mut table = DynamicTable::new(2, 2);
    let mut model: Vec<Vec<i32>> = Vec::new();
    let mut cols = 0usize;

    for step in 0..5000 {
        match rng.random_range(0..10) {
            0 => {
                table.push_row();
                model.push(vec![0; cols]);
            }
            1 => {
                let idx = rng.random_range(0..model.len() + 1);
                table.insert_row_at(idx).unwrap();
                model.insert(idx, vec![0; cols]);
            }
            2 => {
                if model.is_empty() {
                    assert!(table.pop_row().is_err());
                } else {
                    table.pop_row().unwrap();
                    model.pop();
                }
            }
            3 if !model.is_empty() => {
                let idx = rng.random_range(0..model.len());
                table.remove_row_at(idx).unwrap();
                model.remove(idx);
            }
            4 => {
                table.push_col();
                model.iter_mut().for_each(|row| row.push(0));
                cols += 1;
            }
            5 => {
                let idx = rng.random_range(0..cols + 1);
                table.insert_col_at(idx).unwrap();
                model.iter_mut().for_each(|row| row.insert(idx, 0));
                cols += 1;
            }
            6 => {
                if cols == 0 {
                    assert!(table.pop_col().is_err());
                } else {
                    table.pop_col().unwrap();
                    model.iter_mut().for_each(|row| {
                        row.pop();
                    });
                    cols -= 1;
                }
            }
            7 if cols > 0 => {
                let idx = rng.random_range(0..cols);
                table.remove_col_at(idx).unwrap();
                model.iter_mut().for_each(|row| {
                    row.remove(idx);
                });
                cols -= 1;
            }
            _ if !model.is_empty() && cols > 0 => {
                let r = rng.random_range(0..model.len());
                let c = rng.random_range(0..cols);
                let value = step as i32 + 1;
                table.set(r, c, value).unwrap();
                model[r][c] = value;
                assert_eq!(table.get(r, c), Ok(value));
            }
            _ => {}
        }
        assert_invariants(&table);
        assert_matches(&table, &model, cols);
    }
}

#[test]
fn integration_grow_shrink_cycles() {
    let mut table = DynamicTable::new(2, 2);
    for _ in 0..5 {
        for _ in 0..512 {
            table.push_row();
            assert_invariants(&table);
        }
        assert_eq!(table.row_capacity(), 512);
        for _ in 0..512 {
            table.pop_row().unwrap();
            assert_invariants(&table);
        }
        assert_eq!((table.rows(), table.row_capacity()), (0, 1));
    }
}

#[test]
fn integration_capacity_survives_clear() {
    let mut table = DynamicTable::from_config(&TableConfig::new(2, 2), None);
    for _ in 0..50 {
        table.push_row();
        table.push_col();
    }
    let (rc, cc) = (table.row_capacity(), table.col_capacity());
    assert_eq!((rc, cc), (64, 64));

    table.clear();
    assert_eq!(table.shape().rows, 0);
    assert_eq!(table.shape().cols, 0);
    assert_eq!((table.row_capacity(), table.col_capacity()), (rc, cc));
    assert!(matches!(
        table.get(0, 0),
        Err(TableError::OutOfRange { op: "get", .. })
    ));
}

#[test]
fn integration_counter_reports_row_only_sequence() {
    let counter = OperationCounter::new();
    {
        let mut table = DynamicTable::with_sink(&counter, 2, 2);
        for i in 0..100 {
            table.push_row();
            for c in 0..table.cols() {
                table.set(table.rows() - 1, c, i).unwrap();
            }
        }
    }
    assert_eq!(counter.count(TableEvent::RowInsert), 100);
    // Capacity 2 doubles six times to reach 128.
    assert_eq!(counter.count(TableEvent::RowCapacityChange), 6);
    assert_eq!(counter.count(TableEvent::ColInsert), 0);

    let report = counter.report("ROW_ONLY N=100");
    assert!(report.contains("Row inserts:             100"));

    counter.reset();
    assert_eq!(counter.total_cost_estimate(), 0);
}
