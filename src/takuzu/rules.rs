//! The consistency checker.
//!
//! Stateless predicates over a grid snapshot, validating the three rule
//! families:
//!
//! 1. no two identical rows and no two identical columns, where "identical"
//!    requires every compared pair of cells to be equal *and* filled: two
//!    partially empty lines are never flagged, however much their filled
//!    cells agree;
//! 2. per row and per column, at most N/2 `Zero`s and at most N/2 `One`s
//!    (empties excluded, so this is a necessary condition on partial grids,
//!    not a sufficient one);
//! 3. no run of three or more equal, filled, adjacent symbols in any line.
//!
//! [`is_consistent`] is the sole admissibility oracle for the search: the
//! solver checks it before and after every propagation pass and the choice
//! layer checks it before every committed placement.

use crate::takuzu::cell::Cell;
use crate::takuzu::grid::{Grid, Line};
use itertools::Itertools;
use log::debug;
use rustc_hash::FxHashSet;

/// True iff the grid violates none of the three rule families.
///
/// Holds for partial grids; emptiness is not a violation.
#[must_use]
pub fn is_consistent(grid: &Grid) -> bool {
    distinct_lines(grid) && balanced_counts(grid) && no_long_runs(grid)
}

/// True iff the grid is consistent and every cell is filled: a solution.
#[must_use]
pub fn is_valid(grid: &Grid) -> bool {
    is_consistent(grid) && grid.is_full()
}

/// Rule family 1: pairwise-distinct rows and pairwise-distinct columns.
///
/// Only fully filled lines can collide, so partially empty lines are skipped
/// outright rather than compared cell by cell.
fn distinct_lines(grid: &Grid) -> bool {
    let n = grid.len();

    let mut seen: FxHashSet<Line> = FxHashSet::default();
    for row in 0..n {
        let line = grid.row_cells(row);
        if line.iter().any(|c| c.is_empty()) {
            continue;
        }
        if !seen.insert(line) {
            debug!("row {row} duplicates an earlier row");
            return false;
        }
    }

    seen.clear();
    for col in 0..n {
        let line = grid.col_cells(col);
        if line.iter().any(|c| c.is_empty()) {
            continue;
        }
        if !seen.insert(line) {
            debug!("column {col} duplicates an earlier column");
            return false;
        }
    }

    true
}

/// Rule family 2: no line carries more than N/2 of either symbol.
fn balanced_counts(grid: &Grid) -> bool {
    let n = grid.len();
    let half = grid.size().half();

    for index in 0..n {
        for line in [grid.row_cells(index), grid.col_cells(index)] {
            let zeros = line.iter().filter(|&&c| c == Cell::Zero).count();
            let ones = line.iter().filter(|&&c| c == Cell::One).count();
            if zeros > half || ones > half {
                debug!("line {index} is out of balance ({zeros} zeros, {ones} ones)");
                return false;
            }
        }
    }

    true
}

/// Rule family 3: no three equal filled symbols in a row, in any line.
fn no_long_runs(grid: &Grid) -> bool {
    let n = grid.len();

    for index in 0..n {
        for line in [grid.row_cells(index), grid.col_cells(index)] {
            if line_has_long_run(&line) {
                debug!("line {index} contains a run of three");
                return false;
            }
        }
    }

    true
}

fn line_has_long_run(line: &Line) -> bool {
    line.iter()
        .tuple_windows()
        .any(|(a, b, c)| a.is_filled() && a == b && b == c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::takuzu::cell::Size;
    use crate::takuzu::text::parse_grid;
    use std::io::Cursor;

    fn grid_of(text: &str) -> Grid {
        parse_grid(Cursor::new(text)).expect("test grid must parse")
    }

    #[test]
    fn test_empty_grid_is_consistent_but_not_valid() {
        let grid = Grid::new(Size::Four);
        assert!(is_consistent(&grid));
        assert!(!is_valid(&grid));
    }

    #[test]
    fn test_solved_grid_is_valid() {
        let grid = grid_of("0 0 1 1\n1 1 0 0\n0 1 0 1\n1 0 1 0\n");
        assert!(is_consistent(&grid));
        assert!(is_valid(&grid));
    }

    #[test]
    fn test_run_of_three_in_a_row_is_inconsistent() {
        let grid = grid_of("1 1 1 _\n_ _ _ _\n_ _ _ _\n_ _ _ _\n");
        assert!(!is_consistent(&grid));
    }

    #[test]
    fn test_run_of_three_in_a_column_is_inconsistent() {
        let mut grid = Grid::new(Size::Four);
        grid.set(0, 2, Cell::Zero);
        grid.set(1, 2, Cell::Zero);
        grid.set(2, 2, Cell::Zero);
        assert!(!is_consistent(&grid));
    }

    #[test]
    fn test_empty_gap_breaks_a_run() {
        let grid = grid_of("1 1 _ 1\n_ _ _ _\n_ _ _ _\n_ _ _ _\n");
        assert!(is_consistent(&grid));
    }

    #[test]
    fn test_unbalanced_row_is_inconsistent() {
        let grid = grid_of("0 0 _ 0\n_ _ _ _\n_ _ _ _\n_ _ _ _\n");
        assert!(!is_consistent(&grid));
    }

    #[test]
    fn test_unbalanced_column_is_inconsistent() {
        let mut grid = Grid::new(Size::Four);
        grid.set(0, 0, Cell::One);
        grid.set(1, 0, Cell::One);
        grid.set(3, 0, Cell::One);
        assert!(!is_consistent(&grid));
    }

    #[test]
    fn test_identical_full_rows_are_inconsistent() {
        let grid = grid_of("0 1 0 1\n0 1 0 1\n_ _ _ _\n_ _ _ _\n");
        assert!(!is_consistent(&grid));
    }

    #[test]
    fn test_identical_full_columns_are_inconsistent() {
        let grid = grid_of("0 0 _ _\n1 1 _ _\n0 0 _ _\n1 1 _ _\n");
        assert!(!is_consistent(&grid));
    }

    #[test]
    fn test_partially_empty_matching_rows_are_not_identical() {
        // Filled prefixes agree, but the empty tail means these rows are not
        // (yet) duplicates.
        let grid = grid_of("0 1 _ _\n0 1 _ _\n_ _ _ _\n_ _ _ _\n");
        assert!(is_consistent(&grid));
    }

    #[test]
    fn test_is_consistent_is_pure() {
        let grid = grid_of("0 0 _ _\n_ _ _ _\n_ _ _ _\n_ _ _ _\n");
        let first = is_consistent(&grid);
        let second = is_consistent(&grid);
        assert_eq!(first, second);
        assert!(first);
    }

    #[test]
    fn test_out_of_bounds_set_does_not_disturb_consistency() {
        let mut grid = grid_of("0 0 1 1\n1 1 0 0\n0 1 0 1\n1 0 1 0\n");
        assert!(is_consistent(&grid));
        grid.set(99, 0, Cell::One);
        assert!(is_consistent(&grid));
        assert!(is_valid(&grid));
    }
}
