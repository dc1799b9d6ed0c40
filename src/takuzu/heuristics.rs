//! The heuristic propagator.
//!
//! Seven deduction rules, each a total pass over the grid that fills zero or
//! more empty cells and reports whether it changed anything:
//!
//! 1. a row that already holds N/2 `Zero`s gets its empties filled with `One`;
//! 2. the column analogue;
//! 3. a row that already holds N/2 `One`s gets its empties filled with `Zero`;
//! 4. the column analogue;
//! 5. every adjacent equal pair in a row forces the opposite symbol into the
//!    empty cells bordering the pair, preventing a run of three;
//! 6. the column analogue;
//! 7. an empty cell sandwiched between two equal filled neighbours, either
//!    horizontally or vertically, is forced to the opposite symbol.
//!
//! [`saturate`] applies the rules in that fixed order, once each per pass,
//! and repeats passes until a full pass changes nothing. Every fill is
//! logically forced, so propagation is sound; it is not complete, since
//! solvable grids can reach the fixed point with empties remaining. That gap
//! is what the backtracking search is for.

use crate::takuzu::cell::Cell;
use crate::takuzu::grid::Grid;
use crate::takuzu::rules;
use log::debug;
use std::error::Error;
use std::fmt;

/// Error returned when propagation is asked to run on an inconsistent grid.
///
/// An inconsistent grid has no solutions, so there is nothing sound to
/// deduce; the caller is expected to treat the branch as failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InconsistentGrid;

impl fmt::Display for InconsistentGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "grid is inconsistent; nothing to deduce")
    }
}

impl Error for InconsistentGrid {}

/// Runs all deduction rules to a fixed point.
///
/// Returns `Ok(true)` if any cell was filled, `Ok(false)` if the grid was
/// already at its fixed point, and `Err(InconsistentGrid)` when the input is
/// inconsistent, in which case the grid is untouched.
///
/// # Errors
///
/// [`InconsistentGrid`] when [`rules::is_consistent`] rejects the input.
pub fn saturate(grid: &mut Grid) -> Result<bool, InconsistentGrid> {
    if !rules::is_consistent(grid) {
        return Err(InconsistentGrid);
    }

    let mut changed_any = false;
    loop {
        let mut changed = false;
        changed |= balance_rows(grid, Cell::Zero);
        changed |= balance_cols(grid, Cell::Zero);
        changed |= balance_rows(grid, Cell::One);
        changed |= balance_cols(grid, Cell::One);
        changed |= complete_runs_rows(grid);
        changed |= complete_runs_cols(grid);
        changed |= fill_sandwiches(grid);

        if !changed {
            break;
        }
        changed_any = true;
        debug!("propagation pass filled cells, {} empties left", grid.empty_count());
    }

    Ok(changed_any)
}

/// Rules 1 and 3: fill row empties once `counted` has reached its quota.
fn balance_rows(grid: &mut Grid, counted: Cell) -> bool {
    let n = grid.len();
    let half = grid.size().half();
    let mut changed = false;

    for row in 0..n {
        let count = (0..n)
            .filter(|&col| grid.get(row, col) == Some(counted))
            .count();
        if count != half {
            continue;
        }
        for col in 0..n {
            if grid.get(row, col) == Some(Cell::Empty) {
                grid.set(row, col, counted.opposite());
                changed = true;
            }
        }
    }

    changed
}

/// Rules 2 and 4: the column analogue of [`balance_rows`].
fn balance_cols(grid: &mut Grid, counted: Cell) -> bool {
    let n = grid.len();
    let half = grid.size().half();
    let mut changed = false;

    for col in 0..n {
        let count = (0..n)
            .filter(|&row| grid.get(row, col) == Some(counted))
            .count();
        if count != half {
            continue;
        }
        for row in 0..n {
            if grid.get(row, col) == Some(Cell::Empty) {
                grid.set(row, col, counted.opposite());
                changed = true;
            }
        }
    }

    changed
}

/// Rule 5: each horizontal pair of equal symbols caps its run on both sides.
fn complete_runs_rows(grid: &mut Grid) -> bool {
    let n = grid.len();
    let mut changed = false;

    for row in 0..n {
        for col in 0..n - 1 {
            let Some(cell) = grid.get(row, col) else { continue };
            if cell.is_empty() || grid.get(row, col + 1) != Some(cell) {
                continue;
            }
            if col + 2 < n && grid.get(row, col + 2) == Some(Cell::Empty) {
                grid.set(row, col + 2, cell.opposite());
                changed = true;
            }
            if col >= 1 && grid.get(row, col - 1) == Some(Cell::Empty) {
                grid.set(row, col - 1, cell.opposite());
                changed = true;
            }
        }
    }

    changed
}

/// Rule 6: the column analogue of [`complete_runs_rows`].
fn complete_runs_cols(grid: &mut Grid) -> bool {
    let n = grid.len();
    let mut changed = false;

    for col in 0..n {
        for row in 0..n - 1 {
            let Some(cell) = grid.get(row, col) else { continue };
            if cell.is_empty() || grid.get(row + 1, col) != Some(cell) {
                continue;
            }
            if row + 2 < n && grid.get(row + 2, col) == Some(Cell::Empty) {
                grid.set(row + 2, col, cell.opposite());
                changed = true;
            }
            if row >= 1 && grid.get(row - 1, col) == Some(Cell::Empty) {
                grid.set(row - 1, col, cell.opposite());
                changed = true;
            }
        }
    }

    changed
}

/// Rule 7: fill the middle of `0 _ 0` and `1 _ 1` patterns, both ways round.
fn fill_sandwiches(grid: &mut Grid) -> bool {
    let n = grid.len();
    let mut changed = false;

    for row in 0..n {
        for col in 0..n {
            if grid.get(row, col) != Some(Cell::Empty) {
                continue;
            }
            if col >= 1 && col + 1 < n {
                let left = grid.get(row, col - 1).unwrap_or(Cell::Empty);
                if left.is_filled() && grid.get(row, col + 1) == Some(left) {
                    grid.set(row, col, left.opposite());
                    changed = true;
                    continue;
                }
            }
            if row >= 1 && row + 1 < n {
                let above = grid.get(row - 1, col).unwrap_or(Cell::Empty);
                if above.is_filled() && grid.get(row + 1, col) == Some(above) {
                    grid.set(row, col, above.opposite());
                    changed = true;
                }
            }
        }
    }

    changed
}
