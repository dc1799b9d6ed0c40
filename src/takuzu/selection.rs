//! Choice strategies: where to place the next speculative symbol.

use crate::takuzu::cell::Cell;
use crate::takuzu::grid::Grid;
use crate::takuzu::rules;

/// A hypothetical or committed placement: one cell, one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    /// Row of the targeted cell.
    pub row: usize,
    /// Column of the targeted cell.
    pub col: usize,
    /// The symbol to place there.
    pub cell: Cell,
}

/// Picks the next empty cell to try with the requested symbol.
///
/// Strategies are deterministic: the search owes its reproducibility to them,
/// and all randomness stays in the generator.
pub trait ChoiceStrategy {
    /// Returns the placement to try next, or `None` when the grid is full.
    fn choose(&self, grid: &Grid, cell: Cell) -> Option<Choice>;
}

/// The default strategy: the first empty cell in row-major order.
///
/// This fixed left-to-right, top-to-bottom scan is the search's tie-break.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ordered;

impl ChoiceStrategy for Ordered {
    fn choose(&self, grid: &Grid, cell: Cell) -> Option<Choice> {
        let n = grid.len();
        for row in 0..n {
            for col in 0..n {
                if grid.get(row, col) == Some(Cell::Empty) {
                    return Some(Choice { row, col, cell });
                }
            }
        }
        None
    }
}

/// Prefers the empty cell whose row and column carry the most filled cells,
/// with a row-major tie-break.
///
/// Branching where the grid is densest tends to fail fast, keeping the search
/// tree shallow on larger grids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MostConstrained;

impl ChoiceStrategy for MostConstrained {
    fn choose(&self, grid: &Grid, cell: Cell) -> Option<Choice> {
        let n = grid.len();

        let row_filled: Vec<usize> = (0..n)
            .map(|row| grid.row_cells(row).iter().filter(|c| c.is_filled()).count())
            .collect();
        let col_filled: Vec<usize> = (0..n)
            .map(|col| grid.col_cells(col).iter().filter(|c| c.is_filled()).count())
            .collect();

        let mut best: Option<(usize, Choice)> = None;
        for row in 0..n {
            for col in 0..n {
                if grid.get(row, col) != Some(Cell::Empty) {
                    continue;
                }
                let filled = row_filled[row] + col_filled[col];
                if best.is_none_or(|(most, _)| filled > most) {
                    best = Some((filled, Choice { row, col, cell }));
                }
            }
        }
        best.map(|(_, choice)| choice)
    }
}

/// The available strategy implementations, selectable from the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyImpls {
    /// Row-major scan for the first empty cell.
    Ordered(Ordered),
    /// Densest-line-first scan.
    MostConstrained(MostConstrained),
}

impl Default for StrategyImpls {
    fn default() -> Self {
        Self::Ordered(Ordered)
    }
}

impl ChoiceStrategy for StrategyImpls {
    fn choose(&self, grid: &Grid, cell: Cell) -> Option<Choice> {
        match self {
            Self::Ordered(strategy) => strategy.choose(grid, cell),
            Self::MostConstrained(strategy) => strategy.choose(grid, cell),
        }
    }
}

/// The search's one-step lookahead: would this placement keep the grid
/// consistent?
///
/// Works on a scratch copy; the live grid is untouched. A choice is only
/// committed after this check passes.
#[must_use]
pub fn validate_placement(grid: &Grid, row: usize, col: usize, cell: Cell) -> bool {
    let mut scratch = grid.clone();
    scratch.set(row, col, cell);
    rules::is_consistent(&scratch)
}
