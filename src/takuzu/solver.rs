//! The backtracking solver.
//!
//! The search interleaves deduction and guessing over a single working grid:
//!
//! 1. a grid that is already valid is a solution: emit a copy and succeed;
//! 2. an inconsistent grid fails its branch immediately, with no search;
//! 3. otherwise run the propagator to its fixed point and re-check both;
//! 4. snapshot the grid, then for `Zero` and `One` in that order: ask the
//!    choice strategy for a placement, keep it only if the one-step lookahead
//!    accepts it, commit it to the live grid and recurse. A success under
//!    [`Mode::FindFirst`] returns straight up the call chain; under
//!    [`Mode::FindAll`] the search restores the snapshot and keeps going.
//!    Failures always restore the snapshot before the next sibling branch;
//! 5. both symbols exhausted means the branch fails, an ordinary outcome
//!    rather than an error.
//!
//! Each recursion level fills at least one cell, so the depth is bounded by
//! the number of initially empty cells. Every frame's snapshot is a local
//! value, so restoration on exit is structural, not a paired alloc/free.

use crate::takuzu::cell::Cell;
use crate::takuzu::grid::Grid;
use crate::takuzu::heuristics;
use crate::takuzu::rules;
use crate::takuzu::selection::{validate_placement, ChoiceStrategy, StrategyImpls};
use log::debug;
use rustc_hash::FxHashSet;

/// Termination policy for a solve call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Stop at the first solution found anywhere in the search tree.
    #[default]
    FindFirst,
    /// Exhaust the tree and accumulate every distinct solution.
    FindAll,
}

/// The solutions found by one solve call, in order of discovery.
///
/// Grows without a preset capacity and drops duplicates on insert.
#[derive(Debug, Clone, Default)]
pub struct Solutions {
    grids: Vec<Grid>,
    seen: FxHashSet<Grid>,
}

impl Solutions {
    /// An empty solution set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, grid: Grid) {
        if self.seen.insert(grid.clone()) {
            self.grids.push(grid);
        }
    }

    /// Number of distinct solutions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.grids.len()
    }

    /// True when no solution was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    /// The first solution found, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Grid> {
        self.grids.first()
    }

    /// Iterates the solutions in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &Grid> {
        self.grids.iter()
    }
}

impl<'a> IntoIterator for &'a Solutions {
    type Item = &'a Grid;
    type IntoIter = std::slice::Iter<'a, Grid>;

    fn into_iter(self) -> Self::IntoIter {
        self.grids.iter()
    }
}

/// Counters accumulated over one solve call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Search nodes visited, including the root.
    pub nodes: usize,
    /// Committed speculative placements.
    pub decisions: usize,
    /// Cells filled by propagation rather than guessing.
    pub propagated: usize,
}

/// A backtracking solver with a fixed mode and choice strategy.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    mode: Mode,
    strategy: StrategyImpls,
    stats: SearchStats,
}

impl Solver {
    /// Creates a solver with the given mode and the default (ordered)
    /// strategy.
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Creates a solver with an explicit choice strategy.
    #[must_use]
    pub fn with_strategy(mode: Mode, strategy: StrategyImpls) -> Self {
        Self {
            mode,
            strategy,
            stats: SearchStats::default(),
        }
    }

    /// Solves the grid.
    ///
    /// Under [`Mode::FindFirst`] the first solution is copied back into
    /// `grid`, completing it in place; under [`Mode::FindAll`] the input grid
    /// is left exactly as passed and every distinct solution is returned.
    /// An empty result means no solution exists; callers report that rather
    /// than treating it as an error.
    pub fn solve(&mut self, grid: &mut Grid) -> Solutions {
        self.stats = SearchStats::default();
        let mut solutions = Solutions::new();

        let mut work = grid.clone();
        self.search(&mut work, &mut solutions);

        if self.mode == Mode::FindFirst {
            if let Some(first) = solutions.first() {
                grid.copy_from(first);
            }
        }

        debug!(
            "search finished: {} solution(s), {} node(s), {} decision(s)",
            solutions.len(),
            self.stats.nodes,
            self.stats.decisions
        );
        solutions
    }

    /// Counters from the most recent solve call.
    #[must_use]
    pub const fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Explores one branch. Returns whether it yielded at least one solution.
    fn search(&mut self, grid: &mut Grid, solutions: &mut Solutions) -> bool {
        self.stats.nodes += 1;

        if rules::is_valid(grid) {
            solutions.push(grid.clone());
            return true;
        }
        if !rules::is_consistent(grid) {
            return false;
        }

        let empties = grid.empty_count();
        if heuristics::saturate(grid).is_err() {
            return false;
        }
        self.stats.propagated += empties - grid.empty_count();

        if rules::is_valid(grid) {
            solutions.push(grid.clone());
            return true;
        }
        if !rules::is_consistent(grid) {
            return false;
        }

        let snapshot = grid.clone();
        let mut found = false;

        for cell in [Cell::Zero, Cell::One] {
            let Some(choice) = self.strategy.choose(grid, cell) else {
                continue;
            };
            if !validate_placement(grid, choice.row, choice.col, choice.cell) {
                continue;
            }

            grid.set(choice.row, choice.col, choice.cell);
            self.stats.decisions += 1;

            if self.search(grid, solutions) {
                if self.mode == Mode::FindFirst {
                    return true;
                }
                found = true;
            }
            grid.copy_from(&snapshot);
        }

        found
    }
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
    fn test_solving_a_valid_grid_is_a_no_op() {
        let mut grid = grid_of("0 0 1 1\n1 1 0 0\n0 1 0 1\n1 0 1 0\n");
        let original = grid.clone();

        let mut solver = Solver::new(Mode::FindFirst);
        let solutions = solver.solve(&mut grid);

        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions.first(), Some(&original));
        assert_eq!(grid, original);
        assert_eq!(solver.stats().decisions, 0);
    }

    #[test]
    fn test_inconsistent_grid_fails_without_searching() {
        let mut grid = grid_of("1 1 1 _\n_ _ _ _\n_ _ _ _\n_ _ _ _\n");

        let mut solver = Solver::new(Mode::FindFirst);
        let solutions = solver.solve(&mut grid);

        assert!(solutions.is_empty());
        assert_eq!(solver.stats().decisions, 0);
        assert_eq!(solver.stats().propagated, 0);
    }

    #[test]
    fn test_find_first_completes_the_grid_in_place() {
        let mut grid = grid_of("0 0 _ _\n1 1 _ _\n_ _ _ _\n_ _ _ _\n");

        let mut solver = Solver::new(Mode::FindFirst);
        let solutions = solver.solve(&mut grid);

        assert_eq!(solutions.len(), 1);
        assert!(rules::is_valid(&grid));
        assert_eq!(grid.get(0, 0), Some(Cell::Zero));
        assert_eq!(grid.get(1, 1), Some(Cell::One));
    }

    #[test]
    fn test_find_all_on_a_two_solution_puzzle() {
        let mut grid = grid_of("0 0 1 1\n1 1 0 0\n_ _ 0 1\n_ _ 1 0\n");
        let original = grid.clone();

        let mut solver = Solver::new(Mode::FindAll);
        let solutions = solver.solve(&mut grid);

        assert_eq!(solutions.len(), 2);
        for solution in &solutions {
            assert!(rules::is_valid(solution));
        }
        let pair: Vec<&Grid> = solutions.iter().collect();
        assert_ne!(pair[0], pair[1]);
        // FindAll leaves the caller's grid untouched.
        assert_eq!(grid, original);
    }

    #[test]
    fn test_find_all_on_an_unsolvable_grid() {
        // Row 2 is forced by balance to duplicate row 0, so no completion
        // exists even though the partial grid is consistent.
        let mut grid = grid_of("0 0 1 1\n_ _ _ _\n0 0 1 _\n_ _ _ _\n");
        assert!(rules::is_consistent(&grid));

        let mut solver = Solver::new(Mode::FindAll);
        let solutions = solver.solve(&mut grid);
        assert!(solutions.is_empty());
    }

    #[test]
    fn test_failed_siblings_see_an_identical_grid() {
        // Exercised through the private search: after exploring both symbols
        // under FindAll, every branch restored the working grid, so it ends
        // exactly where it started.
        let grid = grid_of("0 0 1 1\n1 1 0 0\n_ _ 0 1\n_ _ 1 0\n");
        let mut work = grid.clone();
        let mut solutions = Solutions::new();

        let mut solver = Solver::with_strategy(Mode::FindAll, StrategyImpls::default());
        assert!(solver.search(&mut work, &mut solutions));
        assert_eq!(work, grid);
    }

    #[test]
    fn test_empty_four_grid_has_solutions_under_both_strategies() {
        for strategy in [
            StrategyImpls::Ordered(crate::takuzu::selection::Ordered),
            StrategyImpls::MostConstrained(crate::takuzu::selection::MostConstrained),
        ] {
            let mut grid = Grid::new(Size::Four);
            let mut solver = Solver::with_strategy(Mode::FindFirst, strategy);
            let solutions = solver.solve(&mut grid);
            assert_eq!(solutions.len(), 1);
            assert!(rules::is_valid(&grid));
        }
    }

    #[test]
    fn test_solutions_deduplicate() {
        let mut solutions = Solutions::new();
        let grid = grid_of("0 0 1 1\n1 1 0 0\n0 1 0 1\n1 0 1 0\n");
        solutions.push(grid.clone());
        solutions.push(grid);
        assert_eq!(solutions.len(), 1);
    }
}
