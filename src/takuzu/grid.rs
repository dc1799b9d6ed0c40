//! The grid store.
//!
//! A [`Grid`] owns a square buffer of [`Cell`]s in row-major order. Its side
//! length is fixed at construction to one of the supported [`Size`]s and every
//! access is bounds-checked: reads outside the grid return `None`, writes
//! outside the grid (or writes of anything other than a filled symbol) are
//! logged and dropped. Data-level misuse is never fatal here; the only panics
//! are contract violations such as copying between grids of different sizes.

use crate::takuzu::cell::{Cell, Size};
use itertools::Itertools;
use log::warn;
use smallvec::SmallVec;
use std::fmt;

/// A row or column extracted from the grid.
///
/// Lines are at most 64 cells and usually 8, so they live on the stack.
pub type Line = SmallVec<[Cell; 8]>;

/// A square takuzu grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: Size,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid of the given size with every cell empty.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size.cell_count()],
        }
    }

    /// The grid's size.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// The side length as a plain count.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size as usize
    }

    /// True if the grid has no cells. Never the case for a valid size, but
    /// conventional alongside `len`.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size.cell_count() == 0
    }

    /// The whole buffer in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Reads the cell at `(row, col)`, or `None` when the coordinates fall
    /// outside the grid. An out-of-bounds read is an expected, recoverable
    /// condition: it is logged and reported, never escalated.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        let n = self.len();
        if row >= n || col >= n {
            warn!("cell read out of bounds at ({row}, {col}) on a {} grid", self.size);
            return None;
        }
        Some(self.cells[row * n + col])
    }

    /// Writes a filled symbol at `(row, col)`.
    ///
    /// Out-of-bounds coordinates and attempts to write `Empty` are dropped
    /// with a warning: cells are only ever cleared wholesale, by restoring a
    /// snapshot through [`Grid::copy_from`].
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        let n = self.len();
        if row >= n || col >= n {
            warn!("cell write out of bounds at ({row}, {col}) on a {} grid", self.size);
            return;
        }
        if cell.is_empty() {
            warn!("refusing to write Empty at ({row}, {col}); only 0 and 1 may be placed");
            return;
        }
        self.cells[row * n + col] = cell;
    }

    /// Overwrites this grid's cells with `src`'s.
    ///
    /// # Panics
    ///
    /// If the sizes differ. Snapshot and live grid always come from the same
    /// solve, so a mismatch is a programmer error.
    pub fn copy_from(&mut self, src: &Self) {
        assert_eq!(
            self.size, src.size,
            "cannot copy between grids of different sizes"
        );
        self.cells.copy_from_slice(&src.cells);
    }

    /// Extracts row `row` as an owned line.
    ///
    /// # Panics
    ///
    /// If `row` is out of bounds.
    #[must_use]
    pub fn row_cells(&self, row: usize) -> Line {
        let n = self.len();
        assert!(row < n, "row {row} out of bounds");
        self.cells[row * n..(row + 1) * n].iter().copied().collect()
    }

    /// Extracts column `col` as an owned line.
    ///
    /// # Panics
    ///
    /// If `col` is out of bounds.
    #[must_use]
    pub fn col_cells(&self, col: usize) -> Line {
        let n = self.len();
        assert!(col < n, "column {col} out of bounds");
        (0..n).map(|row| self.cells[row * n + col]).collect()
    }

    /// Number of empty cells left.
    #[must_use]
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_empty()).count()
    }

    /// True once no empty cell remains.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_filled())
    }
}

impl fmt::Display for Grid {
    /// Renders the text format: one line per row, symbols separated by single
    /// spaces, each row terminated by a newline.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let n = self.len();
        for row in 0..n {
            let line = self.cells[row * n..(row + 1) * n].iter().join(" ");
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_all_empty() {
        let grid = Grid::new(Size::Eight);
        assert_eq!(grid.len(), 8);
        assert_eq!(grid.empty_count(), 64);
        assert!(!grid.is_full());
        assert!(grid.cells().iter().all(|c| c.is_empty()));
    }

    #[test]
    fn test_set_then_get() {
        let mut grid = Grid::new(Size::Four);
        grid.set(1, 2, Cell::One);
        assert_eq!(grid.get(1, 2), Some(Cell::One));
        assert_eq!(grid.get(2, 1), Some(Cell::Empty));
        assert_eq!(grid.empty_count(), 15);
    }

    #[test]
    fn test_get_out_of_bounds_is_none() {
        let grid = Grid::new(Size::Four);
        assert_eq!(grid.get(4, 0), None);
        assert_eq!(grid.get(0, 4), None);
        assert_eq!(grid.get(100, 100), None);
    }

    #[test]
    fn test_set_out_of_bounds_is_a_no_op() {
        let mut grid = Grid::new(Size::Four);
        let before = grid.clone();
        grid.set(4, 0, Cell::Zero);
        grid.set(0, 17, Cell::One);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_set_empty_is_a_no_op() {
        let mut grid = Grid::new(Size::Four);
        grid.set(0, 0, Cell::Zero);
        grid.set(0, 0, Cell::Empty);
        assert_eq!(grid.get(0, 0), Some(Cell::Zero));
    }

    #[test]
    fn test_copy_from_restores() {
        let mut grid = Grid::new(Size::Four);
        grid.set(0, 0, Cell::Zero);
        let snapshot = grid.clone();
        grid.set(3, 3, Cell::One);
        assert_ne!(grid, snapshot);
        grid.copy_from(&snapshot);
        assert_eq!(grid, snapshot);
    }

    #[test]
    #[should_panic(expected = "different sizes")]
    fn test_copy_from_size_mismatch_panics() {
        let mut four = Grid::new(Size::Four);
        let eight = Grid::new(Size::Eight);
        four.copy_from(&eight);
    }

    #[test]
    fn test_line_extraction() {
        let mut grid = Grid::new(Size::Four);
        grid.set(0, 0, Cell::Zero);
        grid.set(0, 1, Cell::One);
        grid.set(2, 1, Cell::One);
        assert_eq!(
            grid.row_cells(0).as_slice(),
            &[Cell::Zero, Cell::One, Cell::Empty, Cell::Empty]
        );
        assert_eq!(
            grid.col_cells(1).as_slice(),
            &[Cell::One, Cell::Empty, Cell::One, Cell::Empty]
        );
    }

    #[test]
    fn test_display_format() {
        let mut grid = Grid::new(Size::Four);
        grid.set(0, 0, Cell::Zero);
        grid.set(0, 3, Cell::One);
        let text = grid.to_string();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("0 _ _ 1"));
        assert_eq!(lines.next(), Some("_ _ _ _"));
        assert!(text.ends_with('\n'));
    }
}
