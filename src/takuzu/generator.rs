//! The random grid generator.
//!
//! Fills a fraction of an empty grid with symbols that keep it consistent,
//! one uniformly random cell at a time. Generation is greedy and never
//! backtracks, so it can fall short of the requested fill count on a crowded
//! grid, but it never hands back an inconsistent one. For the two smallest
//! sizes the generator can additionally certify its output by running the
//! solver over a scratch copy until a grid with at least one solution comes
//! out; for larger sizes that certification is far too slow and is skipped.
//!
//! All the crate's randomness lives here, behind a caller-supplied
//! [`fastrand::Rng`], so generation is reproducible from a seed.

use crate::takuzu::cell::{Cell, Size};
use crate::takuzu::grid::Grid;
use crate::takuzu::selection::validate_placement;
use crate::takuzu::solver::{Mode, Solver};
use log::{debug, warn};
use std::error::Error;
use std::fmt;

/// How many grids to try before giving up on certified generation.
pub const CERTIFY_MAX_ATTEMPTS: usize = 1000;

/// Error returned when certified generation exhausts its attempt budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaveUp {
    /// Number of grids generated and rejected.
    pub attempts: usize,
}

impl fmt::Display for GaveUp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "gave up after {} attempts to generate a grid with a solution",
            self.attempts
        )
    }
}

impl Error for GaveUp {}

/// Generates a partially filled, consistent grid.
///
/// The target fill count is `percentage` percent of the cell count, rounded
/// down. Each step draws a random still-empty cell and places whichever
/// symbol keeps the grid consistent, picking uniformly when both do. A cell
/// that admits neither symbol is retired without consuming the fill quota:
/// placements only ever tighten the constraints, so such a cell can never
/// become placeable again and retrying it would loop forever. The quota is
/// therefore met exactly unless the candidate pool runs dry first.
///
/// # Panics
///
/// If `percentage` exceeds 100. The CLI validates its arguments, so an
/// out-of-range value reaching this function is a programmer error.
#[must_use]
pub fn generate(size: Size, percentage: u8, rng: &mut fastrand::Rng) -> Grid {
    assert!(percentage <= 100, "fill percentage must be 0..=100");

    let n = usize::from(size);
    let target = usize::from(percentage) * size.cell_count() / 100;

    let mut grid = Grid::new(size);
    let mut candidates: Vec<(usize, usize)> =
        (0..n).flat_map(|row| (0..n).map(move |col| (row, col))).collect();
    let mut filled = 0;

    while filled < target && !candidates.is_empty() {
        let index = rng.usize(..candidates.len());
        let (row, col) = candidates.swap_remove(index);

        match pick_symbol(&grid, row, col, rng) {
            Some(cell) => {
                grid.set(row, col, cell);
                filled += 1;
            }
            None => {
                debug!("cell ({row}, {col}) admits neither symbol; retired");
            }
        }
    }

    if filled < target {
        debug!("generation fell short: {filled} of {target} cells placed");
    }
    grid
}

/// Picks a symbol for `(row, col)` that keeps the grid consistent, or `None`
/// when neither symbol does.
fn pick_symbol(grid: &Grid, row: usize, col: usize, rng: &mut fastrand::Rng) -> Option<Cell> {
    let zero_fits = validate_placement(grid, row, col, Cell::Zero);
    let one_fits = validate_placement(grid, row, col, Cell::One);

    match (zero_fits, one_fits) {
        (true, true) => Some(if rng.bool() { Cell::Zero } else { Cell::One }),
        (true, false) => Some(Cell::Zero),
        (false, true) => Some(Cell::One),
        (false, false) => None,
    }
}

/// Generates a grid certified to have at least one solution.
///
/// Only grids of size 4 and 8 are certified: generation is repeated until a
/// `FindFirst` solve of a scratch copy succeeds, up to
/// [`CERTIFY_MAX_ATTEMPTS`] times. Larger sizes take far too long to solve
/// repeatedly, so they skip certification and return the first generated
/// grid as-is.
///
/// # Errors
///
/// [`GaveUp`] when no certifiable grid was produced within the attempt
/// budget.
pub fn generate_with_solution(
    size: Size,
    percentage: u8,
    rng: &mut fastrand::Rng,
) -> Result<Grid, GaveUp> {
    if !matches!(size, Size::Four | Size::Eight) {
        warn!("skipping solution certification for {size}: only 4x4 and 8x8 grids are certified");
        return Ok(generate(size, percentage, rng));
    }

    for attempt in 0..CERTIFY_MAX_ATTEMPTS {
        let grid = generate(size, percentage, rng);
        let mut scratch = grid.clone();
        if !Solver::new(Mode::FindFirst).solve(&mut scratch).is_empty() {
            debug!("certified a solvable grid on attempt {}", attempt + 1);
            return Ok(grid);
        }
    }

    Err(GaveUp {
        attempts: CERTIFY_MAX_ATTEMPTS,
    })
}
