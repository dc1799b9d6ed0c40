//! # takuzu
//!
//! `takuzu` is a command-line solver and generator for takuzu (binairo)
//! puzzles: square binary grids in which every row and column holds equal
//! numbers of `0`s and `1`s, no symbol appears three times in a row, and no
//! two rows or columns are identical.
//!
//! The engine runs a sound heuristic propagator to a fixed point and falls
//! back on backtracking search for whatever deduction alone cannot settle.
//! Generation sprinkles random consistent placements over an empty grid and
//! can certify, for the small sizes, that the result has a solution.
//!
//! ## Usage
//!
//! ```sh
//! # Solve a grid file (stops at the first solution)
//! takuzu puzzle.takuzu
//!
//! # Find every solution
//! takuzu solve --path puzzle.takuzu --all
//!
//! # Solve every .takuzu file under a directory
//! takuzu solve --path puzzles/
//!
//! # Generate an 8x8 grid with 20% of its cells filled
//! takuzu generate --size 8 --percent 20
//!
//! # Generate a 4x4 grid certified to have a solution, reproducibly
//! takuzu generate --size 4 --percent 30 --unique --seed 7 --output out.takuzu
//! ```
//!
//! ### Common options
//!
//! -   `-v, --verbose`: verbose diagnostics (default: `false`).
//! -   `--stats`: print timing and search statistics (default: `true`).
//! -   `--strategy <ordered|constrained>`: choice strategy for the search.
//! -   `--seed <N>`: seed the generator's randomness.
//!
//! Grid files hold one row per line, symbols from `{0, 1, _}` separated by
//! single spaces; `#` starts a comment line. Supported sizes are 4, 8, 16,
//! 32 and 64.

use clap::Parser;

mod command_line;

use command_line::cli::{effective_common, init_logging, run, Cli};

/// Global allocator using `tikv-jemallocator` for potentially better
/// performance and memory usage tracking.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Main entry point: parses the command line, sets up logging, and
/// dispatches to the subcommand handlers.
fn main() {
    let cli = Cli::parse();
    init_logging(effective_common(&cli).verbose);

    if let Err(message) = run(cli) {
        eprintln!("{message}");
        std::process::exit(1);
    }
}
