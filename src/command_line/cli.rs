#![allow(clippy::cast_precision_loss)]

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use takuzu_solver::takuzu::cell::Size;
use takuzu_solver::takuzu::generator;
use takuzu_solver::takuzu::selection::{MostConstrained, Ordered, StrategyImpls};
use takuzu_solver::takuzu::solver::{Mode, SearchStats, Solver};
use takuzu_solver::takuzu::text::parse_grid_file;
use tikv_jemalloc_ctl::{epoch, stats};

/// Defines the command-line interface for the takuzu application.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(name = "takuzu", version, about = "A takuzu (binairo) puzzle solver and generator")]
pub(crate) struct Cli {
    /// An optional global path argument. If provided without a subcommand,
    /// it's treated as the path to a grid file to solve.
    #[arg(value_name = "PATH")]
    pub grid: Option<PathBuf>,

    /// Specifies the subcommand to execute (e.g. `solve`, `generate`).
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve a grid file, or every `.takuzu` file under a directory.
    Solve {
        /// Path to the grid file or directory.
        #[arg(long)]
        path: PathBuf,

        /// Search for all solutions instead of stopping at the first.
        #[arg(short, long, default_value_t = false)]
        all: bool,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate a random grid.
    Generate {
        /// Side length of the generated grid.
        #[arg(short, long, default_value_t = 8)]
        size: usize,

        /// Percentage of cells to fill.
        #[arg(short, long, default_value_t = 20, value_parser = clap::value_parser!(u8).range(0..=100))]
        percent: u8,

        /// Only emit a grid certified to have at least one solution
        /// (sizes 4 and 8; larger sizes skip the certification).
        #[arg(short, long, default_value_t = false)]
        unique: bool,

        /// Write the grid to this file instead of standard output.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct CommonOptions {
    /// Enable verbose diagnostics (warnings about dropped cell accesses,
    /// propagation traces).
    #[arg(short, long, default_value_t = false)]
    pub(crate) verbose: bool,

    /// Enable printing of timing and search statistics after solving.
    #[arg(long, default_value_t = true)]
    pub(crate) stats: bool,

    /// Specifies the choice strategy used by the backtracking search.
    #[arg(long, value_enum, default_value_t = StrategyArg::Ordered)]
    strategy: StrategyArg,

    /// Seed for the generator's random number stream, for reproducible
    /// grids. A fresh seed is drawn when absent.
    #[arg(long)]
    seed: Option<u64>,
}

/// The choice strategies selectable from the command line.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum StrategyArg {
    /// First empty cell in row-major order.
    #[default]
    Ordered,
    /// Empty cell on the densest row/column crossing.
    Constrained,
}

impl StrategyArg {
    /// Converts the flag into the strategy implementation it names.
    const fn to_impl(self) -> StrategyImpls {
        match self {
            Self::Ordered => StrategyImpls::Ordered(Ordered),
            Self::Constrained => StrategyImpls::MostConstrained(MostConstrained),
        }
    }
}

/// Initialises the `fern` logger. Verbose mode turns on the engine's debug
/// traces; otherwise only warnings come through.
pub(crate) fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{}] {}", record.level(), message));
        })
        .level(level)
        .chain(io::stderr())
        .apply()
        .expect("logger must only be initialised once");
}

/// The `CommonOptions` in effect for the parsed invocation: the
/// subcommand's, or the top-level set when no subcommand was given.
pub(crate) fn effective_common(cli: &Cli) -> &CommonOptions {
    match &cli.command {
        Some(
            Commands::Solve { common, .. } | Commands::Generate { common, .. },
        ) => common,
        Some(Commands::Completions { .. }) | None => &cli.common,
    }
}

/// Dispatches the parsed command line.
///
/// # Errors
///
/// A human-readable message for every failure that should reach the user;
/// the caller prints it and exits non-zero. An unsolvable puzzle is not an
/// error.
pub(crate) fn run(cli: Cli) -> Result<(), String> {
    // A bare path with no subcommand defaults to solving that file.
    if let Some(path) = cli.grid.clone() {
        if cli.command.is_none() {
            return solve_path(&path, Mode::FindFirst, &cli.common);
        }
    }

    match cli.command {
        Some(Commands::Solve { path, all, common }) => {
            let mode = if all { Mode::FindAll } else { Mode::FindFirst };
            solve_path(&path, mode, &common)
        }
        Some(Commands::Generate {
            size,
            percent,
            unique,
            output,
            common,
        }) => generate_grid(size, percent, unique, output.as_deref(), &common),
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err("no command provided; use --help for more information".to_string()),
    }
}

/// Solves a single grid file, or every `.takuzu` file under a directory.
fn solve_path(path: &Path, mode: Mode, common: &CommonOptions) -> Result<(), String> {
    if !path.is_dir() {
        return solve_file(path, mode, common);
    }

    for entry in walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
    {
        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }
        if file_path.extension().is_none_or(|ext| ext != "takuzu") {
            eprintln!("Skipping non-grid file: {}", file_path.display());
            continue;
        }
        solve_file(file_path, mode, common)?;
    }

    Ok(())
}

/// Parses one grid file, solves it, and reports results.
fn solve_file(path: &Path, mode: Mode, common: &CommonOptions) -> Result<(), String> {
    let time = Instant::now();
    let mut grid =
        parse_grid_file(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let parse_time = time.elapsed();

    println!("Solving: {}", path.display());

    let mut solver = Solver::with_strategy(mode, common.strategy.to_impl());
    let time = Instant::now();
    let solutions = solver.solve(&mut grid);
    let elapsed = time.elapsed();

    if solutions.is_empty() {
        println!("No solution found");
    } else {
        println!("Number of solutions: {}", solutions.len());
        for (index, solution) in solutions.iter().enumerate() {
            println!("Solution {}", index + 1);
            print!("{solution}");
        }
    }

    if common.stats {
        print_stats(parse_time, elapsed, solver.stats(), solutions.len());
    }

    Ok(())
}

/// Generates a grid and writes it to the requested destination.
fn generate_grid(
    size: usize,
    percent: u8,
    unique: bool,
    output: Option<&Path>,
    common: &CommonOptions,
) -> Result<(), String> {
    let size = Size::try_from(size)
        .map_err(|()| format!("invalid grid size {size}: expected 4, 8, 16, 32 or 64"))?;
    let mut rng = common
        .seed
        .map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);

    let time = Instant::now();
    let grid = if unique {
        generator::generate_with_solution(size, percent, &mut rng).map_err(|e| e.to_string())?
    } else {
        generator::generate(size, percent, &mut rng)
    };
    let elapsed = time.elapsed();

    match output {
        Some(path) => {
            fs::write(path, grid.to_string())
                .map_err(|e| format!("unable to write {}: {e}", path.display()))?;
            println!("Grid written to: {}", path.display());
        }
        None => print!("{grid}"),
    }

    if common.stats {
        let (allocated, resident) = memory_stats();
        println!("\n======================[ Generation Statistics ]======================");
        stat_line("Generate time (s)", format!("{:.3}", elapsed.as_secs_f64()));
        stat_line("Filled cells", size.cell_count() - grid.empty_count());
        stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
        stat_line("Resident memory (MiB)", format!("{resident:.2}"));
        println!("=====================================================================");
    }

    Ok(())
}

/// Reads allocated and resident memory from jemalloc, in MiB.
fn memory_stats() -> (f64, f64) {
    epoch::advance().unwrap();

    let allocated_bytes = stats::allocated::mib().unwrap().read().unwrap();
    let resident_bytes = stats::resident::mib().unwrap().read().unwrap();

    (
        allocated_bytes as f64 / (1024.0 * 1024.0),
        resident_bytes as f64 / (1024.0 * 1024.0),
    )
}

/// Helper function to print a single statistic line in a formatted table row.
fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Prints a summary of parse and search statistics.
fn print_stats(parse_time: Duration, elapsed: Duration, s: SearchStats, solutions: usize) {
    let (allocated, resident) = memory_stats();

    println!("\n========================[ Search Statistics ]========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Solve time (s)", format!("{:.3}", elapsed.as_secs_f64()));
    stat_line("Solutions", solutions);
    stat_line("Nodes visited", s.nodes);
    stat_line("Decisions", s.decisions);
    stat_line("Propagated cells", s.propagated);
    stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    println!("=====================================================================");
}
