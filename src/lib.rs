//! This crate solves and generates takuzu (binairo) puzzles: square binary
//! grids constrained by symbol balance, maximum run length and pairwise
//! distinct lines. The engine combines a sound heuristic propagator with a
//! backtracking search, and the generator layers rejection-sampled random
//! placement on top of both.

/// The `takuzu` module contains the whole puzzle engine: the grid store, the
/// consistency rules, the heuristic propagator, the choice strategies, the
/// backtracking solver and the generator.
pub mod takuzu;
