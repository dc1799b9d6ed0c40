#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The takuzu engine: grid storage, rule checking, constraint propagation,
//! backtracking search and puzzle generation.

pub mod cell;
pub mod grid;
pub mod rules;
pub mod heuristics;
pub mod selection;
pub mod solver;
pub mod generator;
pub mod text;
