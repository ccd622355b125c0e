//! # Match-Three Engine Library
//!
//! This library provides the match-resolution engine of a tile-matching
//! puzzle: an R×C grid of colored tokens where the player swaps two adjacent
//! tokens, aligned runs of three or more are removed, columns fall under
//! gravity, empty cells are refilled and the board is re-evaluated until it
//! is stable.
//!
//! It is used by two binaries:
//! - `human_player`: Allows interactive play via the command line.
//! - `heuristic_evaluator`: Plays seeded games with several swap-choosing
//!   strategies and reports their average scores.
//!
//! ## Modules
//! - `engine`: Contains the grid (`Grid`), cell contents (`Token`), positions,
//!   and all board mechanics (run detection, scoring, clearing, gravity, refill).
//! - `game`: The session controller (`Game`) that validates swaps and resolves
//!   cascades, either in one call or pass by pass.
//! - `random`: The injectable token source (`RandomSource`) with seeded and
//!   scripted implementations.
//! - `config`: Construction-time configuration (`GameConfig`).
//! - `error`: The error type (`EngineError`).
//! - `heuristics`: Strategies for choosing a swap.
//! - `utils`: Parsing grids from strings.

pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod heuristics;
pub mod random;
pub mod utils;

pub use config::GameConfig;
pub use engine::{Grid, Position, Token};
pub use error::{EngineError, EngineResult};
pub use game::{Game, SwapOutcome};
