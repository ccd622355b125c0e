//! Error types shared by the engine, the controller and the text utilities.

/// Errors raised by the match-resolution engine.
///
/// Rejected swaps (non-adjacent pairs, swaps that produce no match) are not
/// errors; they are reported through [`crate::game::SwapOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("position ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error("invalid grid layout: {0}")]
    Layout(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
