//! Construction-time configuration for a game session.

use crate::error::{EngineError, EngineResult};

/// Number of distinct token values that can be written as a single character
/// (`0-9` then `a-z`).
pub const MAX_TOKEN_TYPES: u8 = 36;

/// Smallest grid side on which a run of three fits.
pub const MIN_SIDE: usize = 3;

/// Smallest palette that always admits a match-free initial board.
pub const MIN_TOKEN_TYPES: u8 = 3;

/// Game dimensions and resolution limits.
///
/// The defaults reproduce the reference configuration: 8 rows, 10 columns,
/// 6 token types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    pub token_types: u8,
    /// Upper bound on cascade passes triggered by a single swap.
    pub max_cascade_steps: u32,
    /// Redraw initial cells that would complete a run.
    pub match_free_start: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            rows: 8,
            cols: 10,
            token_types: 6,
            max_cascade_steps: 1000,
            match_free_start: true,
        }
    }
}

impl GameConfig {
    /// Creates a configuration with the given dimensions and default limits.
    pub fn new(rows: usize, cols: usize, token_types: u8) -> Self {
        GameConfig {
            rows,
            cols,
            token_types,
            ..GameConfig::default()
        }
    }

    /// Rejects degenerate configurations.
    ///
    /// # Errors
    /// Returns [`EngineError::Configuration`] if either side is shorter than
    /// [`MIN_SIDE`], if `token_types` is outside
    /// `MIN_TOKEN_TYPES..=MAX_TOKEN_TYPES`, or if `max_cascade_steps` is zero.
    ///
    /// # Examples
    /// ```
    /// use match3_engine::config::GameConfig;
    /// assert!(GameConfig::default().validate().is_ok());
    /// assert!(GameConfig::new(2, 10, 6).validate().is_err());
    /// ```
    pub fn validate(&self) -> EngineResult<()> {
        if self.rows < MIN_SIDE || self.cols < MIN_SIDE {
            return Err(EngineError::Configuration(format!(
                "grid must be at least {}x{}, got {}x{}",
                MIN_SIDE, MIN_SIDE, self.rows, self.cols
            )));
        }
        if self.token_types < MIN_TOKEN_TYPES || self.token_types > MAX_TOKEN_TYPES {
            return Err(EngineError::Configuration(format!(
                "token_types must be between {} and {}, got {}",
                MIN_TOKEN_TYPES, MAX_TOKEN_TYPES, self.token_types
            )));
        }
        if self.max_cascade_steps == 0 {
            return Err(EngineError::Configuration(
                "max_cascade_steps must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
