//! Game session: swap validation and cascade resolution.
//!
//! `Game` owns the grid, the score and the random source. A swap request is
//! either rejected with the grid untouched, or accepted and resolved by
//! repeated passes (score, clear, gravity and refill, rescan) until the board
//! is stable.
use tracing::{debug, instrument, trace, warn};

use crate::config::GameConfig;
use crate::engine::{is_adjacent, Grid, MatchSet, Position, Run, Token};
use crate::error::{EngineError, EngineResult};
use crate::random::{RandomSource, SeededRandom};

/// Why a swap request was turned down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// The two positions are not orthogonal neighbours.
    NotAdjacent,
    /// The swap would not create any run; it was reverted.
    NoMatch,
}

/// One resolution pass of a cascade.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CascadeStep {
    /// 1-based position of the pass within its cascade.
    pub index: u32,
    /// Runs scored in this pass.
    pub runs: Vec<Run>,
    pub points: u32,
    /// Distinct cells cleared.
    pub cleared: usize,
    /// Board after the pass was refilled.
    pub grid: Grid,
}

/// Result of [`Game::attempt_swap`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SwapOutcome {
    pub accepted: bool,
    /// Set exactly when `accepted` is false.
    pub rejection: Option<Rejection>,
    pub score_delta: u32,
    pub cascade_steps: u32,
    /// Per-pass log, in resolution order.
    pub steps: Vec<CascadeStep>,
    /// The cascade stopped at `max_cascade_steps` with matches still on the board.
    pub capped: bool,
}

impl SwapOutcome {
    fn rejected(reason: Rejection) -> Self {
        SwapOutcome {
            rejection: Some(reason),
            ..SwapOutcome::default()
        }
    }
}

/// Result of [`Game::attempt_swap_stepwise`].
pub enum SwapAttempt<'g, R: RandomSource> {
    Rejected(Rejection),
    Accepted(Cascade<'g, R>),
}

/// A cascade in progress.
///
/// Each call to `next` runs one pass and yields its [`CascadeStep`]; the
/// iterator ends when a rescan finds nothing or the cascade cap is reached.
/// Dropping it early leaves the grid as of the last completed pass, free of
/// `Empty` cells but possibly still holding runs.
pub struct Cascade<'g, R: RandomSource> {
    game: &'g mut Game<R>,
    pending: Option<MatchSet>,
    steps: u32,
    score_delta: u32,
    capped: bool,
}

impl<'g, R: RandomSource> Cascade<'g, R> {
    fn new(game: &'g mut Game<R>, first: MatchSet) -> Self {
        Cascade {
            game,
            pending: Some(first),
            steps: 0,
            score_delta: 0,
            capped: false,
        }
    }

    pub fn score_delta(&self) -> u32 {
        self.score_delta
    }

    pub fn steps_taken(&self) -> u32 {
        self.steps
    }

    pub fn is_capped(&self) -> bool {
        self.capped
    }

    /// Matches waiting for the next pass, if any.
    pub fn pending(&self) -> Option<&MatchSet> {
        self.pending.as_ref()
    }

    pub fn grid(&self) -> &Grid {
        &self.game.grid
    }
}

impl<R: RandomSource> Iterator for Cascade<'_, R> {
    type Item = CascadeStep;

    fn next(&mut self) -> Option<CascadeStep> {
        let config = self.game.config;
        if self.steps >= config.max_cascade_steps {
            if self.pending.take().is_some() {
                self.capped = true;
                warn!(
                    steps = self.steps,
                    "cascade cap reached with matches still on the board"
                );
            }
            return None;
        }
        let matches = self.pending.take()?;

        let points = matches.score();
        let cleared = self.game.grid.clear(&matches);
        self.game
            .grid
            .compact_and_refill_all(config.token_types, &mut self.game.rng);
        self.game.score += points;
        self.score_delta += points;
        self.steps += 1;

        let rescan = self.game.grid.detect_matches();
        if !rescan.is_empty() {
            self.pending = Some(rescan);
        }
        debug!(
            step = self.steps,
            runs = matches.runs().len(),
            cleared,
            points,
            more = self.pending.is_some(),
            "cascade step"
        );

        Some(CascadeStep {
            index: self.steps,
            runs: matches.runs().to_vec(),
            points,
            cleared,
            grid: self.game.grid.clone(),
        })
    }
}

/// At most one pending cell awaiting a second click.
///
/// The first `select` stores the cell; the second hands back both cells and
/// clears the selection, whatever they are. Non-adjacent pairs are rejected by
/// [`Game::attempt_swap`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pending: Option<Position>,
}

impl Selection {
    pub fn pending(&self) -> Option<Position> {
        self.pending
    }

    pub fn select(&mut self, pos: Position) -> Option<(Position, Position)> {
        match self.pending.take() {
            Some(first) => Some((first, pos)),
            None => {
                self.pending = Some(pos);
                None
            }
        }
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}

/// Manages the state and progression of a game session.
///
/// # Examples
/// ```
/// use match3_engine::config::GameConfig;
/// use match3_engine::game::Game;
/// use match3_engine::random::SeededRandom;
///
/// let mut game = Game::new(GameConfig::default(), SeededRandom::new(514514)).unwrap();
/// assert_eq!(game.score(), 0);
///
/// if let Some((a, b)) = game.hint() {
///     let outcome = game.attempt_swap(a, b).unwrap();
///     assert!(outcome.accepted);
///     assert!(outcome.cascade_steps >= 1);
///     assert_eq!(game.score(), outcome.score_delta);
/// }
/// assert_eq!(game.grid().count_empty(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct Game<R: RandomSource = SeededRandom> {
    grid: Grid,
    config: GameConfig,
    rng: R,
    score: u32,
    moves: u32,
}

impl<R: RandomSource> Game<R> {
    /// Creates a game with a freshly generated board.
    ///
    /// # Errors
    /// Returns [`EngineError::Configuration`] if `config` is degenerate.
    #[instrument(level = "debug", skip(rng))]
    pub fn new(config: GameConfig, mut rng: R) -> EngineResult<Self> {
        config.validate()?;
        let grid = Grid::new_random(
            config.rows,
            config.cols,
            config.token_types,
            config.match_free_start,
            &mut rng,
        );
        debug!(rows = config.rows, cols = config.cols, "board generated");
        Ok(Game {
            grid,
            config,
            rng,
            score: 0,
            moves: 0,
        })
    }

    /// Creates a game on an explicit board.
    ///
    /// # Errors
    /// Returns [`EngineError::Configuration`] if `config` is degenerate, and
    /// [`EngineError::Layout`] if the grid's dimensions differ from the
    /// config or a cell is empty or outside `0..token_types`.
    pub fn from_grid(config: GameConfig, grid: Grid, rng: R) -> EngineResult<Self> {
        config.validate()?;
        if grid.rows() != config.rows || grid.cols() != config.cols {
            return Err(EngineError::Layout(format!(
                "grid is {}x{}, configuration expects {}x{}",
                grid.rows(),
                grid.cols(),
                config.rows,
                config.cols
            )));
        }
        for r in 0..grid.rows() {
            for (c, token) in grid.row(r)?.iter().enumerate() {
                match token {
                    Token::Filled(t) if *t < config.token_types => {}
                    _ => {
                        return Err(EngineError::Layout(format!(
                            "cell ({}, {}) holds {:?}, expected a token below {}",
                            r, c, token, config.token_types
                        )))
                    }
                }
            }
        }
        Ok(Game {
            grid,
            config,
            rng,
            score: 0,
            moves: 0,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Cumulative score over all accepted swaps.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Number of accepted swaps.
    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Validates and applies a swap, resolving the whole cascade.
    ///
    /// # Errors
    /// Returns [`EngineError::OutOfBounds`] if either position is outside the
    /// grid. Non-adjacent and non-matching swaps are not errors; they come
    /// back as rejected outcomes with the grid and score unchanged.
    #[instrument(level = "debug", skip(self))]
    pub fn attempt_swap(&mut self, a: Position, b: Position) -> EngineResult<SwapOutcome> {
        match self.attempt_swap_stepwise(a, b)? {
            SwapAttempt::Rejected(reason) => Ok(SwapOutcome::rejected(reason)),
            SwapAttempt::Accepted(mut cascade) => {
                let steps: Vec<CascadeStep> = cascade.by_ref().collect();
                Ok(SwapOutcome {
                    accepted: true,
                    rejection: None,
                    score_delta: cascade.score_delta(),
                    cascade_steps: cascade.steps_taken(),
                    steps,
                    capped: cascade.is_capped(),
                })
            }
        }
    }

    /// Validates and applies a swap, leaving the cascade to the caller.
    ///
    /// On acceptance the swap is already on the board and the returned
    /// [`Cascade`] resolves one pass per `next` call; the score grows as the
    /// passes run.
    ///
    /// # Errors
    /// Same as [`Game::attempt_swap`].
    #[instrument(level = "debug", skip(self))]
    pub fn attempt_swap_stepwise(
        &mut self,
        a: Position,
        b: Position,
    ) -> EngineResult<SwapAttempt<'_, R>> {
        self.grid.get(a)?;
        self.grid.get(b)?;
        if !is_adjacent(a, b) {
            trace!("swap rejected: cells are not adjacent");
            return Ok(SwapAttempt::Rejected(Rejection::NotAdjacent));
        }

        self.grid.swap(a, b)?;
        let matches = self.grid.detect_matches();
        if matches.is_empty() {
            self.grid.swap(a, b)?;
            trace!("swap rejected: no match");
            return Ok(SwapAttempt::Rejected(Rejection::NoMatch));
        }

        self.moves += 1;
        debug!(runs = matches.runs().len(), "swap accepted");
        Ok(SwapAttempt::Accepted(Cascade::new(self, matches)))
    }

    /// First valid swap in row-major order, if any.
    pub fn hint(&self) -> Option<(Position, Position)> {
        self.grid.find_valid_swaps().into_iter().next()
    }

    /// The game is over when no swap can produce a match.
    pub fn is_game_over(&self) -> bool {
        self.grid.find_valid_swaps().is_empty()
    }
}
