//! Token randomness.
//!
//! The engine never draws from a global generator; every refill goes through a
//! [`RandomSource`] injected when the game is built, so a seed or a scripted
//! sequence fully determines a session.
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Supplies token values uniformly distributed in `0..token_types`.
pub trait RandomSource {
    /// Draws the next token value. `token_types` is always positive.
    fn next_token(&mut self, token_types: u8) -> u8;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn next_token(&mut self, token_types: u8) -> u8 {
        (**self).next_token(token_types)
    }
}

/// `SmallRng`-backed source; the same seed always replays the same game.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    rng: SmallRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        SeededRandom {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Seeds from the operating system, for interactive sessions.
    pub fn from_entropy() -> Self {
        SeededRandom {
            rng: SmallRng::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_token(&mut self, token_types: u8) -> u8 {
        self.rng.gen_range(0..token_types)
    }
}

/// Replays a fixed sequence of values, wrapping around at the end.
///
/// Values are reduced modulo `token_types`, so a script written for a large
/// palette stays valid on a smaller one.
///
/// # Examples
/// ```
/// use match3_engine::random::{RandomSource, ScriptedRandom};
/// let mut source = ScriptedRandom::new(vec![1, 4, 7]);
/// assert_eq!(source.next_token(6), 1);
/// assert_eq!(source.next_token(6), 4);
/// assert_eq!(source.next_token(6), 1); // 7 % 6
/// assert_eq!(source.next_token(6), 1); // wrapped
/// ```
#[derive(Clone, Debug)]
pub struct ScriptedRandom {
    values: Vec<u8>,
    cursor: usize,
}

impl ScriptedRandom {
    /// An empty script behaves as a constant `0`.
    pub fn new(values: Vec<u8>) -> Self {
        ScriptedRandom { values, cursor: 0 }
    }

    /// Number of values drawn so far.
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn next_token(&mut self, token_types: u8) -> u8 {
        if self.values.is_empty() {
            self.cursor += 1;
            return 0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value % token_types
    }
}
