use crate::engine::{Grid, MatchSet, Position};
use crate::error::EngineResult;
use crate::game::Game;
use crate::random::RandomSource;

/// A candidate swap.
pub type Swap = (Position, Position);

/// Matches that swapping `a` and `b` would produce on `grid`, before any
/// cascade. The grid itself is not modified.
pub fn matches_after_swap(grid: &Grid, a: Position, b: Position) -> EngineResult<MatchSet> {
    let mut probe = grid.clone();
    probe.swap(a, b)?;
    Ok(probe.detect_matches())
}

/// Number of swaps currently available to the player.
pub fn count_valid_swaps(grid: &Grid) -> usize {
    grid.find_valid_swaps().len()
}

/// Chooses the first valid swap in row-major order.
///
/// # Returns
/// An `Option` containing a tuple:
///   - `f64`: The immediate score of the first resolution pass.
///   - `Swap`: The chosen pair of positions.
/// Returns `None` if no valid swap exists.
pub fn choose_swap_first(grid: &Grid) -> Option<(f64, Swap)> {
    let (a, b) = grid.find_valid_swaps().into_iter().next()?;
    let score = matches_after_swap(grid, a, b).ok()?.score();
    Some((score as f64, (a, b)))
}

/// Chooses a swap based on the Maximize Immediate Score (MIS) strategy.
///
/// This strategy selects the swap whose first resolution pass scores highest.
/// If multiple swaps yield the same maximum score, the one clearing more cells
/// is preferred.
///
/// # Returns
/// An `Option` containing the immediate score and the chosen swap, or `None`
/// if no valid swap exists.
pub fn choose_swap_mis(grid: &Grid) -> Option<(f64, Swap)> {
    let mut best: Option<(u32, usize, Swap)> = None;
    for (a, b) in grid.find_valid_swaps() {
        let Ok(matches) = matches_after_swap(grid, a, b) else {
            continue;
        };
        let score = matches.score();
        let cleared = matches.matched_count();
        let better = match best {
            None => true,
            Some((best_score, best_cleared, _)) => {
                score > best_score || (score == best_score && cleared > best_cleared)
            }
        };
        if better {
            best = Some((score, cleared, (a, b)));
        }
    }
    best.map(|(score, _, swap)| (score as f64, swap))
}

/// Chooses the swap whose match lies lowest on the board.
///
/// Clearing near the bottom moves more tokens under gravity, which tends to
/// set up further cascades. Ties keep the first swap found.
///
/// # Returns
/// An `Option` containing the lowest matched row index and the chosen swap,
/// or `None` if no valid swap exists.
pub fn choose_swap_lowest(grid: &Grid) -> Option<(f64, Swap)> {
    let mut best: Option<(usize, Swap)> = None;
    for (a, b) in grid.find_valid_swaps() {
        let Ok(matches) = matches_after_swap(grid, a, b) else {
            continue;
        };
        let lowest_row = matches
            .positions()
            .iter()
            .map(|p| p.row)
            .max()
            .unwrap_or(0);
        if best.map_or(true, |(row, _)| lowest_row > row) {
            best = Some((lowest_row, (a, b)));
        }
    }
    best.map(|(row, swap)| (row as f64, swap))
}

/// Chooses the swap whose full cascade scores highest.
///
/// Every candidate is played on a clone of the game, random source included,
/// so the result is what the real game would produce. This reads the future
/// refills and is meant as an upper bound for the other strategies.
///
/// # Returns
/// An `Option` containing the simulated score delta and the chosen swap, or
/// `None` if no valid swap exists.
pub fn choose_swap_cascade<R: RandomSource + Clone>(game: &Game<R>) -> Option<(f64, Swap)> {
    let mut best: Option<(u32, Swap)> = None;
    for (a, b) in game.grid().find_valid_swaps() {
        let mut sim = game.clone();
        let delta = match sim.attempt_swap(a, b) {
            Ok(outcome) if outcome.accepted => outcome.score_delta,
            _ => continue,
        };
        if best.map_or(true, |(best_delta, _)| delta > best_delta) {
            best = Some((delta, (a, b)));
        }
    }
    best.map(|(delta, swap)| (delta as f64, swap))
}
