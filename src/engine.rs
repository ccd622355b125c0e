//! Core grid engine for the match-three puzzle.
//!
//! This module defines the game's fundamental components:
//! - `Token`: the content of one cell, either a token type or `Empty` while a
//!   cascade pass is between clearing and refilling.
//! - `Position`: a `(row, col)` cell address.
//! - `Grid`: the `rows x cols` board with bounds-checked access and all match
//!   mechanics (run detection, clearing, gravity, refill).
//! - `MatchSet` / `Run`: the result of one detection pass.
//!
//! Row 0 is the top of the board; gravity pulls tokens toward the last row.
use std::fmt;

use crate::error::{EngineError, EngineResult};
use crate::random::RandomSource;

/// Shortest run that counts as a match.
pub const MIN_RUN: usize = 3;

/// Draws tried per cell before a match-free board falls back to the smallest
/// non-conflicting token.
const MAX_REDRAWS: u32 = 16;

/// Content of a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    /// Cleared cell awaiting gravity and refill.
    Empty,
    /// A token of the given type, `0..token_types`.
    Filled(u8),
}

impl Token {
    pub fn is_empty(&self) -> bool {
        matches!(self, Token::Empty)
    }

    /// Returns the token type, or `None` for an empty cell.
    pub fn kind(&self) -> Option<u8> {
        match self {
            Token::Empty => None,
            Token::Filled(t) => Some(*t),
        }
    }

    /// Converts the token to its character representation.
    ///
    /// Types `0..=9` map to digits, `10..=35` to lowercase letters and an
    /// empty cell to `'.'`.
    ///
    /// # Examples
    ///
    /// ```
    /// use match3_engine::engine::Token;
    /// assert_eq!(Token::Filled(3).to_char(), '3');
    /// assert_eq!(Token::Filled(10).to_char(), 'a');
    /// assert_eq!(Token::Empty.to_char(), '.');
    /// ```
    pub fn to_char(&self) -> char {
        match self {
            Token::Empty => '.',
            Token::Filled(t) => std::char::from_digit(u32::from(*t), 36).unwrap_or('?'),
        }
    }

    /// Parses the character representation produced by [`Token::to_char`].
    /// Uppercase letters are accepted as well.
    pub fn from_char(ch: char) -> Option<Token> {
        if ch == '.' {
            return Some(Token::Empty);
        }
        ch.to_digit(36).map(|d| Token::Filled(d as u8))
    }

    /// Returns the ANSI background color code string for terminal output.
    fn to_ansi_color_code(&self) -> &'static str {
        const PALETTE: [&str; 12] = [
            "41", "42", "43", "44", "45", "46", "101", "102", "103", "104", "105", "106",
        ];
        match self {
            Token::Empty => "40",
            Token::Filled(t) => PALETTE[usize::from(*t) % PALETTE.len()],
        }
    }
}

/// A cell address. Row 0 is the top row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Position { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Returns `true` iff `a` and `b` differ by exactly 1 along exactly one axis.
///
/// # Examples
/// ```
/// use match3_engine::engine::{is_adjacent, Position};
/// assert!(is_adjacent(Position::new(2, 3), Position::new(2, 4)));
/// assert!(!is_adjacent(Position::new(2, 3), Position::new(3, 4)));
/// assert!(!is_adjacent(Position::new(2, 3), Position::new(2, 3)));
/// ```
pub fn is_adjacent(a: Position, b: Position) -> bool {
    a.row.abs_diff(b.row) + a.col.abs_diff(b.col) == 1
}

/// Points awarded for a single qualifying run.
///
/// The table is a step function: 3 tiles give 30, 4 give 60 and anything from
/// 5 up gives 100. Shorter runs never qualify and score nothing.
pub fn score_for_run(len: usize) -> u32 {
    match len {
        0..=2 => 0,
        3 => 30,
        4 => 60,
        _ => 100,
    }
}

/// Direction of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A maximal line of identical tokens, at least [`MIN_RUN`] long.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Run {
    /// Leftmost (horizontal) or topmost (vertical) cell.
    pub start: Position,
    pub len: usize,
    pub axis: Axis,
    pub token: u8,
}

impl Run {
    pub fn score(&self) -> u32 {
        score_for_run(self.len)
    }

    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.len).map(move |k| match self.axis {
            Axis::Horizontal => Position::new(self.start.row, self.start.col + k),
            Axis::Vertical => Position::new(self.start.row + k, self.start.col),
        })
    }
}

/// Cells marked by one detection pass, with the runs that marked them.
///
/// A cell belonging to both a horizontal and a vertical run is marked once but
/// both runs are kept, so both are scored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchSet {
    rows: usize,
    cols: usize,
    mask: Vec<bool>,
    runs: Vec<Run>,
}

impl MatchSet {
    fn new(rows: usize, cols: usize) -> Self {
        MatchSet {
            rows,
            cols,
            mask: vec![false; rows * cols],
            runs: Vec::new(),
        }
    }

    fn mark(&mut self, run: Run) {
        for pos in run.cells() {
            self.mask[pos.row * self.cols + pos.col] = true;
        }
        self.runs.push(run);
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Whether `pos` is marked. Positions outside the grid are never marked.
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols && self.mask[pos.row * self.cols + pos.col]
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Number of distinct marked cells.
    pub fn matched_count(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }

    /// Marked cells in row-major order.
    pub fn positions(&self) -> Vec<Position> {
        self.mask
            .iter()
            .enumerate()
            .filter(|(_, m)| **m)
            .map(|(i, _)| Position::new(i / self.cols, i % self.cols))
            .collect()
    }

    /// Sum of [`score_for_run`] over every run in the pass.
    pub fn score(&self) -> u32 {
        self.runs.iter().map(Run::score).sum()
    }
}

/// The game board: a `rows x cols` matrix of [`Token`]s stored row-major.
///
/// Dimensions never change after construction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Token>,
}

impl Grid {
    /// Creates a grid where every cell is `Token::Empty`.
    ///
    /// # Examples
    /// ```
    /// use match3_engine::engine::{Grid, Position, Token};
    /// let grid = Grid::new(8, 10);
    /// assert_eq!(grid.get(Position::new(0, 0)).unwrap(), Token::Empty);
    /// assert_eq!(grid.count_empty(), 80);
    /// ```
    pub fn new(rows: usize, cols: usize) -> Self {
        Grid {
            rows,
            cols,
            cells: vec![Token::Empty; rows * cols],
        }
    }

    /// Builds a grid from explicit rows, top row first.
    ///
    /// # Errors
    /// Returns [`EngineError::Layout`] if there are no rows, a row is empty, or
    /// the rows differ in length.
    pub fn from_rows(rows: Vec<Vec<Token>>) -> EngineResult<Self> {
        let cols = match rows.first() {
            Some(first) if !first.is_empty() => first.len(),
            _ => return Err(EngineError::Layout("grid has no cells".to_string())),
        };
        if let Some((r, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != cols) {
            return Err(EngineError::Layout(format!(
                "row {} has {} cells, expected {}",
                r,
                row.len(),
                cols
            )));
        }
        Ok(Grid {
            rows: rows.len(),
            cols,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Creates a grid where every cell holds a random token.
    ///
    /// With `match_free`, a draw that would complete a run with its two left or
    /// two upper neighbours is redrawn, so the board starts without matches.
    /// A source that keeps repeating conflicting values is overridden after a
    /// few attempts by the smallest token type that fits.
    ///
    /// # Panics
    /// Panics if `token_types` is zero.
    pub fn new_random(
        rows: usize,
        cols: usize,
        token_types: u8,
        match_free: bool,
        rng: &mut impl RandomSource,
    ) -> Self {
        assert!(token_types > 0, "token_types must be positive");
        let mut grid = Grid::new(rows, cols);
        for r in 0..rows {
            for c in 0..cols {
                let mut token = rng.next_token(token_types);
                let mut attempts = 1;
                while match_free && grid.completes_run(r, c, token) {
                    if attempts >= MAX_REDRAWS {
                        token = (0..token_types)
                            .find(|&t| !grid.completes_run(r, c, t))
                            .unwrap_or(token);
                        break;
                    }
                    token = rng.next_token(token_types);
                    attempts += 1;
                }
                grid.cells[r * cols + c] = Token::Filled(token);
            }
        }
        grid
    }

    /// Whether placing `token` at `(r, c)` completes a run with the two cells
    /// to its left or the two cells above it.
    fn completes_run(&self, r: usize, c: usize, token: u8) -> bool {
        let t = Token::Filled(token);
        (c >= 2 && self.at(r, c - 1) == t && self.at(r, c - 2) == t)
            || (r >= 2 && self.at(r - 1, c) == t && self.at(r - 2, c) == t)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    fn index(&self, pos: Position) -> EngineResult<usize> {
        if self.contains(pos) {
            Ok(pos.row * self.cols + pos.col)
        } else {
            Err(EngineError::OutOfBounds {
                row: pos.row,
                col: pos.col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    #[inline]
    fn at(&self, r: usize, c: usize) -> Token {
        self.cells[r * self.cols + c]
    }

    /// Returns the token at `pos`.
    ///
    /// # Errors
    /// Returns [`EngineError::OutOfBounds`] if `pos` is outside the grid.
    pub fn get(&self, pos: Position) -> EngineResult<Token> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Overwrites the token at `pos`.
    ///
    /// # Errors
    /// Returns [`EngineError::OutOfBounds`] if `pos` is outside the grid.
    pub fn set(&mut self, pos: Position, token: Token) -> EngineResult<()> {
        let i = self.index(pos)?;
        self.cells[i] = token;
        Ok(())
    }

    /// Exchanges two cells. Adjacency is not checked here.
    ///
    /// # Errors
    /// Returns [`EngineError::OutOfBounds`] if either position is outside the
    /// grid; the grid is left untouched in that case.
    pub fn swap(&mut self, a: Position, b: Position) -> EngineResult<()> {
        let i = self.index(a)?;
        let j = self.index(b)?;
        self.cells.swap(i, j);
        Ok(())
    }

    /// Row `r`, left to right.
    pub fn row(&self, r: usize) -> EngineResult<&[Token]> {
        let start = self.index(Position::new(r, 0))?;
        Ok(&self.cells[start..start + self.cols])
    }

    /// Column `c`, top to bottom.
    pub fn column(&self, c: usize) -> EngineResult<Vec<Token>> {
        self.index(Position::new(0, c))?;
        Ok((0..self.rows).map(|r| self.at(r, c)).collect())
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|t| t.is_empty()).count()
    }

    /// Generates a string representation of the grid with an optional
    /// highlighted cell.
    ///
    /// The output includes row and column numbers and uses ANSI escape codes
    /// for token colors. The highlighted cell is wrapped in `>`.
    pub fn to_string_with_highlight(&self, pos: Option<Position>) -> String {
        let mut output = String::new();

        output.push_str("   ");
        for c_idx in 0..self.cols {
            output.push_str(&format!("{:<3}", c_idx));
        }
        output.push('\n');

        for r_idx in 0..self.rows {
            output.push_str(&format!("{:<3}", r_idx));
            for c_idx in 0..self.cols {
                let token = self.at(r_idx, c_idx);
                let is_highlight = pos.map_or(false, |p| p.row == r_idx && p.col == c_idx);
                let marker = if is_highlight { '>' } else { ' ' };
                output.push_str(&format!(
                    "\x1b[1;{}m{}{} \x1b[m",
                    token.to_ansi_color_code(),
                    marker,
                    token.to_char()
                ));
            }
            if r_idx + 1 < self.rows {
                output.push('\n');
            }
        }

        output
    }

    /// Finds every qualifying run on the board.
    ///
    /// Rows are scanned left to right and columns top to bottom; the two scans
    /// are independent and their marks are unioned. Empty cells never take
    /// part in a run.
    ///
    /// # Examples
    /// ```
    /// use match3_engine::utils::grid_from_str_array;
    /// let grid = grid_from_str_array(&["11122", "34343", "43434"]).unwrap();
    /// let matches = grid.detect_matches();
    /// assert_eq!(matches.matched_count(), 3);
    /// assert_eq!(matches.score(), 30);
    /// ```
    pub fn detect_matches(&self) -> MatchSet {
        let mut matches = MatchSet::new(self.rows, self.cols);
        self.scan_rows(&mut matches);
        self.scan_columns(&mut matches);
        matches
    }

    fn scan_rows(&self, matches: &mut MatchSet) {
        for r in 0..self.rows {
            let mut run_start = 0;
            for c in 1..=self.cols {
                let head = self.at(r, run_start);
                if c < self.cols && !head.is_empty() && self.at(r, c) == head {
                    continue;
                }
                let len = c - run_start;
                if len >= MIN_RUN {
                    if let Some(token) = head.kind() {
                        matches.mark(Run {
                            start: Position::new(r, run_start),
                            len,
                            axis: Axis::Horizontal,
                            token,
                        });
                    }
                }
                run_start = c;
            }
        }
    }

    fn scan_columns(&self, matches: &mut MatchSet) {
        for c in 0..self.cols {
            let mut run_start = 0;
            for r in 1..=self.rows {
                let head = self.at(run_start, c);
                if r < self.rows && !head.is_empty() && self.at(r, c) == head {
                    continue;
                }
                let len = r - run_start;
                if len >= MIN_RUN {
                    if let Some(token) = head.kind() {
                        matches.mark(Run {
                            start: Position::new(run_start, c),
                            len,
                            axis: Axis::Vertical,
                            token,
                        });
                    }
                }
                run_start = r;
            }
        }
    }

    /// Sets every marked cell to `Token::Empty` and returns how many cells
    /// were cleared.
    pub fn clear(&mut self, matches: &MatchSet) -> usize {
        let mut cleared = 0;
        for (cell, &marked) in self.cells.iter_mut().zip(&matches.mask) {
            if marked {
                *cell = Token::Empty;
                cleared += 1;
            }
        }
        cleared
    }

    /// Applies gravity to column `c`.
    ///
    /// Non-empty tokens are packed toward the bottom row, keeping their
    /// relative order; the freed cells at the top become empty. Returns the
    /// number of empty cells left at the top of the column.
    pub fn compact_column(&mut self, c: usize) -> EngineResult<usize> {
        self.index(Position::new(0, c))?;
        let mut write_row = self.rows; // one past the next slot to fill
        for r in (0..self.rows).rev() {
            let token = self.at(r, c);
            if !token.is_empty() {
                write_row -= 1;
                if write_row != r {
                    self.cells[write_row * self.cols + c] = token;
                    self.cells[r * self.cols + c] = Token::Empty;
                }
            }
        }
        Ok(write_row)
    }

    /// Fills the empty cells of column `c` with fresh draws, bottom-most empty
    /// cell first.
    pub fn refill_column(
        &mut self,
        c: usize,
        token_types: u8,
        rng: &mut impl RandomSource,
    ) -> EngineResult<()> {
        self.index(Position::new(0, c))?;
        for r in (0..self.rows).rev() {
            let i = r * self.cols + c;
            if self.cells[i].is_empty() {
                self.cells[i] = Token::Filled(rng.next_token(token_types));
            }
        }
        Ok(())
    }

    /// Gravity followed by refill on a single column.
    pub fn compact_and_refill(
        &mut self,
        c: usize,
        token_types: u8,
        rng: &mut impl RandomSource,
    ) -> EngineResult<()> {
        self.compact_column(c)?;
        self.refill_column(c, token_types, rng)
    }

    /// Applies [`Grid::compact_and_refill`] to every column, left to right.
    pub fn compact_and_refill_all(&mut self, token_types: u8, rng: &mut impl RandomSource) {
        for c in 0..self.cols {
            // `c` is always in range here.
            let _ = self.compact_and_refill(c, token_types, &mut *rng);
        }
    }

    /// Every adjacent pair whose swap would produce at least one match.
    ///
    /// Pairs are listed as `(cell, right or lower neighbour)` in row-major
    /// order of the first cell, right neighbour before lower neighbour.
    pub fn find_valid_swaps(&self) -> Vec<(Position, Position)> {
        let mut probe = self.clone();
        let mut swaps = Vec::new();
        for r in 0..self.rows {
            for c in 0..self.cols {
                let a = Position::new(r, c);
                let neighbours = [Position::new(r, c + 1), Position::new(r + 1, c)];
                for b in neighbours {
                    if !self.contains(b) || self.at(r, c) == self.at(b.row, b.col) {
                        continue;
                    }
                    let (i, j) = (r * self.cols + c, b.row * self.cols + b.col);
                    probe.cells.swap(i, j);
                    if !probe.detect_matches().is_empty() {
                        swaps.push((a, b));
                    }
                    probe.cells.swap(i, j);
                }
            }
        }
        swaps
    }
}

impl fmt::Display for Grid {
    /// Formats the grid using `to_string_with_highlight(None)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with_highlight(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ScriptedRandom, SeededRandom};
    use crate::utils::grid_from_str_array;

    /// 8x10 board without matches where swapping (6,2) and (7,2) completes
    /// `444` at the start of the bottom row.
    const SETUP_ROWS: [&str; 8] = [
        "0123012301",
        "2301230123",
        "0123012301",
        "2301230123",
        "0123012301",
        "2301230123",
        "0143012301",
        "4401230123",
    ];

    fn setup_grid() -> Grid {
        grid_from_str_array(&SETUP_ROWS).unwrap()
    }

    #[test]
    fn test_new_empty_grid() {
        let grid = Grid::new(8, 10);
        assert_eq!(grid.rows(), 8);
        assert_eq!(grid.cols(), 10);
        assert_eq!(grid.count_empty(), 80);
    }

    #[test]
    fn test_from_rows_rejects_ragged_input() {
        let rows = vec![vec![Token::Filled(0); 3], vec![Token::Filled(1); 2]];
        let err = Grid::from_rows(rows).unwrap_err();
        assert!(err.to_string().contains("row 1 has 2 cells"));
        assert!(Grid::from_rows(Vec::new()).is_err());
        assert!(Grid::from_rows(vec![Vec::new()]).is_err());
    }

    #[test]
    fn test_get_set_bounds() {
        let mut grid = Grid::new(8, 10);
        grid.set(Position::new(7, 9), Token::Filled(2)).unwrap();
        assert_eq!(grid.get(Position::new(7, 9)).unwrap(), Token::Filled(2));

        assert_eq!(
            grid.get(Position::new(8, 0)),
            Err(EngineError::OutOfBounds {
                row: 8,
                col: 0,
                rows: 8,
                cols: 10
            })
        );
        assert!(grid.set(Position::new(0, 10), Token::Filled(0)).is_err());
    }

    #[test]
    fn test_swap_is_an_involution() {
        let original = setup_grid();
        let mut grid = original.clone();
        let a = Position::new(0, 0);
        let b = Position::new(3, 4);
        grid.swap(a, b).unwrap();
        assert_eq!(grid.get(a).unwrap(), original.get(b).unwrap());
        assert_eq!(grid.get(b).unwrap(), original.get(a).unwrap());
        grid.swap(a, b).unwrap();
        assert_eq!(grid, original);
    }

    #[test]
    fn test_swap_out_of_bounds_leaves_grid_untouched() {
        let original = setup_grid();
        let mut grid = original.clone();
        assert!(grid.swap(Position::new(0, 0), Position::new(0, 10)).is_err());
        assert_eq!(grid, original);
    }

    #[test]
    fn test_is_adjacent() {
        let p = Position::new(3, 3);
        assert!(is_adjacent(p, Position::new(2, 3)));
        assert!(is_adjacent(p, Position::new(4, 3)));
        assert!(is_adjacent(p, Position::new(3, 2)));
        assert!(is_adjacent(p, Position::new(3, 4)));
        assert!(!is_adjacent(p, p));
        assert!(!is_adjacent(p, Position::new(4, 4)));
        assert!(!is_adjacent(p, Position::new(3, 5)));
        assert!(!is_adjacent(Position::new(0, 0), Position::new(0, 2)));
    }

    #[test]
    fn test_score_thresholds() {
        assert_eq!(score_for_run(2), 0);
        assert_eq!(score_for_run(3), 30);
        assert_eq!(score_for_run(4), 60);
        assert_eq!(score_for_run(5), 100);
        assert_eq!(score_for_run(6), 100);
    }

    #[test]
    fn test_detect_run_of_three_ignores_pair() {
        let grid = grid_from_str_array(&["11122", "34343", "43434"]).unwrap();
        let matches = grid.detect_matches();
        assert_eq!(
            matches.positions(),
            vec![Position::new(0, 0), Position::new(0, 1), Position::new(0, 2)]
        );
        assert!(!matches.contains(Position::new(0, 3)));
        assert!(!matches.contains(Position::new(0, 4)));
        assert_eq!(matches.runs().len(), 1);
        assert_eq!(matches.score(), 30);
    }

    #[test]
    fn test_detect_runs_of_four_and_five() {
        let grid = grid_from_str_array(&["1111232", "2323232", "5555545"]).unwrap();
        let matches = grid.detect_matches();
        let lens: Vec<usize> = matches.runs().iter().map(|r| r.len).collect();
        assert_eq!(lens, vec![4, 5]);
        assert_eq!(matches.score(), 60 + 100);
        assert_eq!(matches.matched_count(), 9);
    }

    #[test]
    fn test_detect_vertical_run_at_bottom_edge() {
        let grid = grid_from_str_array(&["021", "210", "012", "210", "213"]).unwrap();
        let matches = grid.detect_matches();
        assert_eq!(matches.runs().len(), 1);
        let run = matches.runs()[0];
        assert_eq!(run.axis, Axis::Vertical);
        assert_eq!(run.start, Position::new(1, 1));
        assert_eq!(run.len, 4);
        assert_eq!(run.token, 1);
    }

    #[test]
    fn test_detect_crossing_runs_score_both() {
        let grid = grid_from_str_array(&["111", "123", "145"]).unwrap();
        let matches = grid.detect_matches();
        assert_eq!(matches.runs().len(), 2);
        assert_eq!(matches.matched_count(), 5);
        assert_eq!(matches.score(), 60);
    }

    #[test]
    fn test_detect_ignores_empty_runs() {
        let grid = grid_from_str_array(&["...", "012", "120"]).unwrap();
        assert!(grid.detect_matches().is_empty());
    }

    #[test]
    fn test_detect_is_scan_order_independent() {
        let grid = grid_from_str_array(&["11122", "13343", "13434", "22234"]).unwrap();
        let rows_first = grid.detect_matches();

        let mut columns_first = MatchSet::new(grid.rows(), grid.cols());
        grid.scan_columns(&mut columns_first);
        grid.scan_rows(&mut columns_first);

        assert_eq!(rows_first.positions(), columns_first.positions());
        assert_eq!(rows_first.score(), columns_first.score());
    }

    #[test]
    fn test_clear_marks_empty() {
        let mut grid = grid_from_str_array(&["11122", "34343", "43434"]).unwrap();
        let matches = grid.detect_matches();
        assert_eq!(grid.clear(&matches), 3);
        assert_eq!(grid.row(0).unwrap()[..3], [Token::Empty; 3]);
        assert_eq!(grid.get(Position::new(0, 3)).unwrap(), Token::Filled(2));
        assert_eq!(grid.count_empty(), 3);
    }

    #[test]
    fn test_compact_column_preserves_order() {
        let mut grid = grid_from_str_array(&[".", "1", ".", "2", "."]).unwrap();
        let empties = grid.compact_column(0).unwrap();
        assert_eq!(empties, 3);
        assert_eq!(
            grid.column(0).unwrap(),
            vec![
                Token::Empty,
                Token::Empty,
                Token::Empty,
                Token::Filled(1),
                Token::Filled(2)
            ]
        );
    }

    #[test]
    fn test_compact_and_refill_draws_bottom_first() {
        let mut grid = grid_from_str_array(&[".", "1", ".", "2", "."]).unwrap();
        let mut rng = ScriptedRandom::new(vec![5, 4, 3]);
        grid.compact_and_refill(0, 6, &mut rng).unwrap();
        assert_eq!(
            grid.column(0).unwrap(),
            vec![
                Token::Filled(3),
                Token::Filled(4),
                Token::Filled(5),
                Token::Filled(1),
                Token::Filled(2)
            ]
        );
        assert_eq!(rng.drawn(), 3);
    }

    #[test]
    fn test_compact_full_column_is_noop() {
        let mut grid = setup_grid();
        let before = grid.column(4).unwrap();
        assert_eq!(grid.compact_column(4).unwrap(), 0);
        assert_eq!(grid.column(4).unwrap(), before);
        assert!(grid.compact_column(10).is_err());
    }

    #[test]
    fn test_compact_and_refill_all_leaves_no_empty() {
        let mut grid = grid_from_str_array(&["0.2", "1.0", "..1"]).unwrap();
        let mut rng = SeededRandom::new(3);
        grid.compact_and_refill_all(6, &mut rng);
        assert_eq!(grid.count_empty(), 0);
        assert_eq!(grid.get(Position::new(2, 0)).unwrap(), Token::Filled(1));
        assert_eq!(grid.get(Position::new(1, 0)).unwrap(), Token::Filled(0));
        assert_eq!(grid.get(Position::new(2, 2)).unwrap(), Token::Filled(1));
        assert_eq!(grid.get(Position::new(1, 2)).unwrap(), Token::Filled(0));
        assert_eq!(grid.get(Position::new(0, 2)).unwrap(), Token::Filled(2));
    }

    #[test]
    fn test_new_random_is_match_free() {
        for seed in 0..50 {
            let mut rng = SeededRandom::new(seed);
            let grid = Grid::new_random(8, 10, 6, true, &mut rng);
            assert_eq!(grid.count_empty(), 0);
            assert!(
                grid.detect_matches().is_empty(),
                "seed {} produced an initial match",
                seed
            );
        }
    }

    #[test]
    fn test_new_random_with_small_palette() {
        let mut rng = SeededRandom::new(11);
        let grid = Grid::new_random(12, 12, 3, true, &mut rng);
        assert!(grid.detect_matches().is_empty());
    }

    #[test]
    fn test_new_random_falls_back_on_stuck_source() {
        let mut rng = ScriptedRandom::new(vec![0]);
        let grid = Grid::new_random(5, 5, 3, true, &mut rng);
        assert!(grid.detect_matches().is_empty());
        assert_eq!(grid.get(Position::new(0, 2)).unwrap(), Token::Filled(1));
    }

    #[test]
    fn test_new_random_without_filter_keeps_draws() {
        let mut rng = ScriptedRandom::new(vec![0]);
        let grid = Grid::new_random(3, 3, 6, false, &mut rng);
        assert_eq!(grid.detect_matches().matched_count(), 9);
    }

    #[test]
    fn test_new_random_determinism() {
        let a = Grid::new_random(8, 10, 6, true, &mut SeededRandom::new(123));
        let b = Grid::new_random(8, 10, 6, true, &mut SeededRandom::new(123));
        let c = Grid::new_random(8, 10, 6, true, &mut SeededRandom::new(124));
        assert_eq!(a, b, "Boards with the same seed must be identical.");
        assert_ne!(a, c, "Boards with different seeds should differ.");
    }

    #[test]
    fn test_find_valid_swaps() {
        let grid = setup_grid();
        assert!(grid.detect_matches().is_empty());
        let swaps = grid.find_valid_swaps();
        assert!(swaps.contains(&(Position::new(6, 2), Position::new(7, 2))));
        for (a, b) in swaps {
            assert!(is_adjacent(a, b));
            let mut probe = grid.clone();
            probe.swap(a, b).unwrap();
            assert!(!probe.detect_matches().is_empty());
        }
    }

    #[test]
    fn test_find_valid_swaps_none() {
        let grid = grid_from_str_array(&["012", "345", "678"]).unwrap();
        assert!(grid.find_valid_swaps().is_empty());
    }

    #[test]
    fn test_token_chars() {
        assert_eq!(Token::Empty.to_char(), '.');
        assert_eq!(Token::Filled(0).to_char(), '0');
        assert_eq!(Token::Filled(35).to_char(), 'z');
        assert_eq!(Token::from_char('.'), Some(Token::Empty));
        assert_eq!(Token::from_char('7'), Some(Token::Filled(7)));
        assert_eq!(Token::from_char('B'), Some(Token::Filled(11)));
        assert_eq!(Token::from_char('#'), None);
    }

    #[test]
    fn test_display_grid_formatting() {
        let grid = grid_from_str_array(&["01", "2."]).unwrap();
        let display_str = format!("{}", grid);
        let lines: Vec<&str> = display_str.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("   0  1"));
        assert!(lines[1].contains("\x1b[1;41m 0 \x1b[m"));
        assert!(lines[2].contains("\x1b[1;40m . \x1b[m"));

        let highlighted = grid.to_string_with_highlight(Some(Position::new(1, 0)));
        assert!(highlighted.contains("\x1b[1;43m>2 \x1b[m"));
    }
}
