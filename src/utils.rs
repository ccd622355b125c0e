use crate::engine::{Grid, Token};
use crate::error::{EngineError, EngineResult};

/// Parses an array of string slices into a `Grid`.
///
/// Each string slice in the input array represents a row on the grid, starting
/// from row 0 (the top). All rows must have the same number of characters,
/// which becomes the column count.
///
/// Valid characters for cells are:
/// - `'0'..='9'`: token types 0 to 9
/// - `'a'..='z'` (or uppercase): token types 10 to 35
/// - `'.'`: `Token::Empty`
///
/// # Errors
/// Returns [`EngineError::Layout`] if:
/// - no rows are given or the first row is empty,
/// - a row's length differs from the first row's,
/// - an unrecognized character is encountered.
///
/// # Examples
/// ```
/// use match3_engine::utils::grid_from_str_array;
/// use match3_engine::engine::{Position, Token};
///
/// let grid = grid_from_str_array(&[
///     "012", // Row 0
///     "3.5", // Row 1
/// ])
/// .unwrap();
/// assert_eq!(grid.rows(), 2);
/// assert_eq!(grid.cols(), 3);
/// assert_eq!(grid.get(Position::new(0, 1)).unwrap(), Token::Filled(1));
/// assert_eq!(grid.get(Position::new(1, 1)).unwrap(), Token::Empty);
///
/// assert!(grid_from_str_array(&["0#2"]).is_err());
/// assert!(grid_from_str_array(&["012", "01"]).is_err());
/// ```
pub fn grid_from_str_array(s: &[&str]) -> EngineResult<Grid> {
    let mut rows = Vec::with_capacity(s.len());
    for (r, row_str) in s.iter().enumerate() {
        let row = row_str
            .chars()
            .enumerate()
            .map(|(c, ch)| {
                Token::from_char(ch).ok_or_else(|| {
                    EngineError::Layout(format!(
                        "unrecognized character '{}' in row {} col {}",
                        ch, r, c
                    ))
                })
            })
            .collect::<EngineResult<Vec<Token>>>()?;
        rows.push(row);
    }
    Grid::from_rows(rows)
}

/// Renders a grid back into the row strings accepted by
/// [`grid_from_str_array`].
pub fn grid_to_str_rows(grid: &Grid) -> Vec<String> {
    (0..grid.rows())
        .map(|r| {
            grid.row(r)
                .map(|row| row.iter().map(Token::to_char).collect())
                .unwrap_or_default()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Position;

    #[test]
    fn test_grid_from_str_array_valid() {
        let grid_str = [
            "0123450123",
            "..........",
            "abcdefABCD",
        ];
        let grid = grid_from_str_array(&grid_str).unwrap();
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 10);
        assert_eq!(grid.get(Position::new(0, 5)).unwrap(), Token::Filled(5));
        assert_eq!(grid.get(Position::new(1, 0)).unwrap(), Token::Empty);
        assert_eq!(grid.get(Position::new(2, 0)).unwrap(), Token::Filled(10));
        assert_eq!(grid.get(Position::new(2, 9)).unwrap(), Token::Filled(13));
    }

    #[test]
    fn test_grid_from_str_array_invalid_char() {
        let result = grid_from_str_array(&["0123X#"]);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("unrecognized character '#' in row 0 col 5"));
    }

    #[test]
    fn test_grid_from_str_array_with_spaces() {
        let result = grid_from_str_array(&["0 1 2"]);
        assert!(result.unwrap_err().to_string().contains("character ' '"));
    }

    #[test]
    fn test_grid_from_str_array_ragged_rows() {
        let result = grid_from_str_array(&["0123", "012"]);
        assert!(result.unwrap_err().to_string().contains("row 1 has 3 cells"));
    }

    #[test]
    fn test_grid_from_str_array_empty_input() {
        let grid_str: [&str; 0] = [];
        assert!(grid_from_str_array(&grid_str).is_err());
        assert!(grid_from_str_array(&[""]).is_err());
    }

    #[test]
    fn test_grid_to_str_rows_round_trip() {
        let rows = ["01.", "z9a"];
        let grid = grid_from_str_array(&rows).unwrap();
        assert_eq!(grid_to_str_rows(&grid), vec!["01.", "z9a"]);
    }
}
