//! `grid` — the cell matrix the solver fills.
//!
//! A grid is a rectangular matrix of tagged cells. The textual encoding
//! (`#` = block, `A`–`Z` = pre-filled letter, a decimal integer = number
//! label, `.` or empty = open cell) is converted at this boundary only;
//! everything downstream works on the `Cell` enum.

use std::collections::BTreeMap;
use std::fmt;

use crate::errors::SolveError;

/// One cell of the puzzle grid.
///
/// A `Number` cell is also a letter cell: the label marks where a slot
/// starts, and the cell itself still receives a letter from whichever word
/// covers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Blocked-out square; never part of any slot.
    Block,
    /// Slot-start label (positive, unique, assigned in reading order by the
    /// editor — we accept what we see and only warn on violations).
    Number(u32),
    /// A fixed letter any covering word must match.
    Letter(u8),
    /// An ordinary open cell.
    Empty,
}

impl Cell {
    /// Parse one textual token into a cell.
    ///
    /// Accepts `#`, `.`, the empty string (or whitespace), a single `A`–`Z`,
    /// or a decimal integer. Anything else is an `InvalidGrid` error.
    pub fn from_token(token: &str) -> Result<Cell, SolveError> {
        let t = token.trim();
        match t {
            "#" => Ok(Cell::Block),
            "" | "." => Ok(Cell::Empty),
            _ => {
                let mut chars = t.chars();
                if let (Some(c), None) = (chars.next(), chars.next()) {
                    if c.is_ascii_uppercase() {
                        return Ok(Cell::Letter(c as u8));
                    }
                }
                t.parse::<u32>()
                    .ok()
                    .filter(|&n| n > 0)
                    .map(Cell::Number)
                    .ok_or_else(|| {
                        SolveError::bad_grid(format!("unrecognized cell token \"{t}\""))
                    })
            }
        }
    }

    pub fn is_block(self) -> bool {
        matches!(self, Cell::Block)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Block => write!(f, "#"),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Letter(b) => write!(f, "{}", *b as char),
            Cell::Empty => write!(f, "."),
        }
    }
}

/// A validated rectangular grid.
///
/// Construction rejects empty or ragged matrices; after that, all accessors
/// are infallible for in-bounds coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a grid from a row-major matrix of cells.
    ///
    /// # Errors
    ///
    /// `InvalidGrid` if the matrix is empty, has an empty first row, or its
    /// rows have differing lengths.
    pub fn new(matrix: Vec<Vec<Cell>>) -> Result<Grid, SolveError> {
        if matrix.is_empty() {
            return Err(SolveError::bad_grid("empty matrix"));
        }
        let cols = matrix[0].len();
        if cols == 0 {
            return Err(SolveError::bad_grid("rows are empty"));
        }
        let rows = matrix.len();
        let mut cells = Vec::with_capacity(rows * cols);
        for (r, row) in matrix.into_iter().enumerate() {
            if row.len() != cols {
                return Err(SolveError::bad_grid(format!(
                    "row {r} has {} cells, expected {cols}",
                    row.len()
                )));
            }
            cells.extend(row);
        }
        Ok(Grid { rows, cols, cells })
    }

    /// Parse the textual grid format: one row per line, cells separated by
    /// commas so multi-digit number labels stay unambiguous.
    ///
    /// ```text
    /// 1,.,.
    /// .,#,.
    /// .,.,#
    /// ```
    ///
    /// Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// `InvalidGrid` on unrecognized tokens or a non-rectangular result.
    pub fn parse(text: &str) -> Result<Grid, SolveError> {
        let matrix = text
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.split(',').map(Cell::from_token).collect::<Result<Vec<_>, _>>())
            .collect::<Result<Vec<_>, _>>()?;
        Grid::new(matrix)
    }

    /// Parse a matrix of per-cell tokens (the shape the web editor exports).
    ///
    /// # Errors
    ///
    /// Same conditions as [`Grid::parse`].
    pub fn from_tokens<S: AsRef<str>>(matrix: &[Vec<S>]) -> Result<Grid, SolveError> {
        let cells = matrix
            .iter()
            .map(|row| row.iter().map(|t| Cell::from_token(t.as_ref())).collect::<Result<Vec<_>, _>>())
            .collect::<Result<Vec<_>, _>>()?;
        Grid::new(cells)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell at `(r, c)`. Panics if out of bounds; callers iterate within
    /// `rows() × cols()`.
    pub fn get(&self, r: usize, c: usize) -> Cell {
        self.cells[r * self.cols + c]
    }

    /// True for in-bounds non-block cells, false at and beyond the boundary.
    pub(crate) fn is_open(&self, r: usize, c: usize) -> bool {
        r < self.rows && c < self.cols && !self.get(r, c).is_block()
    }

    /// Every fixed letter in the grid, keyed by position.
    ///
    /// A `BTreeMap` keeps downstream iteration in reading order, which keeps
    /// the whole pipeline deterministic.
    pub fn prefilled(&self) -> BTreeMap<(usize, usize), u8> {
        let mut fixed = BTreeMap::new();
        for r in 0..self.rows {
            for c in 0..self.cols {
                if let Cell::Letter(b) = self.get(r, c) {
                    fixed.insert((r, c), b);
                }
            }
        }
        fixed
    }

    /// Copy of the grid with `letter` fixed at `(r, c)`. Used when writing a
    /// solution back so it can be re-solved with the letters as constraints.
    pub fn with_letter(&self, r: usize, c: usize, letter: u8) -> Grid {
        let mut next = self.clone();
        next.cells[r * self.cols + c] = Cell::Letter(letter);
        next
    }

    /// Rows rendered in the textual encoding, comma-separated.
    pub fn to_token_rows(&self) -> Vec<Vec<String>> {
        (0..self.rows)
            .map(|r| (0..self.cols).map(|c| self.get(r, c).to_string()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tokens() {
        assert_eq!(Cell::from_token("#").unwrap(), Cell::Block);
        assert_eq!(Cell::from_token(".").unwrap(), Cell::Empty);
        assert_eq!(Cell::from_token("").unwrap(), Cell::Empty);
        assert_eq!(Cell::from_token(" ").unwrap(), Cell::Empty);
        assert_eq!(Cell::from_token("Q").unwrap(), Cell::Letter(b'Q'));
        assert_eq!(Cell::from_token("7").unwrap(), Cell::Number(7));
        assert_eq!(Cell::from_token("12").unwrap(), Cell::Number(12));
    }

    #[test]
    fn rejects_bad_tokens() {
        for bad in ["q", "AB", "0", "-3", "@", "1.5"] {
            assert!(
                matches!(Cell::from_token(bad), Err(SolveError::InvalidGrid { .. })),
                "token {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn parses_rectangular_grid() {
        let g = Grid::parse("1,.,.\n.,#,.\n.,.,#").unwrap();
        assert_eq!(g.rows(), 3);
        assert_eq!(g.cols(), 3);
        assert_eq!(g.get(0, 0), Cell::Number(1));
        assert_eq!(g.get(1, 1), Cell::Block);
        assert_eq!(g.get(2, 0), Cell::Empty);
    }

    #[test]
    fn rejects_empty_grid() {
        assert!(matches!(Grid::parse(""), Err(SolveError::InvalidGrid { .. })));
        assert!(matches!(Grid::new(vec![]), Err(SolveError::InvalidGrid { .. })));
    }

    #[test]
    fn rejects_ragged_grid() {
        let err = Grid::parse("1,.,.\n.,#").unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn collects_prefilled_letters() {
        let g = Grid::parse("1,A,.\n.,.,.\nZ,.,.").unwrap();
        let fixed = g.prefilled();
        assert_eq!(fixed.len(), 2);
        assert_eq!(fixed[&(0, 1)], b'A');
        assert_eq!(fixed[&(2, 0)], b'Z');
    }

    #[test]
    fn with_letter_fixes_a_cell() {
        let g = Grid::parse("1,.\n.,.").unwrap();
        let g2 = g.with_letter(1, 1, b'X');
        assert_eq!(g2.get(1, 1), Cell::Letter(b'X'));
        assert_eq!(g.get(1, 1), Cell::Empty);
    }
}
