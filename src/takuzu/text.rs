//! The grid text format.
//!
//! A grid file is `N` lines of `N` symbols from `{'0', '1', '_'}` separated
//! by single spaces, with `N` one of the supported sizes. Lines whose first
//! non-whitespace character is `#` are comments and ignored in full; blank
//! lines before the first grid row are skipped. The first grid row fixes
//! `N`: a later row with a different symbol count, a stray character, a
//! blank line inside the body, or a file that does not contain exactly `N`
//! rows all fail parsing.
//!
//! Printing is the mirror image (the `Display` impl on [`Grid`]), and
//! parsing a printed grid yields the grid back.

use crate::takuzu::cell::{Cell, Size};
use crate::takuzu::grid::Grid;
use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// The ways a grid file can fail to parse.
#[derive(Debug)]
pub enum ParseGridError {
    /// The underlying reader failed.
    Io(io::Error),
    /// The input held no grid rows at all.
    NoRows,
    /// The first row implied a side length outside `{4, 8, 16, 32, 64}`.
    InvalidSize(usize),
    /// A token other than `0`, `1` or `_` appeared.
    BadSymbol {
        /// 1-based line number in the input.
        line: usize,
        /// The offending token.
        symbol: String,
    },
    /// A row held the wrong number of symbols.
    ColumnMismatch {
        /// 1-based line number in the input.
        line: usize,
        /// Symbols implied by the first row.
        expected: usize,
        /// Symbols actually found.
        found: usize,
    },
    /// The file did not hold exactly `N` rows.
    RowMismatch {
        /// Rows implied by the first row's width.
        expected: usize,
        /// Rows actually found.
        found: usize,
    },
    /// A blank line appeared between grid rows.
    BlankLine {
        /// 1-based line number in the input.
        line: usize,
    },
}

impl fmt::Display for ParseGridError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read grid: {e}"),
            Self::NoRows => write!(f, "input contains no grid rows"),
            Self::InvalidSize(n) => {
                write!(f, "invalid grid size {n}: expected 4, 8, 16, 32 or 64")
            }
            Self::BadSymbol { line, symbol } => {
                write!(f, "line {line}: invalid symbol '{symbol}' (expected 0, 1 or _)")
            }
            Self::ColumnMismatch {
                line,
                expected,
                found,
            } => write!(f, "line {line}: expected {expected} symbols, found {found}"),
            Self::RowMismatch { expected, found } => {
                write!(f, "expected {expected} rows, found {found}")
            }
            Self::BlankLine { line } => {
                write!(f, "line {line}: blank line inside the grid body")
            }
        }
    }
}

impl Error for ParseGridError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ParseGridError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Parses a grid from any buffered reader.
///
/// # Errors
///
/// Any [`ParseGridError`] variant, as described on the type.
pub fn parse_grid<R: BufRead>(reader: R) -> Result<Grid, ParseGridError> {
    let mut rows: Vec<Vec<Cell>> = Vec::new();
    let mut width: Option<usize> = None;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let number = index + 1;
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            continue;
        }
        if trimmed.is_empty() {
            if rows.is_empty() {
                continue;
            }
            return Err(ParseGridError::BlankLine { line: number });
        }

        let cells = parse_row(&line, number)?;
        match width {
            None => {
                Size::try_from(cells.len())
                    .map_err(|()| ParseGridError::InvalidSize(cells.len()))?;
                width = Some(cells.len());
            }
            Some(expected) if cells.len() != expected => {
                return Err(ParseGridError::ColumnMismatch {
                    line: number,
                    expected,
                    found: cells.len(),
                });
            }
            Some(_) => {}
        }
        rows.push(cells);
    }

    let n = width.ok_or(ParseGridError::NoRows)?;
    if rows.len() != n {
        return Err(ParseGridError::RowMismatch {
            expected: n,
            found: rows.len(),
        });
    }

    let size = Size::try_from(n).expect("width was validated against Size");
    let mut grid = Grid::new(size);
    for (row, cells) in rows.iter().enumerate() {
        for (col, &cell) in cells.iter().enumerate() {
            if cell.is_filled() {
                grid.set(row, col, cell);
            }
        }
    }
    Ok(grid)
}

fn parse_row(line: &str, number: usize) -> Result<Vec<Cell>, ParseGridError> {
    line.split_whitespace()
        .map(|token| {
            let mut chars = token.chars();
            match (chars.next(), chars.next()) {
                (Some(symbol), None) => {
                    Cell::try_from(symbol).map_err(|()| ParseGridError::BadSymbol {
                        line: number,
                        symbol: symbol.to_string(),
                    })
                }
                _ => Err(ParseGridError::BadSymbol {
                    line: number,
                    symbol: token.to_string(),
                }),
            }
        })
        .collect()
}

/// Parses the grid file at `path`.
///
/// Convenience wrapper around [`parse_grid`]; I/O failures surface as
/// [`ParseGridError::Io`].
///
/// # Errors
///
/// Any [`ParseGridError`] variant.
pub fn parse_grid_file<P: AsRef<Path>>(path: P) -> Result<Grid, ParseGridError> {
    let file = File::open(path)?;
    parse_grid(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_a_plain_grid() {
        let input = "0 0 1 1\n1 1 0 0\n0 1 0 1\n1 0 1 0\n";
        let grid = parse_grid(Cursor::new(input)).expect("valid grid");
        assert_eq!(grid.len(), 4);
        assert_eq!(grid.get(0, 0), Some(Cell::Zero));
        assert_eq!(grid.get(3, 0), Some(Cell::One));
    }

    #[test]
    fn test_comments_and_leading_blanks_are_skipped() {
        let input = "# a puzzle\n\n  # indented comment\n_ _ 1 1\n1 1 0 0\n# between rows\n0 1 0 1\n1 0 1 0\n";
        let grid = parse_grid(Cursor::new(input)).expect("valid grid");
        assert_eq!(grid.get(0, 0), Some(Cell::Empty));
        assert_eq!(grid.get(0, 2), Some(Cell::One));
    }

    #[test]
    fn test_blank_line_inside_the_body_fails() {
        let input = "0 0 1 1\n\n1 1 0 0\n0 1 0 1\n1 0 1 0\n";
        let err = parse_grid(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, ParseGridError::BlankLine { line: 2 }));
    }

    #[test]
    fn test_bad_symbol_fails() {
        let input = "0 0 1 2\n1 1 0 0\n0 1 0 1\n1 0 1 0\n";
        let err = parse_grid(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, ParseGridError::BadSymbol { line: 1, .. }));
    }

    #[test]
    fn test_multi_character_token_fails() {
        let input = "00 1 1 0\n1 1 0 0\n0 1 0 1\n1 0 1 0\n";
        let err = parse_grid(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, ParseGridError::BadSymbol { line: 1, .. }));
    }

    #[test]
    fn test_ragged_row_fails() {
        let input = "0 0 1 1\n1 1 0\n0 1 0 1\n1 0 1 0\n";
        let err = parse_grid(Cursor::new(input)).unwrap_err();
        assert!(matches!(
            err,
            ParseGridError::ColumnMismatch {
                line: 2,
                expected: 4,
                found: 3,
            }
        ));
    }

    #[test]
    fn test_wrong_row_count_fails() {
        let input = "0 0 1 1\n1 1 0 0\n0 1 0 1\n";
        let err = parse_grid(Cursor::new(input)).unwrap_err();
        assert!(matches!(
            err,
            ParseGridError::RowMismatch {
                expected: 4,
                found: 3,
            }
        ));
    }

    #[test]
    fn test_unsupported_size_fails() {
        let input = "0 1 0 1 0\n1 0 1 0 1\n0 1 0 1 0\n1 0 1 0 1\n0 1 0 1 0\n";
        let err = parse_grid(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, ParseGridError::InvalidSize(5)));
    }

    #[test]
    fn test_empty_input_fails() {
        let err = parse_grid(Cursor::new("# only comments\n\n")).unwrap_err();
        assert!(matches!(err, ParseGridError::NoRows));
    }

    #[test]
    fn test_print_then_parse_round_trips() {
        let input = "0 0 1 1\n1 1 0 0\n0 1 0 1\n1 0 1 0\n";
        let grid = parse_grid(Cursor::new(input)).expect("valid grid");
        let printed = grid.to_string();
        assert_eq!(printed, input);
        let reparsed = parse_grid(Cursor::new(printed)).expect("printed grid reparses");
        assert_eq!(reparsed, grid);
    }

    #[test]
    fn test_partial_grid_round_trips() {
        let input = "0 _ 1 _\n_ _ _ _\n_ 1 _ 0\n_ _ _ _\n";
        let grid = parse_grid(Cursor::new(input)).expect("valid grid");
        assert_eq!(grid.to_string(), input);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = parse_grid_file("definitely/not/a/real/file.takuzu").unwrap_err();
        assert!(matches!(err, ParseGridError::Io(_)));
    }
}
