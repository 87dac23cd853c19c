//! Delimited numeric matrices with row and column names.
//!
//! The expected layout is a header line followed by one line per row:
//!
//! ```text
//! Blog        china   kids    music
//! Boing Boing 0       2       41
//! Slashdot    3       0       7
//! ```
//!
//! The first header field (above the row names) is ignored. Fields are
//! separated by a single delimiter character, tab by default. Trailing
//! whitespace is dropped from every line, so a stray tab at the end of a row
//! is not an empty cell. Leading whitespace is kept so an empty corner cell
//! (`\tchina\tkids`) still lines up.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, Result};

/// Options for reading a delimited matrix.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Field separator.
    pub delimiter: char,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self { delimiter: '\t' }
    }
}

impl ReadOptions {
    /// Create default options (tab-delimited).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the field separator.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// A dense matrix of observations, one named row per item.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    /// Column names from the header line.
    pub col_names: Vec<String>,
    /// Row names from the first field of each data line.
    pub row_names: Vec<String>,
    /// Row-major values; every row has `col_names.len()` entries.
    pub rows: Vec<Vec<f64>>,
}

impl Matrix {
    /// Read a matrix from a delimited text source.
    pub fn read<R: BufRead>(reader: R, options: &ReadOptions) -> Result<Self> {
        let delim = options.delimiter;
        let mut lines = reader.lines().enumerate();

        let col_names: Vec<String> = match lines.next() {
            Some((_, header)) => header?
                .trim_end()
                .split(delim)
                .skip(1)
                .map(|s| s.trim().to_string())
                .collect(),
            None => return Err(Error::EmptyInput),
        };

        let mut row_names = Vec::new();
        let mut rows = Vec::new();
        for (idx, line) in lines {
            let line = line?;
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }

            let mut fields = line.split(delim);
            let name = fields.next().unwrap_or_default().trim().to_string();
            let values = fields
                .enumerate()
                .map(|(col, field)| {
                    field.trim().parse::<f64>().map_err(|_| Error::Parse {
                        line: idx + 1,
                        column: col + 1,
                        value: field.to_string(),
                    })
                })
                .collect::<Result<Vec<f64>>>()?;

            if values.len() != col_names.len() {
                return Err(Error::RaggedRow {
                    row: rows.len(),
                    expected: col_names.len(),
                    found: values.len(),
                });
            }
            row_names.push(name);
            rows.push(values);
        }

        if rows.is_empty() {
            return Err(Error::EmptyInput);
        }

        log::debug!("read matrix: {} rows x {} columns", rows.len(), col_names.len());
        Ok(Self {
            col_names,
            row_names,
            rows,
        })
    }

    /// Read a matrix from a file.
    pub fn from_path(path: impl AsRef<Path>, options: &ReadOptions) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::read(BufReader::new(file), options)
    }

    /// Number of rows (items).
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (features).
    pub fn n_cols(&self) -> usize {
        self.col_names.len()
    }

    /// Swap rows and columns, so columns can be clustered instead of rows.
    pub fn transpose(&self) -> Self {
        let rows = (0..self.n_cols())
            .map(|c| self.rows.iter().map(|row| row[c]).collect())
            .collect();
        Self {
            col_names: self.row_names.clone(),
            row_names: self.col_names.clone(),
            rows,
        }
    }
}
