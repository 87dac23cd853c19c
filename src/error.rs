use core::fmt;

/// Result alias for `hcluster`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by clustering, matrix loading, and dendrogram cuts.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Input was empty.
    EmptyInput,

    /// A row does not have the width of the first row (or header).
    RaggedRow {
        /// Zero-based row index.
        row: usize,
        /// Expected number of values.
        expected: usize,
        /// Found number of values.
        found: usize,
    },

    /// Two vectors handed to a distance function differ in length.
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// A matrix cell could not be parsed as a number.
    Parse {
        /// One-based line number in the source.
        line: usize,
        /// Zero-based column index (the row-name column is 0).
        column: usize,
        /// The offending text.
        value: String,
    },

    /// Invalid parameter value.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// I/O failure while reading input.
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "empty input provided"),
            Error::RaggedRow {
                row,
                expected,
                found,
            } => {
                write!(f, "row {row} has {found} values, expected {expected}")
            }
            Error::DimensionMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {expected}, found {found}")
            }
            Error::Parse {
                line,
                column,
                value,
            } => {
                write!(f, "line {line}, column {column}: cannot parse {value:?} as a number")
            }
            Error::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
            Error::Io(msg) => write!(f, "i/o error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}
