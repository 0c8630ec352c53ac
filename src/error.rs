use thiserror::Error;

/// Failures while reading the judge text format.
///
/// Rows are reported 1-based, counting from the first line after the header,
/// so the message points at the line a user would look at.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("input is empty")]
    Empty,
    #[error("first line must be two positive integers separated by a space, e.g. `6 8` (got `{0}`)")]
    InvalidHeader(String),
    #[error("declared height ({expected}) does not match the number of grid rows ({found})")]
    RowCountMismatch { expected: usize, found: usize },
    #[error("row {row} has {found} characters but the declared width is {expected}")]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Errors returned by grid operations, the codecs and the editor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Inconsistent history: {0}")]
    History(String),
}

pub type Result<T> = std::result::Result<T, GridError>;
