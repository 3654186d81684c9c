//! Dataset construction and loading errors.

use super::error_code::{self, TetradErrorCode};

/// Errors raised while building or reading a tabular dataset.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("dataset has no variables")]
    NoVariables,

    #[error("duplicate variable name: {name}")]
    DuplicateVariable { name: String },

    #[error("column {column} has {actual} rows, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("row {row} has {actual} cells, expected {expected}")]
    RowLengthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("variable {variable} is {actual}, expected {expected}")]
    KindMismatch {
        variable: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("category index {index} out of range for {variable} ({categories} categories)")]
    CategoryOutOfRange {
        variable: String,
        index: usize,
        categories: usize,
    },

    #[error("non-finite value in column {column} at row {row}")]
    NonFiniteValue { column: String, row: usize },

    #[error("parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("cannot read {path}: {message}")]
    Io { path: String, message: String },
}

impl TetradErrorCode for DataError {
    fn error_code(&self) -> &'static str {
        error_code::DATA_ERROR
    }
}
