//! Error types for Kasboek

use std::fmt;

use thiserror::Error;

/// A keyword that was assigned to more than one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordConflict {
    pub keyword: String,
    pub categories: Vec<String>,
}

impl fmt::Display for KeywordConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' in {}", self.keyword, self.categories.join(", "))
    }
}

fn join_conflicts(conflicts: &[KeywordConflict]) -> String {
    conflicts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(
        "Configuration error: keywords assigned to more than one category: {}",
        join_conflicts(.0)
    )]
    DuplicateKeywords(Vec<KeywordConflict>),

    #[error("Input format error: {0}")]
    InputFormat(String),

    #[error("Invalid transaction date in {file} row {row}: '{value}' (expected YYYYMMDD)")]
    InvalidDate {
        file: String,
        row: usize,
        value: String,
    },

    #[error("Invalid amount in {file} row {row}: '{value}'")]
    InvalidAmount {
        file: String,
        row: usize,
        value: String,
    },

    #[error("Missing column '{column}' in {file}")]
    MissingColumn { file: String, column: String },

    #[error("No transactions in {0}")]
    EmptyInput(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Broad failure classes reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad configuration document (malformed, duplicate keywords)
    Configuration,
    /// Input data the pipeline cannot interpret
    InputFormat,
    /// Unreadable input or unwritable output
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) | Self::DuplicateKeywords(_) => ErrorKind::Configuration,
            Self::InputFormat(_)
            | Self::InvalidDate { .. }
            | Self::InvalidAmount { .. }
            | Self::MissingColumn { .. }
            | Self::EmptyInput(_)
            | Self::UnsupportedFormat(_)
            | Self::Csv(_) => ErrorKind::InputFormat,
            Self::Io(_) | Self::Spreadsheet(_) | Self::Xlsx(_) => ErrorKind::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
