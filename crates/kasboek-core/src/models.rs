//! Data models for Kasboek

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Canonical column names used after translation
pub mod columns {
    pub const ACCOUNT_NUMBER: &str = "accountNumber";
    pub const MUTATION_CODE: &str = "mutationCode";
    pub const TRANSACTION_DATE: &str = "transactionDate";
    pub const VALUE_DATE: &str = "valueDate";
    pub const START_BALANCE: &str = "startBalance";
    pub const END_BALANCE: &str = "endBalance";
    pub const AMOUNT: &str = "amount";
    pub const DESCRIPTION: &str = "description";

    // Derived by the pipeline
    pub const PAYEE: &str = "payee";
    pub const CATEGORY: &str = "category";
    pub const MONTH: &str = "month";

    /// Columns the aggregator cannot work without
    pub const REQUIRED: &[&str] = &[TRANSACTION_DATE, AMOUNT, DESCRIPTION];
}

/// A single spreadsheet cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl Value {
    /// Build a text value, collapsing blank strings to `Empty`
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        let trimmed = s.trim();
        if trimmed.is_empty() {
            Self::Empty
        } else if trimmed.len() == s.len() {
            Self::Text(s)
        } else {
            Self::Text(trimmed.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => write!(f, "{}", s),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Self::Number(n) => write!(f, "{}", n),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::text(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

/// A tabular dataset: a header row plus data rows of equal width
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    /// Where the data came from (file name), used in error messages
    pub source: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a table, padding or truncating every row to the header width
    pub fn new(source: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Empty);
                row
            })
            .collect();
        Self {
            source: source.into(),
            headers,
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by exact header name
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at (row, column name), if both exist
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column(column)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }
}

/// Calendar year-month bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for Month {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| format!("Invalid month: {}", s))?;
        let year: i32 = year.parse().map_err(|_| format!("Invalid month: {}", s))?;
        let month: u32 = month.parse().map_err(|_| format!("Invalid month: {}", s))?;
        if !(1..=12).contains(&month) {
            return Err(format!("Invalid month: {}", s));
        }
        Ok(Self { year, month })
    }
}

impl Serialize for Month {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A transaction after classification
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRow {
    /// Cell values in `Classified::headers` order
    pub values: Vec<Value>,
    pub month: Month,
    pub amount: f64,
    pub payee: Option<String>,
    pub category: String,
}

/// The merged, classified dataset
///
/// Column order is every translated column except `description`, then
/// `payee` and `category`, then `description` last. The month bucket is kept
/// per row rather than as a column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Classified {
    pub headers: Vec<String>,
    pub rows: Vec<ClassifiedRow>,
}

impl Classified {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct months, ascending
    pub fn months(&self) -> Vec<Month> {
        let mut months: Vec<Month> = self.rows.iter().map(|r| r.month).collect();
        months.sort();
        months.dedup();
        months
    }
}
