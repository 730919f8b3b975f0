//! Spreadsheet and CSV readers for bank statement exports
//!
//! Every format is read into a [`Table`]: the first row holds the headers,
//! the rest are data rows. Only the first worksheet of a workbook is used.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Table, Value};

/// File extensions accepted by the upload front end
pub const ALLOWED_UPLOAD_EXTENSIONS: &[&str] = &["xls", "xlsx"];

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Excel workbooks (legacy .xls, modern .xlsx/.xlsm) and OpenDocument
    Workbook,
    Csv,
}

impl SourceFormat {
    /// Detect the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = extension(path);
        match ext.as_str() {
            "xls" | "xlsx" | "xlsm" | "xlsb" | "ods" => Ok(Self::Workbook),
            "csv" => Ok(Self::Csv),
            _ => Err(Error::UnsupportedFormat(format!(
                "{} (expected .xls, .xlsx or .csv)",
                path.display()
            ))),
        }
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Check a file name against the upload allow-list
pub fn is_allowed_upload(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(stem, ext)| {
            !stem.is_empty() && ALLOWED_UPLOAD_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
        })
        .unwrap_or(false)
}

/// Read a statement file into a table, detecting the format from its extension
pub fn read_table(path: &Path) -> Result<Table> {
    match SourceFormat::from_path(path)? {
        SourceFormat::Workbook => read_workbook(path),
        SourceFormat::Csv => {
            let file = File::open(path)?;
            read_csv(file, &source_name(path))
        }
    }
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read the first worksheet of an Excel/OpenDocument workbook
pub fn read_workbook(path: &Path) -> Result<Table> {
    let source = source_name(path);
    let mut workbook = open_workbook_auto(path)?;
    let first_sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| Error::EmptyInput(format!("{} (no worksheets)", source)))?;

    let range = workbook.worksheet_range(&first_sheet)?;
    let mut rows = range.rows();

    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(header_text).collect(),
        None => return Err(Error::EmptyInput(source)),
    };

    let data: Vec<Vec<Value>> = rows
        .map(|row| row.iter().map(cell_value).collect::<Vec<_>>())
        .filter(|row| !row.iter().all(Value::is_empty))
        .collect();

    debug!(
        "Read {} rows from sheet '{}' of {}",
        data.len(),
        first_sheet,
        source
    );
    Ok(Table::new(source, headers, data))
}

/// Read CSV data with a header row
pub fn read_csv<R: Read>(reader: R, source: &str) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let mut data = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let row: Vec<Value> = record.iter().map(csv_value).collect();
        if row.iter().all(Value::is_empty) {
            continue;
        }
        data.push(row);
    }

    debug!("Read {} rows from {}", data.len(), source);
    Ok(Table::new(source, headers, data))
}

/// CSV fields are text; plain numbers are promoted so CSV and workbook
/// inputs produce the same cells.
fn csv_value(field: &str) -> Value {
    let trimmed = field.trim();
    if !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || c == '-' || c == '.')
    {
        if let Ok(n) = trimmed.parse::<f64>() {
            return Value::Number(n);
        }
    }
    Value::text(trimmed)
}

fn header_text(cell: &Data) -> String {
    match cell_value(cell) {
        Value::Empty => String::new(),
        other => other.to_string(),
    }
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Empty,
        Data::String(s) => Value::text(s.as_str()),
        Data::Float(f) => Value::Number(*f),
        Data::Int(i) => Value::Number(*i as f64),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| Value::Date(d.date()))
            .unwrap_or_else(|| Value::Number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::text(s.as_str()),
    }
}
