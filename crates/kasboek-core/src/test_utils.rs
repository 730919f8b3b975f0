//! Test utilities for kasboek-core
//!
//! Fixture builders for statement files in the Dutch export layout, used by
//! unit tests, integration tests and the CLI tests.

use std::path::Path;

use rust_xlsxwriter::Workbook;

use crate::error::Result;

/// Headers of a Dutch bank statement export, in export order
pub const DUTCH_HEADERS: &[&str] = &[
    "Rekeningnummer",
    "Muntsoort",
    "Transactiedatum",
    "Rentedatum",
    "Beginsaldo",
    "Eindsaldo",
    "Transactiebedrag",
    "Omschrijving",
];

/// Minimal taxonomy used by the end-to-end scenarios
pub const SAMPLE_TAXONOMY: &str = r#"
[categories]
Groceries = ["Albert Heijn"]
Fuel = ["Shell"]
"#;

/// One statement line: (transaction date, amount, description)
pub type StatementLine<'a> = (u32, f64, &'a str);

/// Write a statement workbook with Dutch headers
///
/// Balances are derived from a running total starting at 1000.
pub fn write_statement_xlsx(path: &Path, lines: &[StatementLine<'_>]) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, header) in DUTCH_HEADERS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }

    let mut balance = 1000.0;
    for (i, (date, amount, description)) in lines.iter().enumerate() {
        let r = (i + 1) as u32;
        let start = balance;
        balance += amount;
        sheet.write_number(r, 0, 123456789.0)?;
        sheet.write_string(r, 1, "EUR")?;
        sheet.write_number(r, 2, f64::from(*date))?;
        sheet.write_number(r, 3, f64::from(*date))?;
        sheet.write_number(r, 4, start)?;
        sheet.write_number(r, 5, balance)?;
        sheet.write_number(r, 6, *amount)?;
        sheet.write_string(r, 7, *description)?;
    }

    workbook.save(path)?;
    Ok(())
}

/// Write the same statement as CSV
pub fn write_statement_csv(path: &Path, lines: &[StatementLine<'_>]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(DUTCH_HEADERS)?;

    let mut balance = 1000.0_f64;
    for (date, amount, description) in lines {
        let start = balance;
        balance += amount;
        writer.write_record([
            "123456789".to_string(),
            "EUR".to_string(),
            date.to_string(),
            date.to_string(),
            start.to_string(),
            balance.to_string(),
            amount.to_string(),
            description.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
