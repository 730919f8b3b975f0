//! Merge and classify two translated statements
//!
//! Rows of the first statement come before rows of the second, each in its
//! original order; nothing is interleaved or deduplicated. Every row gets a
//! parsed date, a month bucket, a payee and a category. Any date or amount
//! that cannot be read fails the whole run rather than dropping the row.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{Error, Result};
use crate::matcher::Matcher;
use crate::models::{columns, Classified, ClassifiedRow, Month, Table, Value};
use crate::resolver::Resolver;

/// Concatenate two tables, first fully before second
///
/// Headers are the union: the first table's headers in order, then headers
/// only the second table has. A header repeated within a table keeps one
/// column per occurrence. Cells a table doesn't have are empty.
pub fn concat(first: Table, second: Table) -> Table {
    let mut headers = first.headers.clone();
    for (i, header) in second.headers.iter().enumerate() {
        if occurrences(&headers, header) <= occurrences(&second.headers[..i], header) {
            headers.push(header.clone());
        }
    }

    let source = format!("{} + {}", first.source, second.source);
    let mut rows = Vec::with_capacity(first.rows.len() + second.rows.len());
    for table in [first, second] {
        let positions: Vec<usize> = table
            .headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let nth = occurrences(&table.headers[..i], h);
                headers
                    .iter()
                    .enumerate()
                    .filter(|(_, x)| *x == h)
                    .nth(nth)
                    .map(|(pos, _)| pos)
                    .unwrap_or_default()
            })
            .collect();
        for row in table.rows {
            let mut merged = vec![Value::Empty; headers.len()];
            for (value, &pos) in row.into_iter().zip(&positions) {
                merged[pos] = value;
            }
            rows.push(merged);
        }
    }

    Table::new(source, headers, rows)
}

fn occurrences(headers: &[String], header: &str) -> usize {
    headers.iter().filter(|h| h.as_str() == header).count()
}

/// Parse a fixed 8-digit `YYYYMMDD` date from a cell
///
/// Numeric cells must be whole numbers. Cells already holding a calendar
/// date are taken as is.
pub fn parse_transaction_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Date(d) => Some(*d),
        Value::Number(n) if n.fract() == 0.0 && (1e7..1e8).contains(n) => {
            parse_yyyymmdd(&format!("{}", *n as u64))
        }
        Value::Text(s) => parse_yyyymmdd(s.trim()),
        _ => None,
    }
}

fn parse_yyyymmdd(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = s[0..4].parse().ok()?;
    let month: u32 = s[4..6].parse().ok()?;
    let day: u32 = s[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse a signed amount from a cell
///
/// Text amounts may use either `.` or `,` as decimal separator; when both
/// appear, the last one is the decimal separator.
pub fn parse_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) if n.is_finite() => Some(*n),
        Value::Text(s) => {
            let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
            let normalized = match (s.rfind(','), s.rfind('.')) {
                (Some(comma), Some(dot)) if comma > dot => s.replace('.', "").replace(',', "."),
                (Some(_), Some(_)) => s.replace(',', ""),
                (Some(_), None) => s.replace(',', "."),
                _ => s,
            };
            normalized.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        _ => None,
    }
}

fn require_columns(table: &Table) -> Result<()> {
    for column in columns::REQUIRED {
        if table.column(column).is_none() {
            return Err(Error::MissingColumn {
                file: table.source.clone(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

/// Two columns with one name would overwrite each other when merged
fn require_unique_headers(table: &Table) -> Result<()> {
    for (i, header) in table.headers.iter().enumerate() {
        if table.headers[..i].contains(header) {
            return Err(Error::InputFormat(format!(
                "Column '{}' appears more than once in {} after translation",
                header, table.source
            )));
        }
    }
    Ok(())
}

/// Check that a translated statement can be aggregated
pub fn validate(table: &Table) -> Result<()> {
    if table.is_empty() {
        return Err(Error::EmptyInput(table.source.clone()));
    }
    require_unique_headers(table)?;
    require_columns(table)
}

/// Merge two translated statements and classify every row
pub fn aggregate(
    first: Table,
    second: Table,
    matcher: &dyn Matcher,
    resolver: &Resolver<'_>,
) -> Result<Classified> {
    validate(&first)?;
    validate(&second)?;

    let first_len = first.len();
    let first_source = first.source.clone();
    let second_source = second.source.clone();
    let merged = concat(first, second);
    debug!(
        "Merged {} rows ({} + {})",
        merged.len(),
        first_len,
        merged.len() - first_len
    );

    // Required columns are present in both inputs, so in the union too
    let date_col = merged.column(columns::TRANSACTION_DATE).unwrap_or_default();
    let amount_col = merged.column(columns::AMOUNT).unwrap_or_default();
    let description_col = merged.column(columns::DESCRIPTION).unwrap_or_default();

    // Output order: everything but description, payee, category, description
    let mut headers: Vec<String> = merged
        .headers
        .iter()
        .filter(|h| h.as_str() != columns::DESCRIPTION)
        .cloned()
        .collect();
    headers.push(columns::PAYEE.to_string());
    headers.push(columns::CATEGORY.to_string());
    headers.push(columns::DESCRIPTION.to_string());

    let mut rows = Vec::with_capacity(merged.len());
    for (index, mut row) in merged.rows.into_iter().enumerate() {
        // 1-based data row number within its own file, plus the header row
        let (file, line) = if index < first_len {
            (&first_source, index + 2)
        } else {
            (&second_source, index - first_len + 2)
        };

        let date = parse_transaction_date(&row[date_col]).ok_or_else(|| Error::InvalidDate {
            file: file.clone(),
            row: line,
            value: row[date_col].to_string(),
        })?;
        let amount = parse_amount(&row[amount_col]).ok_or_else(|| Error::InvalidAmount {
            file: file.clone(),
            row: line,
            value: row[amount_col].to_string(),
        })?;

        let description = std::mem::take(&mut row[description_col]);
        let text = description.to_string();
        let payee = matcher.find(&text).map(str::to_string);
        let category = resolver.resolve(payee.as_deref(), amount);

        row[date_col] = Value::Date(date);
        let mut values: Vec<Value> = row
            .into_iter()
            .enumerate()
            .filter(|(i, _)| *i != description_col)
            .map(|(_, v)| v)
            .collect();
        values.push(payee.clone().map(Value::Text).unwrap_or_default());
        values.push(Value::Text(category.clone()));
        values.push(description);

        rows.push(ClassifiedRow {
            values,
            month: Month::of(date),
            amount,
            payee,
            category,
        });
    }

    let classified = Classified { headers, rows };
    debug!(
        "Classified {} rows across {} months",
        classified.len(),
        classified.months().len()
    );
    Ok(classified)
}

/// Group rows by month, ascending; rows keep their merged order within a month
pub fn group_by_month(classified: &Classified) -> BTreeMap<Month, Vec<&ClassifiedRow>> {
    let mut groups: BTreeMap<Month, Vec<&ClassifiedRow>> = BTreeMap::new();
    for row in &classified.rows {
        groups.entry(row.month).or_default().push(row);
    }
    groups
}
