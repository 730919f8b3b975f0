//! Workbook output
//!
//! A workbook has one sheet per month (named `YYYY-MM`, ascending) holding
//! that month's transactions, followed by a `Summary` sheet with the total
//! amount per category per month.
//!
//! Building the workbook is split in two: [`plan`] lays out every sheet in
//! memory, [`write`] renders a plan to an `.xlsx` file. The file is written
//! to a temporary path next to the destination and only moved into place
//! once complete.

use std::collections::BTreeMap;
use std::path::Path;

use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet};
use serde::Serialize;
use tracing::{debug, info};

use crate::aggregate::group_by_month;
use crate::error::{Error, Result};
use crate::models::{columns, Classified, Month, Value};

/// Name of the cross-tabulation sheet
pub const SUMMARY_SHEET: &str = "Summary";

/// One month sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetPlan {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Category x month totals
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Summary {
    /// Column keys, ascending
    pub months: Vec<Month>,
    /// (category, total per month in `months` order), categories ascending
    pub rows: Vec<(String, Vec<f64>)>,
}

impl Summary {
    /// Pivot classified rows: sum of amount per (category, month), zero-filled
    pub fn from_classified(classified: &Classified) -> Self {
        let months = classified.months();
        let mut totals: BTreeMap<&str, BTreeMap<Month, f64>> = BTreeMap::new();
        for row in &classified.rows {
            *totals
                .entry(row.category.as_str())
                .or_default()
                .entry(row.month)
                .or_insert(0.0) += row.amount;
        }

        let rows = totals
            .into_iter()
            .map(|(category, by_month)| {
                let cells = months
                    .iter()
                    .map(|m| by_month.get(m).copied().unwrap_or(0.0))
                    .collect();
                (category.to_string(), cells)
            })
            .collect();

        Self { months, rows }
    }

    /// Total for one category and month (zero when absent)
    pub fn total(&self, category: &str, month: Month) -> f64 {
        let Some(col) = self.months.iter().position(|m| *m == month) else {
            return 0.0;
        };
        self.rows
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, cells)| cells[col])
            .unwrap_or(0.0)
    }

    /// Total of one category over all months
    pub fn category_total(&self, category: &str) -> f64 {
        self.rows
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, cells)| cells.iter().sum())
            .unwrap_or(0.0)
    }

    /// Sum of every cell
    pub fn grand_total(&self) -> f64 {
        self.rows.iter().flat_map(|(_, cells)| cells.iter()).sum()
    }

    /// The summary as a sheet: `category` column then one column per month
    pub fn to_sheet(&self) -> SheetPlan {
        let mut headers = vec![columns::CATEGORY.to_string()];
        headers.extend(self.months.iter().map(ToString::to_string));
        let rows = self
            .rows
            .iter()
            .map(|(category, cells)| {
                let mut row = vec![Value::Text(category.clone())];
                row.extend(cells.iter().map(|&n| Value::Number(n)));
                row
            })
            .collect();
        SheetPlan {
            name: SUMMARY_SHEET.to_string(),
            headers,
            rows,
        }
    }
}

/// In-memory layout of the output workbook
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkbookPlan {
    /// Month sheets, ascending by month
    pub months: Vec<SheetPlan>,
    pub summary: Summary,
}

impl WorkbookPlan {
    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> Vec<String> {
        self.months
            .iter()
            .map(|s| s.name.clone())
            .chain(std::iter::once(SUMMARY_SHEET.to_string()))
            .collect()
    }

    pub fn sheet_count(&self) -> usize {
        self.months.len() + 1
    }

    pub fn sheet(&self, name: &str) -> Option<&SheetPlan> {
        self.months.iter().find(|s| s.name == name)
    }
}

/// Lay out month sheets and the summary for a classified dataset
pub fn plan(classified: &Classified) -> WorkbookPlan {
    let months = group_by_month(classified)
        .into_iter()
        .map(|(month, rows)| SheetPlan {
            name: month.to_string(),
            headers: classified.headers.clone(),
            rows: rows.into_iter().map(|r| r.values.clone()).collect(),
        })
        .collect();

    WorkbookPlan {
        months,
        summary: Summary::from_classified(classified),
    }
}

/// Render a plan to an xlsx file at `path`, replacing any existing file
///
/// Nothing appears at `path` unless the whole workbook was written.
pub fn write(plan: &WorkbookPlan, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut workbook = render(plan)?;

    let temp = tempfile::Builder::new()
        .prefix(".kasboek-")
        .suffix(".xlsx.tmp")
        .tempfile_in(dir)?;
    workbook.save(temp.path())?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    info!(
        "Wrote {} sheets to {}",
        plan.sheet_count(),
        path.display()
    );
    Ok(())
}

/// Render a plan to xlsx bytes
pub fn to_bytes(plan: &WorkbookPlan) -> Result<Vec<u8>> {
    let mut workbook = render(plan)?;
    Ok(workbook.save_to_buffer()?)
}

fn render(plan: &WorkbookPlan) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let summary = plan.summary.to_sheet();
    for sheet in plan.months.iter().chain(std::iter::once(&summary)) {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        write_sheet(worksheet, sheet, &header_format, &date_format)?;
        debug!("Rendered sheet '{}' with {} rows", sheet.name, sheet.rows.len());
    }

    Ok(workbook)
}

fn write_sheet(
    worksheet: &mut Worksheet,
    sheet: &SheetPlan,
    header_format: &Format,
    date_format: &Format,
) -> Result<()> {
    for (col, header) in sheet.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, header_format)?;
    }

    for (i, row) in sheet.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, value) in row.iter().enumerate() {
            let c = col as u16;
            match value {
                Value::Empty => {}
                Value::Text(s) => {
                    worksheet.write_string(r, c, s)?;
                }
                Value::Number(n) => {
                    worksheet.write_number(r, c, *n)?;
                }
                Value::Bool(b) => {
                    worksheet.write_boolean(r, c, *b)?;
                }
                Value::Date(d) => {
                    let date = ExcelDateTime::parse_from_str(&d.format("%Y-%m-%d").to_string())?;
                    worksheet.write_datetime_with_format(r, c, &date, date_format)?;
                }
            }
        }
    }

    worksheet.autofit();
    Ok(())
}
