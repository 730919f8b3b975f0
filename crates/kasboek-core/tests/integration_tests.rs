//! Integration tests for kasboek-core
//!
//! These tests exercise the full read → translate → classify → workbook
//! workflow on real files, reading the emitted workbook back with calamine.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use kasboek_core::{
    config::{parse_document, ConfigFormat},
    test_utils::{write_statement_xlsx, StatementLine, DUTCH_HEADERS, SAMPLE_TAXONOMY},
    Error, ErrorKind, Pipeline, PipelineConfig, ResolverPolicy, Taxonomy, TranslationMap,
};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use tempfile::TempDir;

/// Write a Dutch statement export: (date, amount, description) per line
fn write_statement(path: &Path, lines: &[StatementLine<'_>]) {
    write_statement_xlsx(path, lines).unwrap();
}

fn pipeline(taxonomy_toml: &str) -> Pipeline {
    let taxonomy =
        Taxonomy::from_document(&parse_document(taxonomy_toml, ConfigFormat::Toml).unwrap())
            .unwrap();
    Pipeline::new(PipelineConfig {
        translations: TranslationMap::embedded().unwrap(),
        taxonomy,
        policy: ResolverPolicy::default(),
    })
}

const TAXONOMY: &str = SAMPLE_TAXONOMY;

/// Read every sheet of a workbook as (name, rows of cells)
fn read_back(path: &Path) -> Vec<(String, Vec<Vec<Data>>)> {
    let mut workbook = open_workbook_auto(path).unwrap();
    workbook
        .sheet_names()
        .into_iter()
        .map(|name| {
            let range = workbook.worksheet_range(&name).unwrap();
            let rows = range.rows().map(|r| r.to_vec()).collect();
            (name, rows)
        })
        .collect()
}

fn column(rows: &[Vec<Data>], name: &str) -> usize {
    rows[0]
        .iter()
        .position(|c| matches!(c, Data::String(s) if s == name))
        .unwrap_or_else(|| panic!("column {} not found", name))
}

fn number(cell: &Data) -> f64 {
    match cell {
        Data::Float(f) => *f,
        Data::Int(i) => *i as f64,
        other => panic!("expected number, got {:?}", other),
    }
}

fn text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => panic!("expected text, got {:?}", other),
    }
}

// =============================================================================
// End-to-end Scenario
// =============================================================================

#[test]
fn test_two_single_row_statements() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("XLS240103.xlsx");
    let second = dir.path().join("XLS240203.xlsx");
    let output = dir.path().join("combined_output.xlsx");

    write_statement(&first, &[(20240103, 100.0, "Albert Heijn boodschappen")]);
    write_statement(&second, &[(20240203, -20.0, "Shell tankstation")]);

    let summary = pipeline(TAXONOMY).run(&first, &second, &output).unwrap();
    assert_eq!(summary.total_rows, 2);
    assert_eq!(summary.sheet_count(), 3);

    let sheets = read_back(&output);
    let names: Vec<&str> = sheets.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["2024-01", "2024-02", "Summary"]);

    // Matched positive row keeps its category; the override only fires on Other
    let jan = &sheets[0].1;
    assert_eq!(jan.len(), 2);
    assert_eq!(text(&jan[1][column(jan, "category")]), "Groceries");
    assert_eq!(text(&jan[1][column(jan, "payee")]), "Albert Heijn");

    let feb = &sheets[1].1;
    assert_eq!(text(&feb[1][column(feb, "category")]), "Fuel");
    assert_eq!(number(&feb[1][column(feb, "amount")]), -20.0);
}

#[test]
fn test_month_sheet_columns() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("a.xlsx");
    let second = dir.path().join("b.xlsx");
    let output = dir.path().join("out.xlsx");

    write_statement(&first, &[(20240103, -5.0, "Albert Heijn")]);
    write_statement(&second, &[(20240104, -6.0, "Shell")]);
    pipeline(TAXONOMY).run(&first, &second, &output).unwrap();

    let sheets = read_back(&output);
    let headers: Vec<String> = sheets[0].1[0].iter().map(text).collect();
    assert_eq!(
        headers,
        vec![
            "accountNumber",
            "mutationCode",
            "transactionDate",
            "valueDate",
            "startBalance",
            "endBalance",
            "amount",
            "payee",
            "category",
            "description",
        ]
    );
    assert!(!headers.iter().any(|h| h == "month"));
}

#[test]
fn test_unmatched_credit_becomes_salary() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("a.xlsx");
    let second = dir.path().join("b.xlsx");
    let output = dir.path().join("out.xlsx");

    write_statement(&first, &[(20240125, 1500.0, "SALARIS WERKGEVER BV")]);
    write_statement(&second, &[(20240126, -50.0, "Onbekende winkel")]);
    pipeline(TAXONOMY).run(&first, &second, &output).unwrap();

    let sheets = read_back(&output);
    let jan = &sheets[0].1;
    let cat = column(jan, "category");
    assert_eq!(text(&jan[1][cat]), "Salary");
    assert_eq!(text(&jan[2][cat]), "Other");
    assert_eq!(text(&jan[1][column(jan, "payee")]), "");
}

// =============================================================================
// Partition and Summary Properties
// =============================================================================

#[test]
fn test_partition_completeness_and_summary_totals() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("a.xlsx");
    let second = dir.path().join("b.xlsx");
    let output = dir.path().join("out.xlsx");

    let first_lines = [
        (20231230, -12.25, "Albert Heijn 1403"),
        (20240102, 2500.0, "Salaris"),
        (20240115, -60.0, "Shell Utrecht"),
        (20240201, -3.5, "Albert Heijn to go"),
    ];
    let second_lines = [
        (20240105, -44.0, "SHELL EXPRESS"),
        (20240220, -9.99, "Webshop"),
        (20231201, 25.0, "Terugbetaling"),
    ];
    write_statement(&first, &first_lines);
    write_statement(&second, &second_lines);
    let summary = pipeline(TAXONOMY).run(&first, &second, &output).unwrap();
    assert_eq!(summary.total_rows, first_lines.len() + second_lines.len());

    let sheets = read_back(&output);
    let (month_sheets, summary_sheet) = sheets.split_at(sheets.len() - 1);
    let month_names: Vec<&str> = month_sheets.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(month_names, vec!["2023-12", "2024-01", "2024-02"]);

    let mut row_count = 0;
    let mut sheet_total = 0.0;
    for (_, rows) in month_sheets {
        let amount = column(rows, "amount");
        row_count += rows.len() - 1;
        sheet_total += rows[1..].iter().map(|r| number(&r[amount])).sum::<f64>();
    }
    assert_eq!(row_count, first_lines.len() + second_lines.len());

    let (name, rows) = &summary_sheet[0];
    assert_eq!(name, "Summary");
    let summary_total: f64 = rows[1..]
        .iter()
        .flat_map(|r| r[1..].iter().map(number))
        .sum();
    assert!((sheet_total - summary_total).abs() < 1e-9);

    let categories: Vec<String> = rows[1..].iter().map(|r| text(&r[0])).collect();
    assert_eq!(categories, vec!["Fuel", "Groceries", "Other", "Salary"]);
}

#[test]
fn test_rows_keep_merge_order_within_month() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("a.xlsx");
    let second = dir.path().join("b.xlsx");
    let output = dir.path().join("out.xlsx");

    write_statement(&first, &[(20240120, -1.0, "first-1"), (20240105, -2.0, "first-2")]);
    write_statement(&second, &[(20240101, -3.0, "second-1")]);
    pipeline(TAXONOMY).run(&first, &second, &output).unwrap();

    let sheets = read_back(&output);
    let jan = &sheets[0].1;
    let desc = column(jan, "description");
    let order: Vec<String> = jan[1..].iter().map(|r| text(&r[desc])).collect();
    assert_eq!(order, vec!["first-1", "first-2", "second-1"]);
}

#[test]
fn test_spreadsheet_date_cells_are_accepted() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("dates.xlsx");
    let second = dir.path().join("b.xlsx");
    let output = dir.path().join("out.xlsx");

    // Same layout as an export, but the date column holds real date cells
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let date_format = Format::new().set_num_format("dd-mm-yyyy");
    for (col, header) in DUTCH_HEADERS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    let date = ExcelDateTime::from_ymd(2024, 3, 15).unwrap();
    sheet.write_number(1, 0, 123456789.0).unwrap();
    sheet.write_string(1, 1, "EUR").unwrap();
    sheet.write_datetime_with_format(1, 2, &date, &date_format).unwrap();
    sheet.write_datetime_with_format(1, 3, &date, &date_format).unwrap();
    sheet.write_number(1, 4, 1000.0).unwrap();
    sheet.write_number(1, 5, 975.0).unwrap();
    sheet.write_number(1, 6, -25.0).unwrap();
    sheet.write_string(1, 7, "Albert Heijn").unwrap();
    workbook.save(&first).unwrap();

    write_statement(&second, &[(20240316, -5.0, "Shell")]);

    let summary = pipeline(TAXONOMY).run(&first, &second, &output).unwrap();
    assert_eq!(summary.months.len(), 1);
    assert_eq!(summary.months[0].to_string(), "2024-03");
    assert_eq!(summary.category_totals["Groceries"], -25.0);
}

#[test]
fn test_short_numeric_date_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("a.xlsx");
    let second = dir.path().join("b.xlsx");
    let output = dir.path().join("out.xlsx");

    write_statement(&first, &[(20240103, -5.0, "Albert Heijn")]);
    write_statement(&second, &[(1240103, -20.0, "Shell")]);

    let err = pipeline(TAXONOMY).run(&first, &second, &output).unwrap_err();
    assert!(matches!(err, Error::InvalidDate { row: 2, .. }));
    assert!(!output.exists());
}

#[test]
fn test_columns_translated_to_same_name_fail_without_output() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("a.csv");
    let second = dir.path().join("b.csv");
    let output = dir.path().join("out.xlsx");

    // `Omschrijving` translates to `description`, which the file already has
    std::fs::write(
        &first,
        "Transactiedatum,Transactiebedrag,Omschrijving,description\n20240103,-5,Albert Heijn,extra\n",
    )
    .unwrap();
    std::fs::write(
        &second,
        "Transactiedatum,Transactiebedrag,Omschrijving\n20240104,-6,Shell\n",
    )
    .unwrap();

    let err = pipeline(TAXONOMY).run(&first, &second, &output).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InputFormat);
    assert!(err.to_string().contains("description"));
    assert!(!output.exists());
}

// =============================================================================
// Failure Handling
// =============================================================================

#[test]
fn test_csv_and_xlsx_inputs_mix() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("a.xlsx");
    let second = dir.path().join("b.csv");
    let output = dir.path().join("out.xlsx");

    write_statement(&first, &[(20240103, -5.0, "Albert Heijn")]);
    std::fs::write(
        &second,
        "Rekeningnummer,Transactiedatum,Transactiebedrag,Omschrijving\n123,20240203,\"-20,00\",Shell\n",
    )
    .unwrap();

    let summary = pipeline(TAXONOMY).run(&first, &second, &output).unwrap();
    assert_eq!(summary.total_rows, 2);
    assert_eq!(summary.category_totals["Fuel"], -20.0);
}

#[test]
fn test_bad_date_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("a.xlsx");
    let second = dir.path().join("b.csv");
    let output = dir.path().join("out.xlsx");

    write_statement(&first, &[(20240103, -5.0, "Albert Heijn")]);
    std::fs::write(
        &second,
        "Transactiedatum,Transactiebedrag,Omschrijving\n03-02-2024,-20,Shell\n",
    )
    .unwrap();

    let err = pipeline(TAXONOMY).run(&first, &second, &output).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InputFormat);
    assert!(matches!(err, Error::InvalidDate { row: 2, .. }));
    assert!(!output.exists());
}

#[test]
fn test_existing_output_untouched_on_failure() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("a.xlsx");
    let second = dir.path().join("b.xlsx");
    let output = dir.path().join("out.xlsx");
    std::fs::write(&output, b"previous run").unwrap();

    write_statement(&first, &[(20240103, -5.0, "Albert Heijn")]);
    write_statement(&second, &[]);

    let err = pipeline(TAXONOMY).run(&first, &second, &output).unwrap_err();
    assert!(matches!(err, Error::EmptyInput(_)));
    assert_eq!(std::fs::read(&output).unwrap(), b"previous run");
}

#[test]
fn test_missing_input_is_io_error() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("a.xlsx");
    write_statement(&first, &[(20240103, -5.0, "Albert Heijn")]);

    let err = pipeline(TAXONOMY)
        .run(&first, &dir.path().join("gone.xlsx"), &dir.path().join("out.xlsx"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn test_duplicate_keyword_rejected_at_load() {
    let doc = parse_document(
        "[categories]\nGroceries = [\"Albert Heijn\", \"Shell\"]\nFuel = [\"Shell\"]\n",
        ConfigFormat::Toml,
    )
    .unwrap();
    let err = Taxonomy::from_document(&doc).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    let msg = err.to_string();
    assert!(msg.contains("Groceries"));
    assert!(msg.contains("Fuel"));
}
