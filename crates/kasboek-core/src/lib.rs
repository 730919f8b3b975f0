//! Kasboek Core Library
//!
//! Combines two bank statement exports into one classified workbook:
//! - Spreadsheet/CSV readers for the statement exports
//! - Column translation from Dutch export headers to canonical names
//! - Category taxonomy loading and validation (TOML, JSON or YAML)
//! - Keyword matching of descriptions and category resolution
//! - Merging, month bucketing and the category x month summary
//! - Atomic xlsx workbook output

pub mod aggregate;
pub mod config;
pub mod error;
pub mod matcher;
pub mod models;
pub mod pipeline;
pub mod resolver;
pub mod sheet;
pub mod taxonomy;
pub mod translate;
pub mod workbook;

/// Test utilities including statement fixture writers
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::ConfigFormat;
pub use error::{Error, ErrorKind, KeywordConflict, Result};
pub use matcher::{Matcher, SubstringMatcher};
pub use models::{Classified, ClassifiedRow, Month, Table, Value};
pub use pipeline::{Classification, Pipeline, PipelineConfig, RunSummary};
pub use resolver::{Resolver, ResolverPolicy};
pub use taxonomy::{Keyword, Taxonomy};
pub use translate::TranslationMap;
pub use workbook::{SheetPlan, Summary, WorkbookPlan};
