//! Column header translation
//!
//! Renames source headers (Dutch bank export names) to canonical field names.
//! Unnamed columns, which spreadsheet exports leave behind as blank headers or
//! `Unnamed: N` placeholders, are dropped together with their data.

use std::path::Path;

use tracing::{debug, warn};

use crate::config::{self, DEFAULT_TRANSLATIONS, TRANSLATIONS_FILE};
use crate::error::{Error, Result};
use crate::models::Table;

/// Ordered mapping from source header to canonical header
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TranslationMap {
    entries: Vec<(String, String)>,
}

impl TranslationMap {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Build from a parsed document with a `translations` table
    pub fn from_document(document: &serde_json::Value) -> Result<Self> {
        let table = config::section(document, "translations")?;
        let mut entries = Vec::with_capacity(table.len());
        for (source, canonical) in table {
            let canonical = canonical.as_str().ok_or_else(|| {
                Error::Configuration(format!(
                    "Translation for '{}' must be a string",
                    source
                ))
            })?;
            entries.push((source.clone(), canonical.to_string()));
        }
        Ok(Self { entries })
    }

    /// Load with the usual resolution (explicit path, override dir, embedded default)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let document = config::resolve_document(path, TRANSLATIONS_FILE, DEFAULT_TRANSLATIONS)?;
        Self::from_document(&document)
    }

    /// The embedded Dutch export mapping
    pub fn embedded() -> Result<Self> {
        let document = config::parse_document(DEFAULT_TRANSLATIONS, config::ConfigFormat::Toml)?;
        Self::from_document(&document)
    }

    /// Canonical name for a source header, if mapped
    pub fn get(&self, source: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == source)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Translate one header; `None` means the column should be dropped
    pub fn translate_header(&self, header: &str) -> Option<String> {
        if is_unnamed(header) {
            return None;
        }
        Some(self.get(header).unwrap_or(header).to_string())
    }
}

/// Headers that carry no name
pub fn is_unnamed(header: &str) -> bool {
    let header = header.trim();
    header.is_empty() || header.starts_with("Unnamed:")
}

/// Rename the columns of a table, dropping unnamed ones
pub fn translate(table: Table, mapping: &TranslationMap) -> Table {
    let keep: Vec<(usize, String)> = table
        .headers
        .iter()
        .enumerate()
        .filter_map(|(i, h)| mapping.translate_header(h).map(|name| (i, name)))
        .collect();

    let dropped = table.headers.len() - keep.len();
    if dropped > 0 {
        warn!("Dropped {} unnamed column(s) from {}", dropped, table.source);
    }

    let headers: Vec<String> = keep.iter().map(|(_, name)| name.clone()).collect();
    let rows = table
        .rows
        .into_iter()
        .map(|mut row| {
            keep.iter()
                .map(|(i, _)| std::mem::take(&mut row[*i]))
                .collect()
        })
        .collect();

    debug!("Translated headers of {}: {:?}", table.source, headers);
    Table::new(table.source, headers, rows)
}
