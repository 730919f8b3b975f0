//! Configuration documents
//!
//! Two documents drive a run: the column translation mapping and the
//! category taxonomy. Both may be written as TOML (canonical), JSON or YAML;
//! every syntax is normalized to an order-preserving `serde_json::Value`
//! before it is interpreted, so the rest of the crate sees one
//! representation.
//!
//! ## Configuration Resolution
//!
//! Each document is resolved with three layers:
//! 1. An explicit path given by the caller
//! 2. An override in the data dir (~/.local/share/kasboek/config/<file>)
//! 3. The embedded default (compiled into the binary)

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value as Document;
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default column translations (compiled into binary)
pub const DEFAULT_TRANSLATIONS: &str = include_str!("../../../config/column_translations.toml");

/// Embedded default category taxonomy (compiled into binary)
pub const DEFAULT_CATEGORIES: &str = include_str!("../../../config/category_mapping.toml");

/// File name of the translation override in the config dir
pub const TRANSLATIONS_FILE: &str = "column_translations.toml";

/// File name of the taxonomy override in the config dir
pub const CATEGORIES_FILE: &str = "category_mapping.toml";

/// Syntax of a configuration document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Pick the syntax from a file extension; unknown extensions are TOML
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Self::Json,
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Toml,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }
}

/// Parse a document into its normalized form
pub fn parse_document(content: &str, format: ConfigFormat) -> Result<Document> {
    let parsed = match format {
        ConfigFormat::Toml => toml::from_str::<Document>(content).map_err(|e| e.to_string()),
        ConfigFormat::Json => serde_json::from_str::<Document>(content).map_err(|e| e.to_string()),
        ConfigFormat::Yaml => serde_yaml::from_str::<Document>(content).map_err(|e| e.to_string()),
    };
    let document = parsed.map_err(|e| {
        Error::Configuration(format!("Invalid config {}: {}", format.as_str(), e))
    })?;

    if !document.is_object() {
        return Err(Error::Configuration(
            "Config document must be a table at the top level".to_string(),
        ));
    }
    Ok(document)
}

/// Read and parse a document from disk
pub fn load_document(path: &Path) -> Result<Document> {
    let content = fs::read_to_string(path).map_err(|e| {
        Error::Configuration(format!("Failed to read config {}: {}", path.display(), e))
    })?;
    debug!("Loaded config from {}", path.display());
    parse_document(&content, ConfigFormat::from_path(path))
}

/// Default config override directory
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("kasboek").join("config"))
}

/// Resolve a document: explicit path, then override dir, then embedded default
pub fn resolve_document(
    explicit: Option<&Path>,
    override_file: &str,
    embedded: &str,
) -> Result<Document> {
    if let Some(path) = explicit {
        return load_document(path);
    }

    if let Some(dir) = default_config_dir() {
        let candidate = dir.join(override_file);
        if candidate.exists() {
            return load_document(&candidate);
        }
    }

    parse_document(embedded, ConfigFormat::Toml)
}

/// Get a top-level table from a document, failing if absent or not a table
pub(crate) fn section<'a>(
    document: &'a Document,
    name: &str,
) -> Result<&'a serde_json::Map<String, Document>> {
    document
        .get(name)
        .ok_or_else(|| Error::Configuration(format!("Missing '{}' table", name)))?
        .as_object()
        .ok_or_else(|| Error::Configuration(format!("'{}' must be a table", name)))
}
