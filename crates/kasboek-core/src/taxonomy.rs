//! Category taxonomy: categories and the keywords that identify their payees
//!
//! A category lists its keywords either flat:
//!
//! ```toml
//! [categories]
//! Groceries = ["Albert Heijn", "Jumbo"]
//! ```
//!
//! or grouped under a canonical payee label when one payee is known by
//! several spellings:
//!
//! ```toml
//! [categories.Clothing]
//! "H&M" = ["H&M", "H & M"]
//! ```
//!
//! Both forms flatten to one keyword -> category relation. Keyword order
//! (categories in document order, then keywords in document order) is match
//! precedence. A keyword belonging to more than one category is rejected.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value as Document;
use tracing::debug;

use crate::config::{self, CATEGORIES_FILE, DEFAULT_CATEGORIES};
use crate::error::{Error, KeywordConflict, Result};

/// One keyword variant and where it belongs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    /// The text searched for in descriptions
    pub variant: String,
    /// Canonical payee label (the variant itself for flat categories)
    pub label: String,
    pub category: String,
}

/// Validated, flattened taxonomy
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Taxonomy {
    keywords: Vec<Keyword>,
    categories: Vec<String>,
    by_variant: HashMap<String, usize>,
}

impl Taxonomy {
    /// Build from (category, label, variant) triples in precedence order
    ///
    /// Repeats of a variant inside one category are collapsed. A variant used
    /// by two or more categories is an error; every conflict is reported.
    pub fn from_entries<I, C, L, V>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (C, L, V)>,
        C: Into<String>,
        L: Into<String>,
        V: Into<String>,
    {
        let mut keywords: Vec<Keyword> = Vec::new();
        let mut categories: Vec<String> = Vec::new();
        let mut by_variant: HashMap<String, usize> = HashMap::new();
        // variant -> every category claiming it, in first-seen order
        let mut claims: Vec<(String, Vec<String>)> = Vec::new();
        let mut claim_index: HashMap<String, usize> = HashMap::new();

        for (category, label, variant) in entries {
            let category = category.into();
            let variant = variant.into();
            if variant.trim().is_empty() {
                return Err(Error::Configuration(format!(
                    "Empty keyword in category '{}'",
                    category
                )));
            }
            if !categories.contains(&category) {
                categories.push(category.clone());
            }

            match claim_index.get(&variant) {
                Some(&idx) => {
                    let owners = &mut claims[idx].1;
                    if !owners.contains(&category) {
                        owners.push(category);
                    }
                }
                None => {
                    claim_index.insert(variant.clone(), claims.len());
                    claims.push((variant.clone(), vec![category.clone()]));
                    by_variant.insert(variant.clone(), keywords.len());
                    keywords.push(Keyword {
                        variant,
                        label: label.into(),
                        category,
                    });
                }
            }
        }

        let conflicts: Vec<KeywordConflict> = claims
            .into_iter()
            .filter(|(_, owners)| owners.len() > 1)
            .map(|(keyword, categories)| KeywordConflict {
                keyword,
                categories,
            })
            .collect();
        if !conflicts.is_empty() {
            return Err(Error::DuplicateKeywords(conflicts));
        }

        Ok(Self {
            keywords,
            categories,
            by_variant,
        })
    }

    /// Build from a parsed document with a `categories` table
    pub fn from_document(document: &Document) -> Result<Self> {
        let table = config::section(document, "categories")?;
        let mut entries: Vec<(String, String, String)> = Vec::new();

        for (category, spec) in table {
            match spec {
                Document::Array(items) => {
                    for item in items {
                        let variant = keyword_str(category, item)?;
                        entries.push((category.clone(), variant.clone(), variant));
                    }
                }
                Document::Object(groups) => {
                    for (label, items) in groups {
                        let items = items.as_array().ok_or_else(|| {
                            Error::Configuration(format!(
                                "Keywords for '{}' in category '{}' must be a list",
                                label, category
                            ))
                        })?;
                        for item in items {
                            let variant = keyword_str(category, item)?;
                            entries.push((category.clone(), label.clone(), variant));
                        }
                    }
                }
                _ => {
                    return Err(Error::Configuration(format!(
                        "Category '{}' must be a list of keywords or a table of labelled lists",
                        category
                    )))
                }
            }
        }

        let mut taxonomy = Self::from_entries(entries)?;
        // Categories without keywords still exist; keep document order
        taxonomy.categories = table.keys().cloned().collect();
        debug!(
            "Loaded taxonomy: {} categories, {} keywords",
            taxonomy.categories.len(),
            taxonomy.keywords.len()
        );
        Ok(taxonomy)
    }

    /// Load with the usual resolution (explicit path, override dir, embedded default)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let document = config::resolve_document(path, CATEGORIES_FILE, DEFAULT_CATEGORIES)?;
        Self::from_document(&document)
    }

    /// The embedded default taxonomy
    pub fn embedded() -> Result<Self> {
        let document = config::parse_document(DEFAULT_CATEGORIES, config::ConfigFormat::Toml)?;
        Self::from_document(&document)
    }

    /// All keywords in match precedence order
    pub fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }

    /// All keyword variants in match precedence order
    pub fn variants(&self) -> Vec<&str> {
        self.keywords.iter().map(|k| k.variant.as_str()).collect()
    }

    /// Category names in document order
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// The category owning a variant (exact match on the variant text)
    pub fn category_of(&self, variant: &str) -> Option<&str> {
        self.keyword(variant).map(|k| k.category.as_str())
    }

    pub fn keyword(&self, variant: &str) -> Option<&Keyword> {
        self.by_variant.get(variant).map(|&i| &self.keywords[i])
    }

    /// Keywords of one category, in precedence order
    pub fn keywords_in<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Keyword> + 'a {
        self.keywords.iter().filter(move |k| k.category == category)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

fn keyword_str(category: &str, item: &Document) -> Result<String> {
    item.as_str().map(str::to_string).ok_or_else(|| {
        Error::Configuration(format!(
            "Keyword {} in category '{}' must be a string",
            item, category
        ))
    })
}
