//! Description matching
//!
//! A matcher finds the first keyword variant contained in a transaction
//! description. The contract every implementation keeps: comparison is
//! case-insensitive, variants are tried in the order supplied, and the first
//! variant found wins.

use crate::taxonomy::Taxonomy;

/// Finds the payee keyword in a description
pub trait Matcher {
    /// The first matching variant (in its configured spelling), or `None`
    fn find(&self, description: &str) -> Option<&str>;
}

/// Linear case-insensitive substring search over the variants
///
/// O(variants) per description, fine for statement-sized inputs.
#[derive(Debug, Clone, Default)]
pub struct SubstringMatcher {
    // (configured spelling, lowercased form)
    variants: Vec<(String, String)>,
}

impl SubstringMatcher {
    pub fn new<I, S>(variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            variants: variants
                .into_iter()
                .map(Into::into)
                .map(|v: String| {
                    let lower = v.to_lowercase();
                    (v, lower)
                })
                .collect(),
        }
    }

    /// Matcher over a taxonomy's variants in precedence order
    pub fn from_taxonomy(taxonomy: &Taxonomy) -> Self {
        Self::new(taxonomy.variants())
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

impl Matcher for SubstringMatcher {
    fn find(&self, description: &str) -> Option<&str> {
        if description.is_empty() {
            return None;
        }
        let haystack = description.to_lowercase();
        self.variants
            .iter()
            .find(|(_, lower)| haystack.contains(lower.as_str()))
            .map(|(original, _)| original.as_str())
    }
}
