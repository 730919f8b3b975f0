//! Category resolution
//!
//! Maps a matched payee keyword to its category, falling back to a default
//! category. Credits that end up in the fallback are treated as income.

use crate::taxonomy::Taxonomy;

/// Fallback category for unmatched transactions
pub const DEFAULT_CATEGORY: &str = "Other";

/// Category for uncategorized credits
pub const INCOME_CATEGORY: &str = "Salary";

/// Resolution policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverPolicy {
    /// Category for rows without a recognized payee
    pub default_category: String,
    /// Category for positive-amount rows that resolved to `default_category`;
    /// `None` keeps them in the fallback
    pub income_category: Option<String>,
}

impl Default for ResolverPolicy {
    fn default() -> Self {
        Self {
            default_category: DEFAULT_CATEGORY.to_string(),
            income_category: Some(INCOME_CATEGORY.to_string()),
        }
    }
}

/// Resolves payees to categories for one taxonomy
#[derive(Debug, Clone)]
pub struct Resolver<'a> {
    taxonomy: &'a Taxonomy,
    policy: &'a ResolverPolicy,
}

impl<'a> Resolver<'a> {
    pub fn new(taxonomy: &'a Taxonomy, policy: &'a ResolverPolicy) -> Self {
        Self { taxonomy, policy }
    }

    /// Owning category of a payee, or the default category
    pub fn category_for(&self, payee: Option<&str>) -> &'a str {
        payee
            .and_then(|p| self.taxonomy.category_of(p))
            .unwrap_or(self.policy.default_category.as_str())
    }

    /// Final category for a transaction
    ///
    /// The income override only fires when the amount is strictly positive
    /// and the category is the default one.
    pub fn resolve(&self, payee: Option<&str>, amount: f64) -> String {
        let category = self.category_for(payee);
        match &self.policy.income_category {
            Some(income) if amount > 0.0 && category == self.policy.default_category => {
                income.clone()
            }
            _ => category.to_string(),
        }
    }
}
