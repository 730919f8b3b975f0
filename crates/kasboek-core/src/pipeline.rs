//! End-to-end pipeline: read, translate, classify, emit
//!
//! A run takes two statement files and produces one workbook. Every run is
//! independent; all configuration is passed in explicitly.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::aggregate;
use crate::error::Result;
use crate::matcher::{Matcher, SubstringMatcher};
use crate::models::{Classified, Month, Table};
use crate::resolver::{Resolver, ResolverPolicy};
use crate::sheet;
use crate::taxonomy::Taxonomy;
use crate::translate::{translate, TranslationMap};
use crate::workbook::{self, WorkbookPlan};

/// Everything a run needs besides its input files
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub translations: TranslationMap,
    pub taxonomy: Taxonomy,
    pub policy: ResolverPolicy,
}

impl PipelineConfig {
    /// Load both documents with the usual resolution (explicit path,
    /// override dir, embedded default)
    pub fn load(translations: Option<&Path>, categories: Option<&Path>) -> Result<Self> {
        Ok(Self {
            translations: TranslationMap::load(translations)?,
            taxonomy: Taxonomy::load(categories)?,
            policy: ResolverPolicy::default(),
        })
    }

    pub fn with_policy(mut self, policy: ResolverPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Result of classifying a single description
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub payee: Option<String>,
    /// Canonical payee label from the taxonomy
    pub label: Option<String>,
    pub category: String,
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub first_rows: usize,
    pub second_rows: usize,
    pub total_rows: usize,
    pub months: Vec<Month>,
    pub matched: usize,
    pub unmatched: usize,
    /// Rows per category
    pub category_counts: BTreeMap<String, usize>,
    /// Sum of amount per category
    pub category_totals: BTreeMap<String, f64>,
}

impl RunSummary {
    fn new(first_rows: usize, second_rows: usize, classified: &Classified) -> Self {
        let matched = classified.rows.iter().filter(|r| r.payee.is_some()).count();
        let mut category_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut category_totals: BTreeMap<String, f64> = BTreeMap::new();
        for row in &classified.rows {
            *category_counts.entry(row.category.clone()).or_default() += 1;
            *category_totals.entry(row.category.clone()).or_default() += row.amount;
        }

        Self {
            first_rows,
            second_rows,
            total_rows: classified.len(),
            months: classified.months(),
            matched,
            unmatched: classified.len() - matched,
            category_counts,
            category_totals,
        }
    }

    pub fn sheet_count(&self) -> usize {
        self.months.len() + 1
    }
}

/// A configured classification pipeline
pub struct Pipeline {
    config: PipelineConfig,
    matcher: Box<dyn Matcher>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let matcher = Box::new(SubstringMatcher::from_taxonomy(&config.taxonomy));
        Self { config, matcher }
    }

    /// Use a different matcher implementation (same contract)
    pub fn with_matcher(config: PipelineConfig, matcher: Box<dyn Matcher>) -> Self {
        Self { config, matcher }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Classify one description as the pipeline would
    pub fn classify(&self, description: &str, amount: f64) -> Classification {
        let resolver = Resolver::new(&self.config.taxonomy, &self.config.policy);
        let payee = self.matcher.find(description);
        let label = payee
            .and_then(|p| self.config.taxonomy.keyword(p))
            .map(|k| k.label.clone());
        Classification {
            payee: payee.map(str::to_string),
            label,
            category: resolver.resolve(payee, amount),
        }
    }

    /// Translate and classify two already-loaded statements
    pub fn process(&self, first: Table, second: Table) -> Result<Classified> {
        let first = translate(first, &self.config.translations);
        let second = translate(second, &self.config.translations);
        let resolver = Resolver::new(&self.config.taxonomy, &self.config.policy);
        aggregate::aggregate(first, second, self.matcher.as_ref(), &resolver)
    }

    /// Translate, classify and lay out the workbook for two statements
    pub fn plan(&self, first: Table, second: Table) -> Result<(WorkbookPlan, RunSummary)> {
        let (first_rows, second_rows) = (first.len(), second.len());
        let classified = self.process(first, second)?;
        let summary = RunSummary::new(first_rows, second_rows, &classified);
        Ok((workbook::plan(&classified), summary))
    }

    /// Run on two statement files and write the workbook to `output`
    pub fn run(&self, input1: &Path, input2: &Path, output: &Path) -> Result<RunSummary> {
        debug!("Reading {} and {}", input1.display(), input2.display());
        let first = sheet::read_table(input1)?;
        let second = sheet::read_table(input2)?;

        let (plan, summary) = self.plan(first, second)?;
        workbook::write(&plan, output)?;

        info!(
            "Combined {} + {} transactions into {} ({} matched, {} unmatched)",
            summary.first_rows,
            summary.second_rows,
            output.display(),
            summary.matched,
            summary.unmatched
        );
        Ok(summary)
    }
}
