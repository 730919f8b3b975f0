//! Shared utilities for commands
//!
//! This module contains:
//! - `ConfigSources` - Config paths given on the command line
//! - `load_config` / `load_pipeline` - Load configs with the usual resolution
//! - `policy` - Build a resolver policy from command flags

use std::path::Path;

use anyhow::{Context, Result};
use kasboek_core::{Pipeline, PipelineConfig, ResolverPolicy, Taxonomy, TranslationMap};
use tracing::debug;

/// Config paths from the global `--translations` / `--categories` flags
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigSources<'a> {
    pub translations: Option<&'a Path>,
    pub categories: Option<&'a Path>,
}

impl ConfigSources<'_> {
    fn describe(path: Option<&Path>) -> String {
        path.map(|p| p.display().to_string())
            .unwrap_or_else(|| "default".to_string())
    }
}

pub fn load_translations(sources: &ConfigSources<'_>) -> Result<TranslationMap> {
    TranslationMap::load(sources.translations).with_context(|| {
        format!(
            "Failed to load column translations ({})",
            ConfigSources::describe(sources.translations)
        )
    })
}

pub fn load_taxonomy(sources: &ConfigSources<'_>) -> Result<Taxonomy> {
    Taxonomy::load(sources.categories).with_context(|| {
        format!(
            "Failed to load category mapping ({})",
            ConfigSources::describe(sources.categories)
        )
    })
}

/// Load both configs
pub fn load_config(sources: &ConfigSources<'_>) -> Result<PipelineConfig> {
    let translations = load_translations(sources)?;
    let taxonomy = load_taxonomy(sources)?;
    debug!(
        "Config: {} column translations, {} categories, {} keywords",
        translations.len(),
        taxonomy.categories().len(),
        taxonomy.len()
    );
    Ok(PipelineConfig {
        translations,
        taxonomy,
        policy: ResolverPolicy::default(),
    })
}

/// Load both configs and build a pipeline with the given policy
pub fn load_pipeline(sources: &ConfigSources<'_>, policy: ResolverPolicy) -> Result<Pipeline> {
    Ok(Pipeline::new(load_config(sources)?.with_policy(policy)))
}

/// Resolver policy from the `--default-category` / `--no-salary-override` flags
pub fn policy(default_category: &str, no_salary_override: bool) -> ResolverPolicy {
    let mut policy = ResolverPolicy {
        default_category: default_category.to_string(),
        ..Default::default()
    };
    if no_salary_override {
        policy.income_category = None;
    }
    policy
}
