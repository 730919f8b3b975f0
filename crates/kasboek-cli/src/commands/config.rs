//! Config inspection commands (check, categories, classify)

use anyhow::{bail, Result};
use kasboek_core::ResolverPolicy;

use super::{load_pipeline, load_taxonomy, load_translations, truncate, ConfigSources};

/// Load and validate both configs, reporting what was loaded
pub fn cmd_check(sources: &ConfigSources<'_>) -> Result<()> {
    println!("🔍 Checking configuration...");

    let translations = load_translations(sources)?;
    println!("   Column translations: {}", translations.len());

    let taxonomy = load_taxonomy(sources)?;
    println!(
        "   Categories: {}  Keywords: {}",
        taxonomy.categories().len(),
        taxonomy.len()
    );

    println!("✅ Configuration is valid");
    Ok(())
}

/// List categories and their keywords in match order
pub fn cmd_categories(sources: &ConfigSources<'_>, only: Option<&str>) -> Result<()> {
    let taxonomy = load_taxonomy(sources)?;

    if let Some(name) = only {
        if !taxonomy.categories().iter().any(|c| c == name) {
            bail!("Unknown category: {}", name);
        }
    }

    for category in taxonomy.categories() {
        if only.is_some_and(|name| name != category) {
            continue;
        }
        let keywords: Vec<_> = taxonomy.keywords_in(category).collect();
        println!("{} ({})", category, keywords.len());
        for keyword in keywords {
            if keyword.label == keyword.variant {
                println!("   {}", truncate(&keyword.variant, 60));
            } else {
                println!(
                    "   {}  → {}",
                    truncate(&keyword.variant, 40),
                    keyword.label
                );
            }
        }
    }

    Ok(())
}

/// Show the payee and category a description gets
pub fn cmd_classify(
    sources: &ConfigSources<'_>,
    description: &str,
    amount: f64,
    policy: ResolverPolicy,
    json: bool,
) -> Result<()> {
    let pipeline = load_pipeline(sources, policy)?;
    let result = pipeline.classify(description, amount);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("🏷️  {}", description);
    match (&result.payee, &result.label) {
        (Some(payee), Some(label)) if payee != label => {
            println!("   Payee: {} (matched '{}')", label, payee)
        }
        (Some(payee), _) => println!("   Payee: {}", payee),
        (None, _) => println!("   Payee: (no match)"),
    }
    println!("   Category: {}", result.category);

    Ok(())
}
