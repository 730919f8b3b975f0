//! Combine command implementation

use std::path::Path;

use anyhow::{Context, Result};
use kasboek_core::{ResolverPolicy, RunSummary};

use super::{load_pipeline, ConfigSources};

pub fn cmd_combine(
    sources: &ConfigSources<'_>,
    first: &Path,
    second: &Path,
    output: &Path,
    policy: ResolverPolicy,
    json: bool,
) -> Result<()> {
    let pipeline = load_pipeline(sources, policy)?;

    if !json {
        println!(
            "📥 Combining {} and {}...",
            first.display(),
            second.display()
        );
    }

    let summary = pipeline
        .run(first, second, output)
        .with_context(|| format!("Failed to combine into {}", output.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary, output);
    }

    Ok(())
}

fn print_summary(summary: &RunSummary, output: &Path) {
    println!(
        "   Read {} + {} transactions",
        summary.first_rows, summary.second_rows
    );
    println!(
        "   Matched: {}  Unmatched: {}",
        summary.matched, summary.unmatched
    );

    println!();
    println!("📊 Totals by category");
    println!("   ─────────────────────────────");
    for (category, total) in &summary.category_totals {
        let count = summary.category_counts.get(category).copied().unwrap_or(0);
        println!("   {:<20} {:>12.2}  ({} tx)", category, total, count);
    }

    let months: Vec<String> = summary.months.iter().map(ToString::to_string).collect();
    println!();
    println!(
        "✅ Wrote {} sheets to {}",
        summary.sheet_count(),
        output.display()
    );
    if !months.is_empty() {
        println!("   Months: {}", months.join(", "));
    }
}
