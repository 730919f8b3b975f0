//! Kasboek CLI - Combine and classify bank statement exports
//!
//! Usage:
//!   kasboek combine A.xls B.xls          Combine two exports into combined_output.xlsx
//!   kasboek classify "ALBERT HEIJN 1403" Show the category a description gets
//!   kasboek check                        Validate translation and category configs
//!   kasboek categories                   List categories and their keywords

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let sources = commands::ConfigSources {
        translations: cli.translations.as_deref(),
        categories: cli.categories.as_deref(),
    };

    match cli.command {
        Commands::Combine {
            first,
            second,
            output,
            no_salary_override,
            default_category,
            json,
        } => commands::cmd_combine(
            &sources,
            &first,
            &second,
            &output,
            commands::policy(&default_category, no_salary_override),
            json,
        ),
        Commands::Classify {
            description,
            amount,
            no_salary_override,
            default_category,
            json,
        } => commands::cmd_classify(
            &sources,
            &description,
            amount,
            commands::policy(&default_category, no_salary_override),
            json,
        ),
        Commands::Check => commands::cmd_check(&sources),
        Commands::Categories { category } => {
            commands::cmd_categories(&sources, category.as_deref())
        }
    }
}
