//! CLI argument definitions using clap
//!
//! This module contains the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Kasboek - Combine bank statement exports into a monthly category workbook
#[derive(Parser)]
#[command(name = "kasboek")]
#[command(about = "Combine and classify bank statement exports", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Column translation config (TOML, JSON or YAML)
    ///
    /// Defaults to column_translations.toml in the kasboek config directory
    /// when present, otherwise the built-in Dutch export mapping.
    #[arg(long, global = true)]
    pub translations: Option<PathBuf>,

    /// Category mapping config (TOML, JSON or YAML)
    ///
    /// Defaults to category_mapping.toml in the kasboek config directory
    /// when present, otherwise the built-in mapping.
    #[arg(long, global = true)]
    pub categories: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Combine two statement exports into one workbook
    Combine {
        /// First statement export (xls, xlsx or csv)
        first: PathBuf,

        /// Second statement export (xls, xlsx or csv)
        second: PathBuf,

        /// Output workbook
        #[arg(short, long, default_value = "combined_output.xlsx")]
        output: PathBuf,

        /// Keep unmatched credits in the default category instead of Salary
        #[arg(long)]
        no_salary_override: bool,

        /// Category for transactions without a known payee
        #[arg(long, default_value = "Other")]
        default_category: String,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the payee and category a description would get
    Classify {
        /// Transaction description
        description: String,

        /// Transaction amount (positive for credits)
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        amount: f64,

        /// Keep unmatched credits in the default category instead of Salary
        #[arg(long)]
        no_salary_override: bool,

        /// Category for transactions without a known payee
        #[arg(long, default_value = "Other")]
        default_category: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load and validate the translation and category configs
    Check,

    /// List categories and their keywords in match order
    Categories {
        /// Only show this category
        category: Option<String>,
    },
}
