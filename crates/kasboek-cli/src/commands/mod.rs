//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (config sources, pipeline loading, policy)
//! - `combine` - Combine two statement exports into a workbook
//! - `config` - Config inspection commands (check, categories, classify)

pub mod combine;
pub mod config;
pub mod core;

// Re-export command functions for main.rs
pub use combine::*;
pub use config::*;
pub use core::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
