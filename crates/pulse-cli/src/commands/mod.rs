//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (config, data loading, filters)
//! - `analysis` - KPI, trend and insight commands
//! - `report` - Report generation command
//! - `serve` - API server command
//! - `status` - Data and config status command

pub mod analysis;
pub mod core;
pub mod report;
pub mod serve;
pub mod status;

// Re-export command functions for main.rs
pub use analysis::*;
pub use core::*;
pub use report::*;
pub use serve::*;
pub use status::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
