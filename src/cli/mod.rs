//! CLI command implementations.
//!
//! This module provides the command-line interface for cxt. Each submodule
//! implements a specific CLI command; rendering goes through a caller-
//! supplied writer so the binary owns all terminal output.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `init` | Scaffold `.cxt/` with starter context files |
//! | `sync` | Sync `plan.md` with the checked-out branch |
//! | `status` | Quick health summary of the context files |
//! | `validate` | Full health check including staleness |
//! | `heal` | Apply automatic fixes for fixable issues |
//! | `plan` | List or archive per-branch plan snapshots |
//! | `hook` | Install git hooks that sync on checkout/merge |
//!
//! # Example Usage
//!
//! ```bash
//! # First-time setup
//! cxt init
//! cxt hook install
//!
//! # After switching branches (automatic once hooks are installed)
//! cxt sync
//!
//! # Check and fix content quality
//! cxt validate
//! cxt heal --dry-run
//! ```

mod heal;
mod init;
mod plan;
mod status;
mod sync;

pub use heal::cmd_heal;
pub use init::cmd_init;
pub use plan::{cmd_plan_archive, cmd_plan_list};
pub use status::{write_health_json, write_health_text};
pub use sync::{cmd_sync, write_sync_result};

use std::str::FromStr;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text (default).
    #[default]
    Text,
    /// JSON for scripting.
    Json,
}

impl FromStr for OutputFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(crate::Error::InvalidInput(format!(
                "Invalid output format: {s}. Expected: text or json"
            ))),
        }
    }
}
