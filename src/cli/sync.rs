//! Sync CLI command.

use crate::git::BranchSource;
use crate::models::{SyncOptions, SyncPlanResult};
use crate::services::PlanSynchronizer;
use crate::storage::FileStore;
use crate::Result;
use std::io::{self, Write};

/// Runs a plan sync with the given options.
///
/// # Errors
///
/// Propagates repository, dirty-plan, and storage errors from the core.
pub fn cmd_sync<R: BranchSource, S: FileStore>(
    synchronizer: &PlanSynchronizer<R, S>,
    options: &SyncOptions,
) -> Result<SyncPlanResult> {
    synchronizer.sync_plan(options)
}

/// Writes a sync result as text.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_sync_result<W: Write>(writer: &mut W, result: &SyncPlanResult) -> io::Result<()> {
    if result.previous_branch != result.current_branch {
        writeln!(
            writer,
            "{} -> {}",
            result.previous_branch, result.current_branch
        )?;
    }
    writeln!(writer, "{}", result.summary())
}
