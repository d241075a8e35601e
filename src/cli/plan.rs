//! Plan snapshot management commands.

use crate::git::BranchSource;
use crate::services::PlanSynchronizer;
use crate::storage::FileStore;
use crate::Result;

/// Lists the sanitized branch keys with saved snapshots.
///
/// # Errors
///
/// Returns an error if the history directory cannot be listed.
pub fn cmd_plan_list<R: BranchSource, S: FileStore>(
    synchronizer: &PlanSynchronizer<R, S>,
) -> Result<Vec<String>> {
    synchronizer.list_branch_plans()
}

/// Archives a branch's snapshot into the completed namespace.
///
/// Returns true when a snapshot existed and was moved.
///
/// # Errors
///
/// Returns an error if the move fails.
pub fn cmd_plan_archive<R: BranchSource, S: FileStore>(
    synchronizer: &PlanSynchronizer<R, S>,
    branch: &str,
) -> Result<bool> {
    let had_plan = synchronizer.has_branch_plan(branch);
    synchronizer.archive_plan(branch)?;
    Ok(had_plan)
}
