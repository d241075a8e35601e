//! Git hook installation.
//!
//! Installs small shell scripts into `.git/hooks/` so plan syncs fire
//! automatically on checkout and merge. The scripts run `cxt sync --silent`:
//! silent mode skips the dirty-plan guard, trading safety for not blocking
//! automation.

use crate::storage::FileStore;
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Marker identifying scripts this tool wrote.
const HOOK_MARKER: &str = "# installed by cxt";

/// Hook names that trigger a plan sync.
pub const HOOK_NAMES: [&str; 2] = ["post-checkout", "post-merge"];

/// Returns the script text for one hook.
#[must_use]
pub fn hook_script(hook_name: &str) -> String {
    format!(
        "#!/bin/sh\n{HOOK_MARKER}\n# {hook_name}: keep plan.md matching the checked-out branch\ncxt sync --silent || true\n"
    )
}

/// Outcome of installing one hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookInstall {
    /// Script written.
    Installed(String),
    /// Already ours; rewritten in place.
    Refreshed(String),
    /// A foreign hook occupies the slot and `force` was false.
    SkippedForeign(String),
}

/// Installs the sync hooks into `git_dir/hooks/`.
///
/// Refuses to clobber hooks this tool did not write unless `force` is set.
///
/// # Errors
///
/// Returns an error if the hooks directory cannot be created or a script
/// cannot be written.
pub fn install_hooks(store: &dyn FileStore, git_dir: &Path, force: bool) -> Result<Vec<HookInstall>> {
    let hooks_dir = git_dir.join("hooks");
    store.ensure_dir(&hooks_dir)?;

    let mut outcomes = Vec::new();
    for name in HOOK_NAMES {
        let path = hooks_dir.join(name);
        let existing = store.read_to_string(&path)?;

        let outcome = match existing {
            Some(content) if !content.contains(HOOK_MARKER) && !force => {
                HookInstall::SkippedForeign(name.to_string())
            },
            Some(_) => {
                write_hook(store, &path, name)?;
                HookInstall::Refreshed(name.to_string())
            },
            None => {
                write_hook(store, &path, name)?;
                HookInstall::Installed(name.to_string())
            },
        };
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

fn write_hook(store: &dyn FileStore, path: &Path, name: &str) -> Result<()> {
    store.write(path, &hook_script(name))?;
    mark_executable(path)
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    // The in-memory store has no real file to chmod.
    if !path.exists() {
        return Ok(());
    }
    let perms = std::fs::Permissions::from_mode(0o755);
    std::fs::set_permissions(path, perms).map_err(|e| Error::Storage {
        operation: "chmod_hook".to_string(),
        cause: e.to_string(),
    })
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Resolves the `.git` directory for a project root.
#[must_use]
pub fn git_dir_for(project_root: &Path) -> PathBuf {
    project_root.join(".git")
}
