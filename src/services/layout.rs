//! Centralized path construction for the `.cxt/` directory tree.

use crate::models::ContextFileKind;
use std::path::{Path, PathBuf};

/// Name of the per-branch plan snapshot directory.
pub const PLAN_HISTORY_DIR: &str = ".plan-history";

/// Sub-namespace for archived plan snapshots.
pub const COMPLETED_DIR: &str = "completed";

/// Name of the persisted sync state file.
pub const PLAN_STATE_FILE: &str = ".plan-state.json";

/// Path layout for one project's `.cxt/` directory.
///
/// All paths the synchronizer and validator touch are constructed here, so
/// the on-disk contract lives in one place:
///
/// - `<root>/.cxt/plan.md` — live plan for the current branch
/// - `<root>/.cxt/.plan-history/<key>.md` — per-branch snapshot
/// - `<root>/.cxt/.plan-history/completed/<key>.md` — archived snapshot
/// - `<root>/.cxt/.plan-state.json` — last-branch record
#[derive(Debug, Clone)]
pub struct CxtLayout {
    cxt_dir: PathBuf,
}

impl CxtLayout {
    /// Creates a layout rooted at the project directory.
    #[must_use]
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            cxt_dir: project_root.as_ref().join(crate::config::CXT_DIR_NAME),
        }
    }

    /// Returns the `.cxt` directory.
    #[must_use]
    pub fn cxt_dir(&self) -> &Path {
        &self.cxt_dir
    }

    /// Returns the path of a managed context file.
    #[must_use]
    pub fn context_file(&self, kind: ContextFileKind) -> PathBuf {
        self.cxt_dir.join(kind.file_name())
    }

    /// Returns the live plan path.
    #[must_use]
    pub fn plan_file(&self) -> PathBuf {
        self.context_file(ContextFileKind::Plan)
    }

    /// Returns the plan history directory.
    #[must_use]
    pub fn history_dir(&self) -> PathBuf {
        self.cxt_dir.join(PLAN_HISTORY_DIR)
    }

    /// Returns the archive directory inside the plan history.
    #[must_use]
    pub fn archive_dir(&self) -> PathBuf {
        self.history_dir().join(COMPLETED_DIR)
    }

    /// Returns the snapshot path for a sanitized branch key.
    #[must_use]
    pub fn history_slot(&self, key: &str) -> PathBuf {
        self.history_dir().join(format!("{key}.md"))
    }

    /// Returns the archived snapshot path for a sanitized branch key.
    #[must_use]
    pub fn archive_slot(&self, key: &str) -> PathBuf {
        self.archive_dir().join(format!("{key}.md"))
    }

    /// Returns the sync state file path.
    #[must_use]
    pub fn state_file(&self) -> PathBuf {
        self.cxt_dir.join(PLAN_STATE_FILE)
    }

    /// Returns the live plan path relative to the project root, for status
    /// queries against the repository.
    #[must_use]
    pub fn plan_rel_path(&self) -> PathBuf {
        Path::new(crate::config::CXT_DIR_NAME).join(ContextFileKind::Plan.file_name())
    }
}
