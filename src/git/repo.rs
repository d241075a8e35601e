//! Repository adapter implementation.

use crate::{Error, Result};
use git2::{Repository, StatusOptions};
use std::path::{Path, PathBuf};

/// Source of the current branch name and plan dirtiness.
///
/// [`RepoContext`] is the production implementation; tests substitute fixed
/// values.
pub trait BranchSource: Send + Sync {
    /// Returns the currently checked-out branch name.
    fn current_branch(&self) -> Result<String>;

    /// Returns true when the given workdir-relative path has uncommitted
    /// modifications (staged or unstaged).
    fn is_path_dirty(&self, rel_path: &Path) -> Result<bool>;
}

/// Working tree status scoped to the files cxt cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingTreeStatus {
    /// Paths with staged changes.
    pub staged: Vec<String>,
    /// Paths with unstaged modifications.
    pub modified: Vec<String>,
    /// Untracked paths.
    pub untracked: Vec<String>,
}

impl WorkingTreeStatus {
    /// Returns true when nothing is staged, modified, or untracked.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.staged.is_empty() && self.modified.is_empty() && self.untracked.is_empty()
    }
}

/// Git repository adapter.
///
/// Wraps `git2` for the two queries the core needs: the current branch name
/// and whether particular paths carry uncommitted changes.
#[derive(Debug, Clone)]
pub struct RepoContext {
    /// Path used to discover the repository.
    path: PathBuf,
}

impl RepoContext {
    /// Creates an adapter for the repository containing `path`.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Creates an adapter for the current working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be resolved.
    pub fn from_cwd() -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|e| Error::Storage {
            operation: "current_dir".to_string(),
            cause: e.to_string(),
        })?;
        Ok(Self::new(cwd))
    }

    fn open(&self) -> Result<Repository> {
        Repository::discover(&self.path)
            .map_err(|e| Error::Repository(format!("not a git repository: {e}")))
    }

    /// Returns the repository workdir root.
    ///
    /// # Errors
    ///
    /// Returns an error outside a repository or for a bare repository.
    pub fn workdir(&self) -> Result<PathBuf> {
        let repo = self.open()?;
        repo.workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| Error::Repository("repository has no working tree".to_string()))
    }

    /// Returns the full working tree status, partitioned into staged,
    /// modified, and untracked paths.
    ///
    /// # Errors
    ///
    /// Returns an error outside a repository or if the status query fails.
    pub fn working_tree_status(&self) -> Result<WorkingTreeStatus> {
        let repo = self.open()?;
        let mut opts = StatusOptions::new();
        opts.include_untracked(true);

        let statuses = repo
            .statuses(Some(&mut opts))
            .map_err(|e| Error::Repository(format!("status query failed: {e}")))?;

        let mut status = WorkingTreeStatus::default();
        for entry in statuses.iter() {
            let Some(path) = entry.path() else { continue };
            let flags = entry.status();

            if flags.intersects(
                git2::Status::INDEX_NEW
                    | git2::Status::INDEX_MODIFIED
                    | git2::Status::INDEX_DELETED
                    | git2::Status::INDEX_RENAMED
                    | git2::Status::INDEX_TYPECHANGE,
            ) {
                status.staged.push(path.to_string());
            }
            if flags.intersects(
                git2::Status::WT_MODIFIED | git2::Status::WT_DELETED | git2::Status::WT_TYPECHANGE,
            ) {
                status.modified.push(path.to_string());
            }
            if flags.contains(git2::Status::WT_NEW) {
                status.untracked.push(path.to_string());
            }
        }
        Ok(status)
    }
}

impl BranchSource for RepoContext {
    fn current_branch(&self) -> Result<String> {
        let repo = self.open()?;
        let head = repo
            .head()
            .map_err(|e| Error::Repository(format!("cannot resolve HEAD: {e}")))?;

        if head.is_branch() {
            head.shorthand()
                .map(ToString::to_string)
                .ok_or_else(|| Error::Repository("branch name is not valid UTF-8".to_string()))
        } else {
            Err(Error::Repository("detached HEAD, not on a branch".to_string()))
        }
    }

    fn is_path_dirty(&self, rel_path: &Path) -> Result<bool> {
        let status = self.working_tree_status()?;
        let rel = rel_path.to_string_lossy();
        Ok(status
            .staged
            .iter()
            .chain(status.modified.iter())
            .any(|p| p.as_str() == rel))
    }
}
