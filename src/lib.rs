//! # cxt
//!
//! Git-tracked context files for AI coding assistants.
//!
//! cxt manages a small set of markdown documents inside a project's `.cxt/`
//! directory: `context.md` (stable project background), `plan.md` (the
//! branch-specific implementation plan), and `guardrail.md` (stable
//! constraints). Git is the storage and history backend.
//!
//! ## Features
//!
//! - Branch-aware plan sync: `plan.md` follows whichever branch is checked
//!   out, with per-branch snapshots kept under `.cxt/.plan-history/`
//! - Content health checks: deterministic heuristics flag template-heavy,
//!   mostly-empty, section-less, and stale files
//! - Auto-heal for the subset of issues fixable without human judgment
//! - Git hook installation so syncs fire on checkout and merge
//!
//! ## Example
//!
//! ```rust,ignore
//! use cxt::{CxtConfig, PlanSynchronizer, SyncOptions};
//!
//! let config = CxtConfig::load_default();
//! let sync = PlanSynchronizer::new(config, repo, store);
//! let result = sync.sync_plan(&SyncOptions::default())?;
//! println!("now on {}", result.current_branch);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod cli;
pub mod config;
pub mod git;
pub mod hooks;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;
pub mod templates;

// Re-exports for convenience
pub use config::{ContentThresholds, CxtConfig, QualityThresholds};
pub use git::{RepoContext, WorkingTreeStatus};
pub use models::{
    ContentProfile, ContentStatus, ContextFileKind, HealthIssue, HealthStatus, IssueKind,
    IssueSeverity, OverallHealth, PlanStyle, PlanSyncState, SyncOptions, SyncPlanResult,
};
pub use services::{ContentValidator, CxtLayout, PlanSynchronizer};
pub use storage::{FileStore, FilesystemStore, MemoryStore};

/// Error type for cxt operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `Repository` | The project is not under version control, or a git call failed |
/// | `DirtyPlan` | A sync would discard uncommitted `plan.md` edits |
/// | `Storage` | Filesystem reads/writes fail (permissions, missing dirs, disk) |
/// | `InvalidInput` | Malformed user-supplied values (style names, shell names) |
#[derive(Debug, ThisError)]
pub enum Error {
    /// The project is not a git repository, or the underlying git call failed.
    ///
    /// Never retried by the core; the CLI layer may suggest remediation such
    /// as running `git init`.
    #[error("repository error: {0}")]
    Repository(String),

    /// The live plan has uncommitted modifications and the caller did not
    /// request a silent/forced sync.
    ///
    /// Recoverable by the user: commit, discard, or pass `--silent`.
    #[error("plan.md has uncommitted changes: commit or discard them before switching (or sync with --silent)")]
    DirtyPlan,

    /// A filesystem operation failed.
    ///
    /// Propagated verbatim; the core only pre-checks existence where that is
    /// part of its control flow.
    #[error("storage operation '{operation}' failed: {cause}")]
    Storage {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - An unknown plan style or output format name is given
    /// - A branch name is empty
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for cxt operations.
pub type Result<T> = std::result::Result<T, Error>;
