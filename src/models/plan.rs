//! Plan synchronization models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named snapshot of plan content for one branch.
///
/// Created when a sync detects a branch switch and the outgoing plan has
/// non-blank content; overwritten on every later save from the same branch;
/// removed only by an explicit archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchPlan {
    /// Raw git branch name (may contain `/`).
    pub branch_name: String,
    /// Filename-safe storage key derived from the branch name.
    ///
    /// The derivation is not collision-free (`a/b` and `a-b` share a key);
    /// this matches the on-disk contract and is accepted.
    pub key: String,
    /// Full plan text at snapshot time.
    pub content: String,
}

/// Cross-invocation sync state: the branch the previous sync ended on.
///
/// Each CLI invocation is a fresh process, so switch detection depends
/// entirely on this record being durably written before exit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanSyncState {
    /// Branch name recorded by the last successful sync.
    #[serde(rename = "lastBranch")]
    pub last_branch: String,
}

impl PlanSyncState {
    /// Creates state for a branch.
    #[must_use]
    pub fn new(branch: impl Into<String>) -> Self {
        Self {
            last_branch: branch.into(),
        }
    }
}

/// Style of a freshly created plan file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStyle {
    /// Minimal plan: title and metadata only.
    #[default]
    Blank,
    /// Guided plan: section headings with inline instructional comments.
    Template,
}

impl PlanStyle {
    /// Returns the style as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::Template => "template",
        }
    }

    /// Parses a style string, defaulting to `Blank` for unknown values.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "template" | "guided" => Self::Template,
            _ => Self::Blank,
        }
    }
}

impl fmt::Display for PlanStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Options for a plan sync.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Skip the dirty-plan guard (for automation such as git hooks).
    pub silent: bool,
    /// Create a fresh plan when no snapshot exists for the current branch.
    pub create_if_missing: bool,
    /// Style override for a created plan; `None` uses the configured default.
    pub style: Option<PlanStyle>,
}

impl SyncOptions {
    /// Creates options with `create_if_missing` enabled, the common case.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            silent: false,
            create_if_missing: true,
            style: None,
        }
    }

    /// Enables silent mode.
    #[must_use]
    pub const fn silent(mut self) -> Self {
        self.silent = true;
        self
    }

    /// Sets the style for a created plan.
    #[must_use]
    pub const fn with_style(mut self, style: PlanStyle) -> Self {
        self.style = Some(style);
        self
    }
}

/// Outcome of a plan sync.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SyncPlanResult {
    /// Branch the previous invocation ended on.
    pub previous_branch: String,
    /// Branch this sync resolved.
    pub current_branch: String,
    /// Whether a stored snapshot was restored into the live plan.
    pub restored: bool,
    /// Whether a fresh plan was created.
    pub created: bool,
}

impl SyncPlanResult {
    /// Returns true if the sync changed nothing on disk besides state.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        !self.restored && !self.created
    }

    /// Returns a human-readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.created {
            format!("Created a fresh plan for '{}'", self.current_branch)
        } else if self.restored {
            format!("Restored the plan for '{}'", self.current_branch)
        } else {
            format!("Plan already current for '{}'", self.current_branch)
        }
    }
}
