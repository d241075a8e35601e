//! Git operations.
//!
//! Branch resolution and working-tree status for the repository that owns
//! the `.cxt/` directory.

mod repo;

pub use repo::{BranchSource, RepoContext, WorkingTreeStatus};
