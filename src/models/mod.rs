//! Data models for cxt.

mod context_file;
mod health;
mod plan;

pub use context_file::{ContentProfile, ContentStatus, ContextFileKind};
pub use health::{
    AlignmentReport, AlignmentStatus, HealthIssue, HealthStatus, IssueKind, IssueSeverity,
    OverallHealth,
};
pub use plan::{BranchPlan, PlanStyle, PlanSyncState, SyncOptions, SyncPlanResult};
