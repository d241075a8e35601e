//! Core services.
//!
//! [`PlanSynchronizer`] owns the branch-indexed plan history;
//! [`ContentValidator`] owns the content-quality heuristics. They share no
//! mutable state beyond the `.cxt/` file tree.

mod content_scan;
mod layout;
mod plan_sync;
mod validator;

pub use content_scan::{ContentScan, scan_content};
pub use layout::CxtLayout;
pub use plan_sync::{PlanSynchronizer, sanitize_branch_name};
pub use validator::ContentValidator;
