//! Starter content for the managed context files.
//!
//! Plan templates are parameterized by branch name and date; the context and
//! guardrail starters carry their required sections with inline guidance.

use crate::models::{ContextFileKind, PlanStyle};
use chrono::NaiveDate;

/// Renders a fresh plan in the given style.
#[must_use]
pub fn plan(style: PlanStyle, branch: &str, date: NaiveDate) -> String {
    match style {
        PlanStyle::Blank => blank_plan(branch, date),
        PlanStyle::Template => guided_plan(branch, date),
    }
}

/// Minimal plan: title and metadata only.
#[must_use]
pub fn blank_plan(branch: &str, date: NaiveDate) -> String {
    format!(
        "# Plan: {branch}\n\n*Last Updated: {}*\n",
        date.format("%Y-%m-%d")
    )
}

/// Guided plan: section headings with inline instructional comments.
#[must_use]
pub fn guided_plan(branch: &str, date: NaiveDate) -> String {
    format!(
        "# Plan: {branch}\n\
         \n\
         *Last Updated: {}*\n\
         \n\
         ## Goal\n\
         <!-- GUIDANCE: one or two sentences on what done looks like for this branch -->\n\
         \n\
         ## Approach\n\
         <!-- GUIDANCE: how you intend to get there; name the modules you expect to touch -->\n\
         \n\
         ## Steps\n\
         <!-- GUIDANCE: ordered, small, checkable steps; strike them out as you go -->\n",
        date.format("%Y-%m-%d")
    )
}

/// Starter content for `context.md`.
#[must_use]
pub fn context_starter(date: NaiveDate) -> String {
    format!(
        "# Project Context\n\
         \n\
         *Last Updated: {}*\n\
         \n\
         ## Project Purpose\n\
         <!-- GUIDANCE: what this project is, in plain language -->\n\
         \n\
         ## Core Problem\n\
         <!-- GUIDANCE: the problem it exists to solve -->\n\
         \n\
         ## Solution\n\
         <!-- GUIDANCE: how it solves that problem. Example: a CLI that wraps the build cache -->\n\
         \n\
         ## Target Users\n\
         <!-- GUIDANCE: who uses it and what they know -->\n",
        date.format("%Y-%m-%d")
    )
}

/// Starter content for `guardrail.md`.
#[must_use]
pub fn guardrail_starter(date: NaiveDate) -> String {
    format!(
        "# Guardrails\n\
         \n\
         *Last Updated: {}*\n\
         \n\
         ## Constraints\n\
         <!-- GUIDANCE: hard limits: runtimes, versions, budgets -->\n\
         \n\
         ## Never Do\n\
         <!-- GUIDANCE: things an assistant must not change. TIP: be concrete -->\n\
         \n\
         ## Always Do\n\
         <!-- GUIDANCE: invariants every change must preserve -->\n",
        date.format("%Y-%m-%d")
    )
}

/// Starter content for one managed file kind.
#[must_use]
pub fn starter(kind: ContextFileKind, branch: &str, date: NaiveDate) -> String {
    match kind {
        ContextFileKind::Context => context_starter(date),
        ContextFileKind::Plan => guided_plan(branch, date),
        ContextFileKind::Guardrail => guardrail_starter(date),
    }
}
