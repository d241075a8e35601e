//! Health check models.
//!
//! Issues carry a typed [`IssueKind`] discriminant so downstream consumers
//! (auto-heal in particular) dispatch on structure rather than on message
//! text, and template percentages travel as numeric fields rather than being
//! re-parsed out of messages.

use crate::models::ContextFileKind;
use serde::Serialize;
use std::fmt;

/// What a health issue is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// One or more required `##` sections are absent.
    MissingSections,
    /// Template/guidance text dominates the file.
    TemplateHeavy,
    /// The file has almost no content of any kind.
    MostlyEmpty,
    /// The `*Last Updated*` marker is older than the staleness window.
    StaleTimestamp,
}

/// Severity of a single issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    /// Worth attention, not blocking.
    Warning,
    /// The file is not serving its purpose.
    Error,
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single detected problem in one context file.
///
/// Produced fresh on every health check; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct HealthIssue {
    /// Typed discriminant for dispatch.
    pub kind: IssueKind,
    /// Severity of this issue.
    pub severity: IssueSeverity,
    /// File the issue was found in.
    pub file: ContextFileKind,
    /// Human-readable description.
    pub message: String,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Whether `auto_heal` can fix this without human judgment.
    pub auto_fixable: bool,
    /// Line number the issue anchors to, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Template percentage that triggered the issue, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_percentage: Option<u8>,
}

impl HealthIssue {
    /// Creates a new issue.
    #[must_use]
    pub fn new(
        kind: IssueKind,
        severity: IssueSeverity,
        file: ContextFileKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            file,
            message: message.into(),
            suggestion: None,
            auto_fixable: false,
            line: None,
            template_percentage: None,
        }
    }

    /// Sets the remediation hint.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Marks the issue as auto-fixable.
    #[must_use]
    pub const fn auto_fixable(mut self) -> Self {
        self.auto_fixable = true;
        self
    }

    /// Sets the anchoring line number.
    #[must_use]
    pub const fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Attaches the triggering template percentage.
    #[must_use]
    pub const fn with_percentage(mut self, percentage: u8) -> Self {
        self.template_percentage = Some(percentage);
        self
    }
}

/// Aggregate verdict over all checked files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallHealth {
    /// No issues at all.
    Healthy,
    /// Issues exist, none error-severity.
    Warning,
    /// At least one error-severity issue.
    Error,
}

impl fmt::Display for OverallHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Alignment verdict for one relationship pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentStatus {
    /// The files agree (currently the only produced value).
    Aligned,
}

/// Cross-file alignment report.
///
/// The relationship set is fixed at exactly these two pairs; the current
/// check is a stub that always reports alignment and never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlignmentReport {
    /// `context.md` against `plan.md`.
    pub context_plan: AlignmentStatus,
    /// Every file against `guardrail.md`.
    pub all_guardrail: AlignmentStatus,
}

impl Default for AlignmentReport {
    fn default() -> Self {
        Self {
            context_plan: AlignmentStatus::Aligned,
            all_guardrail: AlignmentStatus::Aligned,
        }
    }
}

/// Result of a health check: issues, suggestions, and an overall verdict.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Aggregate verdict, derived purely from the issue list.
    pub overall: OverallHealth,
    /// Every detected issue.
    pub issues: Vec<HealthIssue>,
    /// Synthesized next-step suggestions.
    pub suggestions: Vec<String>,
    /// When the check ran (Unix epoch seconds).
    pub last_checked: u64,
    /// Cross-file alignment report.
    pub alignments: AlignmentReport,
}

impl HealthStatus {
    /// Derives the overall verdict from a list of issues.
    #[must_use]
    pub fn derive_overall(issues: &[HealthIssue]) -> OverallHealth {
        if issues.iter().any(|i| i.severity == IssueSeverity::Error) {
            OverallHealth::Error
        } else if issues.is_empty() {
            OverallHealth::Healthy
        } else {
            OverallHealth::Warning
        }
    }

    /// Returns the issues that `auto_heal` can act on.
    #[must_use]
    pub fn fixable_issues(&self) -> Vec<&HealthIssue> {
        self.issues.iter().filter(|i| i.auto_fixable).collect()
    }
}
