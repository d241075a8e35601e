//! Managed context file kinds and derived content metrics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three managed markdown documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextFileKind {
    /// `context.md`: stable project background.
    Context,
    /// `plan.md`: branch-specific implementation plan.
    Plan,
    /// `guardrail.md`: stable constraints.
    Guardrail,
}

impl ContextFileKind {
    /// All managed kinds, in display order.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Context, Self::Plan, Self::Guardrail]
    }

    /// Returns the on-disk file name.
    #[must_use]
    pub const fn file_name(&self) -> &'static str {
        match self {
            Self::Context => "context.md",
            Self::Plan => "plan.md",
            Self::Guardrail => "guardrail.md",
        }
    }

    /// Parses a file name into a kind.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "context.md" | "context" => Some(Self::Context),
            "plan.md" | "plan" => Some(Self::Plan),
            "guardrail.md" | "guardrail" => Some(Self::Guardrail),
            _ => None,
        }
    }

    /// Required `##` section headings for this file.
    #[must_use]
    pub const fn required_sections(&self) -> &'static [&'static str] {
        match self {
            Self::Context => &[
                "## Project Purpose",
                "## Core Problem",
                "## Solution",
                "## Target Users",
            ],
            Self::Plan => &["## Goal", "## Approach", "## Steps"],
            Self::Guardrail => &["## Constraints", "## Never Do", "## Always Do"],
        }
    }

    /// Documented purpose, used in issue messages.
    #[must_use]
    pub const fn purpose(&self) -> &'static str {
        match self {
            Self::Context => "describing what the project is and who it serves",
            Self::Plan => "describing what the current branch is implementing",
            Self::Guardrail => "recording constraints the implementation must respect",
        }
    }
}

impl fmt::Display for ContextFileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_name())
    }
}

/// Content-quality classification of a context file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    /// No substantive content at all.
    Empty,
    /// Some substantive content, below the configured minimums.
    Short,
    /// Enough substantive content to be useful.
    Populated,
}

/// Derived metrics for one file's content. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentProfile {
    /// Characters on substantive (non-template, non-structural) lines.
    pub content_length: usize,
    /// Count of substantive lines.
    pub content_lines: usize,
    /// `##` sections with no substantive line before the next heading.
    pub empty_sections: usize,
    /// Template characters as a share of all non-blank characters, 0..=100.
    pub template_percentage: u8,
    /// Whether the file is effectively all template/guidance text.
    pub is_template_only: bool,
    /// Overall classification.
    pub status: ContentStatus,
}
