//! Line-oriented content heuristics.
//!
//! Everything here is pure and total over arbitrary string input, including
//! the empty string. Classification is deterministic: no NLP, no I/O.

// Static regex patterns are guaranteed to compile, so expect() is safe
#![allow(clippy::expect_used)]

use crate::config::{ContentThresholds, QualityThresholds};
use crate::models::{ContentProfile, ContentStatus, ContextFileKind};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Matches a `*Last Updated: YYYY-MM-DD*` metadata marker line.
static LAST_UPDATED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\*Last Updated:\s*(\d{4}-\d{2}-\d{2})\*?\s*$")
        .expect("static regex: last-updated marker")
});

/// Raw scan counts for one file's text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentScan {
    /// Characters on template/guidance lines (non-blank only).
    pub template_chars: usize,
    /// Characters on all non-blank lines.
    pub total_chars: usize,
    /// Template characters as a share of all non-blank characters, 0..=100.
    pub template_percentage: u8,
    /// Lines that are neither blank, template, nor headings.
    pub substantive_lines: usize,
    /// Characters on substantive lines.
    pub substantive_chars: usize,
    /// `##` sections with no substantive line before the next heading.
    pub empty_sections: usize,
}

/// Returns true for placeholder/guidance lines a template leaves behind.
///
/// A line is template content when it opens or closes an HTML comment,
/// carries a `GUIDANCE:` / `TIP:` / `Example:` marker, or is the
/// `*Last Updated*` metadata line.
#[must_use]
pub fn is_template_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with("<!--")
        || trimmed == "-->"
        || trimmed.contains("GUIDANCE:")
        || trimmed.contains("TIP:")
        || trimmed.contains("Example:")
        || LAST_UPDATED_RE.is_match(trimmed)
}

fn is_heading(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

/// Scans text into raw counts.
///
/// The percentage is computed over character sums of non-blank lines, not
/// line counts; zero non-blank characters counts as 100% template.
#[must_use]
pub fn scan_content(text: &str) -> ContentScan {
    let mut scan = ContentScan::default();
    let mut in_section = false;
    let mut section_has_content = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        scan.total_chars += trimmed.chars().count();
        let template = is_template_line(line);
        if template {
            scan.template_chars += trimmed.chars().count();
        }

        if trimmed.starts_with("## ") {
            if in_section && !section_has_content {
                scan.empty_sections += 1;
            }
            in_section = true;
            section_has_content = false;
            continue;
        }

        if !template && !is_heading(line) {
            scan.substantive_lines += 1;
            scan.substantive_chars += trimmed.chars().count();
            if in_section {
                section_has_content = true;
            }
        }
    }
    if in_section && !section_has_content {
        scan.empty_sections += 1;
    }

    scan.template_percentage = if scan.total_chars == 0 {
        100
    } else {
        #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]
        let pct = ((scan.template_chars as f64 / scan.total_chars as f64) * 100.0).round() as u8;
        pct
    };

    scan
}

/// Derives a [`ContentProfile`] from text under the given thresholds.
#[must_use]
pub fn profile_content(
    text: &str,
    quality: &QualityThresholds,
    content: &ContentThresholds,
) -> ContentProfile {
    let scan = scan_content(text);

    let is_template_only = scan.template_percentage >= quality.critical
        || (scan.substantive_lines <= content.min_content_lines
            && scan.template_percentage > quality.well_populated);

    let status = if scan.substantive_lines == 0 {
        ContentStatus::Empty
    } else if scan.substantive_chars < content.min_content_length
        || scan.substantive_lines < content.min_content_lines
    {
        ContentStatus::Short
    } else {
        ContentStatus::Populated
    };

    ContentProfile {
        content_length: scan.substantive_chars,
        content_lines: scan.substantive_lines,
        empty_sections: scan.empty_sections,
        template_percentage: scan.template_percentage,
        is_template_only,
        status,
    }
}

/// Returns true when any required `##` heading is absent verbatim.
#[must_use]
pub fn has_missing_sections(text: &str, kind: ContextFileKind) -> bool {
    kind.required_sections()
        .iter()
        .any(|section| !text.contains(section))
}

/// Parses the `*Last Updated: YYYY-MM-DD*` marker, returning the date and
/// its 1-indexed line number.
#[must_use]
pub fn find_last_updated(text: &str) -> Option<(NaiveDate, usize)> {
    for (idx, line) in text.lines().enumerate() {
        if let Some(caps) = LAST_UPDATED_RE.captures(line.trim()) {
            if let Some(date) = caps
                .get(1)
                .and_then(|m| NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").ok())
            {
                return Some((date, idx + 1));
            }
        }
    }
    None
}

/// Refreshes (or appends) the `*Last Updated*` marker with the given date.
#[must_use]
pub fn refresh_last_updated(text: &str, today: NaiveDate) -> String {
    let marker = format!("*Last Updated: {}*", today.format("%Y-%m-%d"));
    if find_last_updated(text).is_some() {
        text.lines()
            .map(|line| {
                if LAST_UPDATED_RE.is_match(line.trim()) {
                    marker.clone()
                } else {
                    line.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    } else if text.is_empty() {
        marker
    } else {
        format!("{}\n\n{marker}", text.trim_end())
    }
}

/// Appends the required sections a file is missing, as empty headings.
#[must_use]
pub fn insert_missing_sections(text: &str, kind: ContextFileKind) -> String {
    let mut out = text.trim_end().to_string();
    for section in kind.required_sections() {
        if !out.contains(section) {
            if !out.is_empty() {
                out.push_str("\n\n");
            }
            out.push_str(section);
            out.push('\n');
        }
    }
    out
}
