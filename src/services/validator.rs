//! Content health checks and auto-heal.
//!
//! Turns raw file text into an actionable issue list plus a single severity
//! verdict, using deterministic line-oriented heuristics. Malformed or empty
//! content is data, not failure: nothing in the check path returns an error.

use crate::config::CxtConfig;
use crate::models::{
    AlignmentReport, ContextFileKind, HealthIssue, HealthStatus, IssueKind, IssueSeverity,
};
use crate::services::content_scan;
use crate::services::CxtLayout;
use crate::storage::FileStore;
use crate::{Error, Result};
use std::collections::BTreeMap;
use tracing::instrument;

/// Validates context file content and applies automatic fixes.
pub struct ContentValidator<S> {
    config: CxtConfig,
    layout: CxtLayout,
    store: S,
}

impl<S: FileStore> ContentValidator<S> {
    /// Creates a validator over the given store.
    #[must_use]
    pub fn new(config: CxtConfig, store: S) -> Self {
        let layout = CxtLayout::new(&config.root);
        Self {
            config,
            layout,
            store,
        }
    }

    /// Loads the managed files that exist on disk.
    ///
    /// Absent files are simply absent from the map.
    ///
    /// # Errors
    ///
    /// Returns an error only for genuine storage faults.
    pub fn load_files(&self) -> Result<BTreeMap<ContextFileKind, String>> {
        let mut files = BTreeMap::new();
        for kind in ContextFileKind::all() {
            if let Some(content) = self.store.read_to_string(&self.layout.context_file(kind))? {
                files.insert(kind, content);
            }
        }
        Ok(files)
    }

    /// Runs the health check over the supplied file contents.
    ///
    /// `quick` skips the staleness pass, whose outcome depends on the
    /// current date; everything else is a pure function of the input.
    #[instrument(skip(self, files), fields(operation = "health.check"))]
    #[must_use]
    pub fn check_health(
        &self,
        files: &BTreeMap<ContextFileKind, String>,
        quick: bool,
    ) -> HealthStatus {
        let mut issues = Vec::new();

        for (&kind, content) in files {
            self.common_issues(kind, content, &mut issues);
        }

        if !quick {
            let today = chrono::Local::now().date_naive();
            for (&kind, content) in files {
                self.staleness_issue(kind, content, today, &mut issues);
            }
        }

        let suggestions = self.synthesize_suggestions(&issues);
        let overall = HealthStatus::derive_overall(&issues);
        metrics::counter!("health_check_total", "overall" => overall.to_string()).increment(1);

        HealthStatus {
            overall,
            issues,
            suggestions,
            last_checked: u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0),
            alignments: AlignmentReport::default(),
        }
    }

    /// Missing-sections, template-ratio, and emptiness checks for one file.
    fn common_issues(&self, kind: ContextFileKind, content: &str, issues: &mut Vec<HealthIssue>) {
        if content_scan::has_missing_sections(content, kind) {
            issues.push(
                HealthIssue::new(
                    IssueKind::MissingSections,
                    IssueSeverity::Warning,
                    kind,
                    "Missing required sections",
                )
                .with_suggestion(format!("Run `cxt heal` to append the standard {kind} headings"))
                .auto_fixable(),
            );
        }

        let profile =
            content_scan::profile_content(content, &self.config.quality, &self.config.content);
        let pct = profile.template_percentage;
        let quality = &self.config.quality;

        let mut template_issue_raised = false;
        if pct > quality.well_populated {
            template_issue_raised = true;
            if pct >= quality.critical || profile.is_template_only {
                issues.push(
                    HealthIssue::new(
                        IssueKind::TemplateHeavy,
                        IssueSeverity::Error,
                        kind,
                        format!(
                            "{kind} is {pct}% template content; it should be {}",
                            kind.purpose()
                        ),
                    )
                    .with_percentage(pct),
                );
            } else if pct >= quality.mild_warning {
                issues.push(
                    HealthIssue::new(
                        IssueKind::TemplateHeavy,
                        IssueSeverity::Warning,
                        kind,
                        format!("{kind} is {pct}% template content; replace the remaining placeholders"),
                    )
                    .with_percentage(pct),
                );
            } else {
                issues.push(
                    HealthIssue::new(
                        IssueKind::TemplateHeavy,
                        IssueSeverity::Warning,
                        kind,
                        format!("{kind} still carries template content ({pct}%); consider finishing it"),
                    )
                    .with_percentage(pct),
                );
            }
        }

        // Emptiness is a fallback, only entered when the template pass was
        // silent, so the two checks stay mutually exclusive per file.
        if !template_issue_raised && content.trim().len() < self.config.content.min_content_length {
            issues.push(HealthIssue::new(
                IssueKind::MostlyEmpty,
                IssueSeverity::Warning,
                kind,
                format!("{kind} is mostly empty"),
            ));
        }
    }

    /// Staleness check for one file's `*Last Updated*` marker.
    fn staleness_issue(
        &self,
        kind: ContextFileKind,
        content: &str,
        today: chrono::NaiveDate,
        issues: &mut Vec<HealthIssue>,
    ) {
        let Some((date, line)) = content_scan::find_last_updated(content) else {
            return;
        };
        let age_days = (today - date).num_days();
        if age_days > self.config.stale_after_days {
            issues.push(
                HealthIssue::new(
                    IssueKind::StaleTimestamp,
                    IssueSeverity::Warning,
                    kind,
                    format!("{kind} was last updated {age_days} days ago"),
                )
                .at_line(line)
                .auto_fixable(),
            );
        }
    }

    /// Derives next-step suggestions from the aggregated issues.
    fn synthesize_suggestions(&self, issues: &[HealthIssue]) -> Vec<String> {
        let mut suggestions = Vec::new();

        let template_issues: Vec<&HealthIssue> = issues
            .iter()
            .filter(|i| i.kind == IssueKind::TemplateHeavy)
            .collect();

        let critical: Vec<&&HealthIssue> = template_issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Error)
            .collect();
        if !critical.is_empty() {
            suggestions.push(format!(
                "{} file(s) are essentially all template (avg {}%): fill them in before relying on them",
                critical.len(),
                average_percentage(&critical)
            ));
        }

        let warnings: Vec<&&HealthIssue> = template_issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Warning)
            .collect();
        if !warnings.is_empty() {
            suggestions.push(format!(
                "{} file(s) still carry template content (avg {}%)",
                warnings.len(),
                average_percentage(&warnings)
            ));
        }

        if !template_issues.is_empty() {
            suggestions.push(
                "Replace <!-- GUIDANCE --> comments with real content as decisions land".to_string(),
            );
            suggestions
                .push("Each section's inline guidance describes what belongs there".to_string());
        }

        let fixable = issues.iter().filter(|i| i.auto_fixable).count();
        if fixable > 0 {
            suggestions.push(format!(
                "Run `cxt heal` to fix {fixable} issue(s) automatically"
            ));
        }

        let warning_count = issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Warning)
            .count();
        if warning_count > 3 {
            suggestions.push("Review the context files regularly to keep them useful".to_string());
        }

        suggestions
    }

    /// Applies automatic fixes for the fixable issues.
    ///
    /// Dispatch is on the typed issue kind. Returns a description of each
    /// applied (or, in dry-run mode, proposed) fix; in dry-run mode nothing
    /// is written.
    ///
    /// # Errors
    ///
    /// Returns an error if a read or write fails mid-heal.
    #[instrument(skip(self, issues), fields(operation = "health.heal"))]
    pub fn auto_heal(&self, issues: &[HealthIssue], dry_run: bool) -> Result<Vec<String>> {
        let mut descriptions = Vec::new();

        for issue in issues.iter().filter(|i| i.auto_fixable) {
            match issue.kind {
                IssueKind::MissingSections => {
                    let path = self.layout.context_file(issue.file);
                    let content = self.store.read_to_string(&path)?.unwrap_or_default();
                    let healed = content_scan::insert_missing_sections(&content, issue.file);
                    if healed == content {
                        continue;
                    }
                    if !dry_run {
                        self.store.write(&path, &healed)?;
                    }
                    descriptions.push(format!(
                        "{}: appended the missing required sections",
                        issue.file
                    ));
                },
                IssueKind::StaleTimestamp => {
                    let path = self.layout.context_file(issue.file);
                    let Some(content) = self.store.read_to_string(&path)? else {
                        continue;
                    };
                    let today = chrono::Local::now().date_naive();
                    let healed = content_scan::refresh_last_updated(&content, today);
                    if !dry_run {
                        self.store.write(&path, &healed)?;
                    }
                    descriptions.push(format!("{}: refreshed the Last Updated marker", issue.file));
                },
                // Not fixable without human judgment; nothing to do even if
                // a caller hands us one flagged fixable.
                IssueKind::TemplateHeavy | IssueKind::MostlyEmpty => {},
            }
        }

        Ok(descriptions)
    }

    /// Convenience: load the on-disk files and check them.
    ///
    /// # Errors
    ///
    /// Returns an error only for storage faults while loading.
    pub fn check_disk(&self, quick: bool) -> Result<HealthStatus> {
        let files = self.load_files()?;
        Ok(self.check_health(&files, quick))
    }

    /// Returns a storage error for a missing `.cxt` directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the project has not been initialized.
    pub fn ensure_initialized(&self) -> Result<()> {
        if self.store.exists(self.layout.cxt_dir()) {
            Ok(())
        } else {
            Err(Error::Storage {
                operation: "open_cxt_dir".to_string(),
                cause: format!(
                    "{} does not exist; run `cxt init` first",
                    self.layout.cxt_dir().display()
                ),
            })
        }
    }
}

/// Integer average of the issues' structured template percentages.
fn average_percentage(issues: &[&&HealthIssue]) -> u8 {
    if issues.is_empty() {
        return 0;
    }
    let sum: u32 = issues
        .iter()
        .filter_map(|i| i.template_percentage.map(u32::from))
        .sum();
    #[allow(clippy::cast_possible_truncation)]
    let avg = (f64::from(sum) / issues.len() as f64).round() as u8;
    avg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentStatus, OverallHealth};
    use crate::storage::MemoryStore;

    fn validator() -> ContentValidator<MemoryStore> {
        let config = CxtConfig::default().with_root("/project");
        ContentValidator::new(config, MemoryStore::new())
    }

    fn populated_context() -> String {
        let mut text = String::from(
            "## Project Purpose\nA build-log analyzer for CI pipelines.\n\
             ## Core Problem\nFailures drown in noise and nobody reads raw logs.\n\
             ## Solution\nParse, cluster, and rank failures by novelty.\n\
             ## Target Users\nInfra engineers on call for CI.\n",
        );
        text.push_str("Extra detail so the length clears the emptiness threshold.\n");
        text
    }

    #[test]
    fn test_healthy_file_yields_no_issues() {
        let v = validator();
        let mut files = BTreeMap::new();
        files.insert(ContextFileKind::Context, populated_context());

        let status = v.check_health(&files, true);
        assert_eq!(status.overall, OverallHealth::Healthy);
        assert!(status.issues.is_empty());
        assert!(status.suggestions.is_empty());
    }

    #[test]
    fn test_empty_file_is_exactly_one_error_issue() {
        let v = validator();
        let mut files = BTreeMap::new();
        files.insert(ContextFileKind::Plan, String::new());

        let status = v.check_health(&files, true);
        let plan_template_errors: Vec<_> = status
            .issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Error)
            .collect();
        assert_eq!(plan_template_errors.len(), 1);
        assert_eq!(plan_template_errors[0].kind, IssueKind::TemplateHeavy);
        assert_eq!(plan_template_errors[0].template_percentage, Some(100));
        assert_eq!(status.overall, OverallHealth::Error);
        // Emptiness fallback must not double-report.
        assert!(!status.issues.iter().any(|i| i.kind == IssueKind::MostlyEmpty));
    }

    #[test]
    fn test_pure_guidance_is_critical() {
        let v = validator();
        let mut files = BTreeMap::new();
        files.insert(
            ContextFileKind::Context,
            "<!-- GUIDANCE: fill this in -->\n<!-- GUIDANCE: fill this in -->\n".to_string(),
        );

        let status = v.check_health(&files, true);
        assert_eq!(status.overall, OverallHealth::Error);
        let issue = status
            .issues
            .iter()
            .find(|i| i.kind == IssueKind::TemplateHeavy)
            .unwrap();
        assert_eq!(issue.template_percentage, Some(100));
        assert!(issue.message.contains("100%"));
        assert!(issue.message.contains(ContextFileKind::Context.purpose()));
        assert!(!issue.auto_fixable);
    }

    #[test]
    fn test_short_substantive_file_is_mostly_empty() {
        let v = validator();
        let mut files = BTreeMap::new();
        // No template markers at all, but under 100 trimmed chars.
        files.insert(ContextFileKind::Guardrail, "Do not break the API.".to_string());

        let status = v.check_health(&files, true);
        let kinds: Vec<IssueKind> = status.issues.iter().map(|i| i.kind).collect();
        assert!(kinds.contains(&IssueKind::MostlyEmpty));
        assert!(!kinds.contains(&IssueKind::TemplateHeavy));
        assert_eq!(status.overall, OverallHealth::Warning);
    }

    #[test]
    fn test_missing_sections_is_coarse_and_fixable() {
        let v = validator();
        let mut files = BTreeMap::new();
        files.insert(ContextFileKind::Context, populated_context().replace("## Solution", "## Fix"));

        let status = v.check_health(&files, true);
        let issue = status
            .issues
            .iter()
            .find(|i| i.kind == IssueKind::MissingSections)
            .unwrap();
        assert_eq!(issue.message, "Missing required sections");
        assert!(issue.auto_fixable);
    }

    #[test]
    fn test_determinism_quick() {
        let v = validator();
        let mut files = BTreeMap::new();
        files.insert(ContextFileKind::Plan, "## Goal\nship\n".to_string());
        files.insert(ContextFileKind::Context, String::new());

        let a = v.check_health(&files, true);
        let b = v.check_health(&files, true);

        assert_eq!(a.overall, b.overall);
        assert_eq!(a.suggestions, b.suggestions);
        assert_eq!(a.issues.len(), b.issues.len());
        for (x, y) in a.issues.iter().zip(b.issues.iter()) {
            assert_eq!(x.kind, y.kind);
            assert_eq!(x.severity, y.severity);
            assert_eq!(x.message, y.message);
        }
    }

    #[test]
    fn test_stale_marker_flagged_unless_quick() {
        let v = validator();
        let mut files = BTreeMap::new();
        files.insert(
            ContextFileKind::Context,
            format!("{}\n*Last Updated: 2020-01-01*\n", populated_context()),
        );

        let quick = v.check_health(&files, true);
        assert!(!quick.issues.iter().any(|i| i.kind == IssueKind::StaleTimestamp));

        let full = v.check_health(&files, false);
        let stale = full
            .issues
            .iter()
            .find(|i| i.kind == IssueKind::StaleTimestamp)
            .unwrap();
        assert!(stale.auto_fixable);
        assert!(stale.line.is_some());
    }

    #[test]
    fn test_suggestions_report_counts_and_average() {
        let v = validator();
        let mut files = BTreeMap::new();
        files.insert(ContextFileKind::Context, String::new());
        files.insert(ContextFileKind::Plan, String::new());

        let status = v.check_health(&files, true);
        let first = &status.suggestions[0];
        assert!(first.contains("2 file(s)"));
        assert!(first.contains("100%"));
        // Fixed guidance pointers follow when template issues exist.
        assert!(status.suggestions.iter().any(|s| s.contains("GUIDANCE")));
    }

    #[test]
    fn test_auto_heal_inserts_sections() {
        let v = validator();
        let path = v.layout.context_file(ContextFileKind::Plan);
        v.store.write(&path, "## Goal\nship the parser\n").unwrap();

        let issue = HealthIssue::new(
            IssueKind::MissingSections,
            IssueSeverity::Warning,
            ContextFileKind::Plan,
            "Missing required sections",
        )
        .auto_fixable();

        let descriptions = v.auto_heal(&[issue], false).unwrap();
        assert_eq!(descriptions.len(), 1);
        let healed = v.store.read_to_string(&path).unwrap().unwrap();
        assert!(healed.contains("## Approach"));
        assert!(healed.contains("## Steps"));
    }

    #[test]
    fn test_auto_heal_dry_run_writes_nothing() {
        let v = validator();
        let path = v.layout.context_file(ContextFileKind::Plan);
        v.store.write(&path, "## Goal\nship\n").unwrap();

        let issue = HealthIssue::new(
            IssueKind::MissingSections,
            IssueSeverity::Warning,
            ContextFileKind::Plan,
            "Missing required sections",
        )
        .auto_fixable();

        let descriptions = v.auto_heal(&[issue], true).unwrap();
        assert_eq!(descriptions.len(), 1);
        assert_eq!(
            v.store.read_to_string(&path).unwrap().as_deref(),
            Some("## Goal\nship\n")
        );
    }

    #[test]
    fn test_auto_heal_refreshes_stale_marker() {
        let v = validator();
        let path = v.layout.context_file(ContextFileKind::Context);
        v.store
            .write(&path, "# Context\n*Last Updated: 2020-01-01*\nbody\n")
            .unwrap();

        let issue = HealthIssue::new(
            IssueKind::StaleTimestamp,
            IssueSeverity::Warning,
            ContextFileKind::Context,
            "stale",
        )
        .auto_fixable();

        v.auto_heal(&[issue], false).unwrap();
        let healed = v.store.read_to_string(&path).unwrap().unwrap();
        assert!(!healed.contains("2020-01-01"));
        assert!(healed.contains("*Last Updated: "));
    }

    #[test]
    fn test_auto_heal_skips_unfixable_kinds() {
        let v = validator();
        let issue = HealthIssue::new(
            IssueKind::TemplateHeavy,
            IssueSeverity::Error,
            ContextFileKind::Context,
            "template heavy",
        )
        .auto_fixable();

        let descriptions = v.auto_heal(&[issue], false).unwrap();
        assert!(descriptions.is_empty());
    }

    #[test]
    fn test_profile_status_classification() {
        let config = CxtConfig::default();
        let profile = crate::services::content_scan::profile_content(
            "one line of text only here\n",
            &config.quality,
            &config.content,
        );
        assert_eq!(profile.status, ContentStatus::Short);
    }
}
