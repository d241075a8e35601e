//! Health check integration tests over fixed inputs.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use cxt::config::CxtConfig;
use cxt::models::{ContextFileKind, IssueKind, IssueSeverity, OverallHealth};
use cxt::services::ContentValidator;
use cxt::storage::{FileStore, FilesystemStore, MemoryStore};
use std::collections::BTreeMap;
use tempfile::TempDir;

fn validator() -> ContentValidator<MemoryStore> {
    ContentValidator::new(CxtConfig::default().with_root("/p"), MemoryStore::new())
}

fn populated(body: &str) -> String {
    // Long enough to clear every emptiness threshold, no template markers.
    format!("{body}\nThe remainder of this file describes real behavior in real sentences, with enough length to count as substantive prose for every heuristic.\n")
}

#[test]
fn identical_input_yields_identical_reports() {
    let v = validator();
    let mut files = BTreeMap::new();
    files.insert(ContextFileKind::Context, String::from("## Project Purpose\nshort\n"));
    files.insert(ContextFileKind::Plan, String::new());
    files.insert(
        ContextFileKind::Guardrail,
        String::from("<!-- GUIDANCE: add constraints -->\n"),
    );

    let a = v.check_health(&files, true);
    let b = v.check_health(&files, true);

    assert_eq!(a.overall, b.overall);
    assert_eq!(a.suggestions, b.suggestions);
    let fingerprint = |issues: &[cxt::models::HealthIssue]| {
        issues
            .iter()
            .map(|i| (i.kind, i.severity, i.file, i.message.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(fingerprint(&a.issues), fingerprint(&b.issues));
}

#[test]
fn guidance_only_file_is_critical_error() {
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
    assert_eq!(issue.severity, IssueSeverity::Error);
}

#[test]
fn empty_input_map_is_healthy() {
    let v = validator();
    let status = v.check_health(&BTreeMap::new(), true);
    assert_eq!(status.overall, OverallHealth::Healthy);
    assert!(status.issues.is_empty());
}

#[test]
fn well_populated_file_with_sections_is_clean() {
    let v = validator();
    let mut files = BTreeMap::new();
    files.insert(
        ContextFileKind::Plan,
        populated("## Goal\nShip it.\n## Approach\nCarefully.\n## Steps\nOne at a time."),
    );

    let status = v.check_health(&files, true);
    assert_eq!(status.overall, OverallHealth::Healthy, "{:?}", status.issues);
}

#[test]
fn alignment_report_is_fixed_and_always_present() {
    let v = validator();
    let mut files = BTreeMap::new();
    files.insert(ContextFileKind::Plan, String::new());

    let status = v.check_health(&files, true);
    assert_eq!(
        status.alignments.context_plan,
        cxt::models::AlignmentStatus::Aligned
    );
    assert_eq!(
        status.alignments.all_guardrail,
        cxt::models::AlignmentStatus::Aligned
    );
}

#[test]
fn heal_then_recheck_clears_section_warnings() {
    let tmp = TempDir::new().unwrap();
    let store = FilesystemStore::new();
    let config = CxtConfig::default().with_root(tmp.path());
    let plan_path = tmp.path().join(".cxt/plan.md");

    store
        .write(
            &plan_path,
            &format!("## Goal\n{}", populated("Ship the importer rewrite.")),
        )
        .unwrap();
    let validator = ContentValidator::new(config, store);

    let before = validator.check_disk(true).unwrap();
    assert!(
        before
            .issues
            .iter()
            .any(|i| i.kind == IssueKind::MissingSections)
    );

    let fixed = validator.auto_heal(&before.issues, false).unwrap();
    assert_eq!(fixed.len(), 1);

    let after = validator.check_disk(true).unwrap();
    assert!(
        !after
            .issues
            .iter()
            .any(|i| i.kind == IssueKind::MissingSections)
    );
}

#[test]
fn stale_marker_heals_to_today() {
    let tmp = TempDir::new().unwrap();
    let store = FilesystemStore::new();
    let config = CxtConfig::default().with_root(tmp.path());
    let context_path = tmp.path().join(".cxt/context.md");

    store
        .write(
            &context_path,
            &format!(
                "*Last Updated: 2019-05-01*\n## Project Purpose\n## Core Problem\n## Solution\n## Target Users\n{}",
                populated("A tool under test.")
            ),
        )
        .unwrap();
    let validator = ContentValidator::new(config, store);

    let before = validator.check_disk(false).unwrap();
    assert!(
        before
            .issues
            .iter()
            .any(|i| i.kind == IssueKind::StaleTimestamp)
    );

    validator.auto_heal(&before.issues, false).unwrap();

    let after = validator.check_disk(false).unwrap();
    assert!(
        !after
            .issues
            .iter()
            .any(|i| i.kind == IssueKind::StaleTimestamp)
    );
}
