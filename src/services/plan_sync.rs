//! Branch-aware plan synchronization.
//!
//! Keeps exactly one live `plan.md` per project, always matching the content
//! intended for the current git branch, while preserving every other
//! branch's plan across checkouts.

use crate::config::CxtConfig;
use crate::git::BranchSource;
use crate::models::{BranchPlan, PlanStyle, PlanSyncState, SyncOptions, SyncPlanResult};
use crate::services::CxtLayout;
use crate::storage::FileStore;
use crate::{Error, Result};
use tracing::instrument;

/// Fixed key for branch names that sanitize to nothing.
const FALLBACK_KEY: &str = "unnamed";

/// Derives a filename-safe storage key from a branch name.
///
/// Path separators become `-`, characters unsafe for a file name are
/// stripped, delimiter runs collapse, and leading/trailing delimiters are
/// trimmed. Pure, total, and idempotent; `feature/login-fix` maps to
/// `feature-login-fix`.
///
/// The mapping is not collision-free (`a/b` and `a-b` share a key). That
/// risk is accepted: branch names that differ only in separator style are
/// rare enough that the simpler on-disk layout wins.
#[must_use]
pub fn sanitize_branch_name(branch: &str) -> String {
    let mut key = String::with_capacity(branch.len());
    let mut last_was_delimiter = false;

    for c in branch.chars() {
        let mapped = match c {
            '/' | '\\' => Some('-'),
            c if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' => Some(c),
            _ => None,
        };
        if let Some(c) = mapped {
            if c == '-' {
                if !last_was_delimiter && !key.is_empty() {
                    key.push('-');
                }
                last_was_delimiter = true;
            } else {
                key.push(c);
                last_was_delimiter = false;
            }
        }
    }

    let key = key.trim_end_matches('-').to_string();
    if key.is_empty() {
        FALLBACK_KEY.to_string()
    } else {
        key
    }
}

/// Synchronizes the live plan with the current git branch.
///
/// Owns `plan.md`, `.plan-history/`, and `.plan-state.json` exclusively; no
/// other component writes them.
pub struct PlanSynchronizer<R, S> {
    config: CxtConfig,
    layout: CxtLayout,
    repo: R,
    store: S,
}

impl<R: BranchSource, S: FileStore> PlanSynchronizer<R, S> {
    /// Creates a synchronizer over the given repository and store.
    #[must_use]
    pub fn new(config: CxtConfig, repo: R, store: S) -> Self {
        let layout = CxtLayout::new(&config.root);
        Self {
            config,
            layout,
            repo,
            store,
        }
    }

    /// Returns the currently checked-out branch.
    ///
    /// # Errors
    ///
    /// Returns an error outside a repository or on a detached HEAD.
    pub fn current_branch(&self) -> Result<String> {
        self.repo.current_branch()
    }

    /// Saves the live plan into the branch's history slot.
    ///
    /// A no-op when the live plan is absent or all-whitespace, so a real
    /// saved plan is never overwritten with emptiness.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing fails.
    pub fn save_current_plan(&self, branch: &str) -> Result<()> {
        let Some(content) = self.store.read_to_string(&self.layout.plan_file())? else {
            return Ok(());
        };
        if content.trim().is_empty() {
            return Ok(());
        }

        let plan = BranchPlan {
            branch_name: branch.to_string(),
            key: sanitize_branch_name(branch),
            content,
        };
        self.store.ensure_dir(&self.layout.history_dir())?;
        self.store
            .write(&self.layout.history_slot(&plan.key), &plan.content)
    }

    /// Loads a branch's saved snapshot, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails.
    pub fn branch_plan(&self, branch: &str) -> Result<Option<BranchPlan>> {
        let key = sanitize_branch_name(branch);
        Ok(self
            .store
            .read_to_string(&self.layout.history_slot(&key))?
            .map(|content| BranchPlan {
                branch_name: branch.to_string(),
                key,
                content,
            }))
    }

    /// Restores a branch's saved plan into the live file.
    ///
    /// Returns `false` and leaves the live file untouched when no snapshot
    /// exists for the branch.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing fails.
    pub fn restore_plan(&self, branch: &str) -> Result<bool> {
        let Some(plan) = self.branch_plan(branch)? else {
            return Ok(false);
        };
        self.store.write(&self.layout.plan_file(), &plan.content)?;
        Ok(true)
    }

    /// Writes a fresh live plan for the branch.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn create_blank_plan(&self, branch: &str, style: PlanStyle) -> Result<()> {
        let today = chrono::Local::now().date_naive();
        let content = crate::templates::plan(style, branch, today);
        self.store.write(&self.layout.plan_file(), &content)
    }

    /// Synchronizes the live plan with the current branch.
    ///
    /// Saves the outgoing branch's plan when the branch changed, restores
    /// (or creates) the incoming branch's plan, and records the current
    /// branch as the next invocation's "previous". The save/restore/persist
    /// sequence is not transactional: a crash between steps can leave state
    /// and history out of step, an accepted at-most-once-ish guarantee.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DirtyPlan`] when the live plan has uncommitted
    /// changes and `options.silent` is false; repository and storage
    /// failures propagate.
    #[instrument(skip(self, options), fields(operation = "plan.sync"))]
    pub fn sync_plan(&self, options: &SyncOptions) -> Result<SyncPlanResult> {
        let current_branch = self.repo.current_branch()?;

        if !options.silent && self.repo.is_path_dirty(&self.layout.plan_rel_path())? {
            return Err(Error::DirtyPlan);
        }

        let previous_branch = self.read_state()?.map_or_else(
            || self.config.fallback_branch.clone(),
            |state| state.last_branch,
        );

        let branch_switched = previous_branch != current_branch;
        if branch_switched {
            self.save_current_plan(&previous_branch)?;
        }

        let restored = self.restore_plan(&current_branch)?;

        // A fresh plan only replaces the live file after a real switch (the
        // outgoing content was just saved) or when nothing usable is there;
        // a same-branch sync never clobbers an unsaved live plan.
        let mut created = false;
        if !restored && options.create_if_missing {
            let live_blank = self
                .store
                .read_to_string(&self.layout.plan_file())?
                .is_none_or(|c| c.trim().is_empty());
            if branch_switched || live_blank {
                let style = options.style.unwrap_or(self.config.default_plan_style);
                self.create_blank_plan(&current_branch, style)?;
                created = true;
            }
        }

        self.write_state(&PlanSyncState::new(&current_branch))?;

        let result = SyncPlanResult {
            previous_branch,
            current_branch,
            restored,
            created,
        };
        let outcome = if result.created {
            "created"
        } else if result.restored {
            "restored"
        } else {
            "noop"
        };
        metrics::counter!("plan_sync_total", "outcome" => outcome).increment(1);
        Ok(result)
    }

    /// Returns true when a snapshot exists for the branch.
    #[must_use]
    pub fn has_branch_plan(&self, branch: &str) -> bool {
        let key = sanitize_branch_name(branch);
        self.store.exists(&self.layout.history_slot(&key))
    }

    /// Lists sanitized keys present in the history, excluding the archive.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory listing fails.
    pub fn list_branch_plans(&self) -> Result<Vec<String>> {
        let names = self.store.list_dir(&self.layout.history_dir())?;
        Ok(names
            .into_iter()
            .filter_map(|name| name.strip_suffix(".md").map(ToString::to_string))
            .collect())
    }

    /// Moves a branch's snapshot into the archive namespace.
    ///
    /// Idempotent: a no-op when no snapshot exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the move fails.
    pub fn archive_plan(&self, branch: &str) -> Result<()> {
        let key = sanitize_branch_name(branch);
        let slot = self.layout.history_slot(&key);
        if !self.store.exists(&slot) {
            return Ok(());
        }
        self.store.ensure_dir(&self.layout.archive_dir())?;
        self.store.rename(&slot, &self.layout.archive_slot(&key))
    }

    fn read_state(&self) -> Result<Option<PlanSyncState>> {
        let Some(raw) = self.store.read_to_string(&self.layout.state_file())? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                // A corrupt state file degrades to the configured fallback
                // rather than blocking every future sync.
                tracing::warn!(error = %e, "unreadable plan sync state, using fallback branch");
                Ok(None)
            },
        }
    }

    fn write_state(&self, state: &PlanSyncState) -> Result<()> {
        let json = serde_json::to_string_pretty(state).map_err(|e| Error::Storage {
            operation: "serialize_state".to_string(),
            cause: e.to_string(),
        })?;
        self.store.write(&self.layout.state_file(), &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::path::Path;
    use std::sync::Mutex;

    struct FakeRepo {
        branch: Mutex<String>,
        dirty: bool,
    }

    impl FakeRepo {
        fn on(branch: &str) -> Self {
            Self {
                branch: Mutex::new(branch.to_string()),
                dirty: false,
            }
        }

        fn checkout(&self, branch: &str) {
            *self.branch.lock().unwrap() = branch.to_string();
        }
    }

    impl BranchSource for FakeRepo {
        fn current_branch(&self) -> Result<String> {
            Ok(self.branch.lock().unwrap().clone())
        }

        fn is_path_dirty(&self, _rel_path: &Path) -> Result<bool> {
            Ok(self.dirty)
        }
    }

    fn synchronizer(branch: &str) -> PlanSynchronizer<FakeRepo, MemoryStore> {
        let config = CxtConfig::default().with_root("/project");
        PlanSynchronizer::new(config, FakeRepo::on(branch), MemoryStore::new())
    }

    #[test]
    fn test_sanitize_examples() {
        assert_eq!(sanitize_branch_name("feature/login-fix"), "feature-login-fix");
        assert_eq!(sanitize_branch_name("main"), "main");
        assert_eq!(sanitize_branch_name("a//b"), "a-b");
        assert_eq!(sanitize_branch_name("-lead/trail-"), "lead-trail");
        assert_eq!(sanitize_branch_name("v1.2.3"), "v1.2.3");
        assert_eq!(sanitize_branch_name("???"), "unnamed");
        assert_eq!(sanitize_branch_name(""), "unnamed");
    }

    #[test]
    fn test_sanitize_idempotent() {
        for branch in ["feature/login-fix", "a//b", "-x-", "weird name!", ""] {
            let once = sanitize_branch_name(branch);
            assert_eq!(sanitize_branch_name(&once), once);
        }
    }

    #[test]
    fn test_save_blank_plan_is_noop() {
        let sync = synchronizer("main");
        sync.store
            .write(&sync.layout.plan_file(), "   \n\t\n")
            .unwrap();

        sync.save_current_plan("main").unwrap();
        assert!(!sync.has_branch_plan("main"));
    }

    #[test]
    fn test_save_missing_plan_is_noop() {
        let sync = synchronizer("main");
        sync.save_current_plan("main").unwrap();
        assert!(!sync.has_branch_plan("main"));
    }

    #[test]
    fn test_save_restore_roundtrip() {
        let sync = synchronizer("a");
        sync.store.write(&sync.layout.plan_file(), "X").unwrap();

        sync.save_current_plan("a").unwrap();
        sync.store.write(&sync.layout.plan_file(), "other").unwrap();

        assert!(sync.restore_plan("a").unwrap());
        assert_eq!(
            sync.store.read_to_string(&sync.layout.plan_file()).unwrap().as_deref(),
            Some("X")
        );
    }

    #[test]
    fn test_branch_plan_carries_raw_name_and_key() {
        let sync = synchronizer("main");
        sync.store.write(&sync.layout.plan_file(), "Login plan").unwrap();
        sync.save_current_plan("feature/login").unwrap();

        let plan = sync.branch_plan("feature/login").unwrap().unwrap();
        assert_eq!(plan.branch_name, "feature/login");
        assert_eq!(plan.key, "feature-login");
        assert_eq!(plan.content, "Login plan");

        assert!(sync.branch_plan("absent").unwrap().is_none());
    }

    #[test]
    fn test_restore_missing_leaves_live_untouched() {
        let sync = synchronizer("a");
        sync.store.write(&sync.layout.plan_file(), "live").unwrap();

        assert!(!sync.restore_plan("nowhere").unwrap());
        assert_eq!(
            sync.store.read_to_string(&sync.layout.plan_file()).unwrap().as_deref(),
            Some("live")
        );
    }

    #[test]
    fn test_sync_records_current_branch() {
        let sync = synchronizer("main");
        let result = sync.sync_plan(&SyncOptions::new()).unwrap();
        assert_eq!(result.current_branch, "main");

        let raw = sync
            .store
            .read_to_string(&sync.layout.state_file())
            .unwrap()
            .unwrap();
        let state: PlanSyncState = serde_json::from_str(&raw).unwrap();
        assert_eq!(state.last_branch, "main");
    }

    #[test]
    fn test_sync_same_branch_does_not_save_history() {
        let sync = synchronizer("main");
        sync.store.write(&sync.layout.plan_file(), "Main plan").unwrap();
        sync.sync_plan(&SyncOptions::new()).unwrap();

        // Second sync on the same branch: the switch-detection save must not
        // fire, so no history slot appears.
        sync.sync_plan(&SyncOptions::new()).unwrap();
        assert!(!sync.has_branch_plan("main"));
    }

    #[test]
    fn test_sync_same_branch_preserves_unsaved_live_plan() {
        let sync = synchronizer("main");
        sync.store.write(&sync.layout.plan_file(), "Main plan").unwrap();

        let result = sync.sync_plan(&SyncOptions::new()).unwrap();
        assert!(!result.created);
        assert_eq!(
            sync.store.read_to_string(&sync.layout.plan_file()).unwrap().as_deref(),
            Some("Main plan")
        );
    }

    #[test]
    fn test_sync_branch_switch_end_to_end() {
        let sync = synchronizer("main");
        sync.store.write(&sync.layout.plan_file(), "Main plan").unwrap();
        sync.sync_plan(&SyncOptions::new()).unwrap();

        sync.repo.checkout("feature-x");
        let result = sync.sync_plan(&SyncOptions::new()).unwrap();

        assert!(result.created);
        assert!(!result.restored);
        assert_eq!(result.previous_branch, "main");
        assert_eq!(
            sync.store
                .read_to_string(&sync.layout.history_slot("main"))
                .unwrap()
                .as_deref(),
            Some("Main plan")
        );
        let live = sync
            .store
            .read_to_string(&sync.layout.plan_file())
            .unwrap()
            .unwrap();
        assert!(live.contains("feature-x"));

        // Returning to main restores the saved plan.
        sync.repo.checkout("main");
        let result = sync.sync_plan(&SyncOptions::new()).unwrap();
        assert!(result.restored);
        assert!(!result.created);
        assert_eq!(
            sync.store.read_to_string(&sync.layout.plan_file()).unwrap().as_deref(),
            Some("Main plan")
        );
    }

    #[test]
    fn test_sync_dirty_plan_blocks_and_mutates_nothing() {
        let config = CxtConfig::default().with_root("/project");
        let mut repo = FakeRepo::on("feature-x");
        repo.dirty = true;
        let sync = PlanSynchronizer::new(config, repo, MemoryStore::new());
        sync.store.write(&sync.layout.plan_file(), "edited").unwrap();

        match sync.sync_plan(&SyncOptions::new()) {
            Err(Error::DirtyPlan) => {},
            other => panic!("expected DirtyPlan, got {other:?}"),
        }
        assert!(!sync.store.exists(&sync.layout.state_file()));
        assert!(sync.list_branch_plans().unwrap().is_empty());
    }

    #[test]
    fn test_sync_silent_skips_dirty_guard() {
        let config = CxtConfig::default().with_root("/project");
        let mut repo = FakeRepo::on("main");
        repo.dirty = true;
        let sync = PlanSynchronizer::new(config, repo, MemoryStore::new());

        let result = sync.sync_plan(&SyncOptions::new().silent()).unwrap();
        assert_eq!(result.current_branch, "main");
    }

    #[test]
    fn test_sync_without_create_if_missing() {
        let sync = synchronizer("feature-x");
        let result = sync
            .sync_plan(&SyncOptions {
                silent: false,
                create_if_missing: false,
                style: None,
            })
            .unwrap();

        assert!(!result.created);
        assert!(!result.restored);
        assert!(!sync.store.exists(&sync.layout.plan_file()));
    }

    #[test]
    fn test_corrupt_state_falls_back() {
        let sync = synchronizer("feature-x");
        sync.store
            .write(&sync.layout.state_file(), "{not json")
            .unwrap();
        sync.store.write(&sync.layout.plan_file(), "plan body").unwrap();

        let result = sync.sync_plan(&SyncOptions::new()).unwrap();
        // Fallback branch is "main", which differs from feature-x, so the
        // outgoing save fires under the fallback key.
        assert_eq!(result.previous_branch, "main");
        assert!(sync.has_branch_plan("main"));
    }

    #[test]
    fn test_list_excludes_archive() {
        let sync = synchronizer("main");
        sync.store.write(&sync.layout.plan_file(), "a plan").unwrap();
        sync.save_current_plan("a").unwrap();
        sync.save_current_plan("b").unwrap();
        sync.archive_plan("a").unwrap();

        assert_eq!(sync.list_branch_plans().unwrap(), vec!["b"]);
    }

    #[test]
    fn test_archive_is_idempotent() {
        let sync = synchronizer("main");
        sync.archive_plan("never-existed").unwrap();

        sync.store.write(&sync.layout.plan_file(), "a plan").unwrap();
        sync.save_current_plan("x").unwrap();
        sync.archive_plan("x").unwrap();
        sync.archive_plan("x").unwrap();
        assert!(sync.store.exists(&sync.layout.archive_slot("x")));
    }
}
