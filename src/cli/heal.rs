//! Heal CLI command.

use crate::services::ContentValidator;
use crate::storage::FileStore;
use crate::Result;

/// Runs the health check and applies (or previews) automatic fixes.
///
/// Returns the fix descriptions, empty when nothing was fixable.
///
/// # Errors
///
/// Returns an error for storage faults while loading or writing files.
pub fn cmd_heal<S: FileStore>(validator: &ContentValidator<S>, dry_run: bool) -> Result<Vec<String>> {
    let status = validator.check_disk(false)?;
    validator.auto_heal(&status.issues, dry_run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CxtConfig;
    use crate::models::ContextFileKind;
    use crate::services::CxtLayout;
    use crate::storage::MemoryStore;

    #[test]
    fn test_heal_fixes_missing_sections() {
        let config = CxtConfig::default().with_root("/p");
        let layout = CxtLayout::new("/p");
        let store = MemoryStore::new();
        store
            .write(
                &layout.context_file(ContextFileKind::Plan),
                "## Goal\nship the thing\n",
            )
            .unwrap();
        let validator = ContentValidator::new(config, store);

        let descriptions = cmd_heal(&validator, false).unwrap();
        assert!(descriptions.iter().any(|d| d.contains("plan.md")));
    }

    #[test]
    fn test_heal_on_empty_project_does_nothing() {
        let config = CxtConfig::default().with_root("/p");
        let validator = ContentValidator::new(config, MemoryStore::new());
        let descriptions = cmd_heal(&validator, false).unwrap();
        assert!(descriptions.is_empty());
    }
}
