//! Init CLI command.

use crate::config::CxtConfig;
use crate::models::ContextFileKind;
use crate::services::CxtLayout;
use crate::storage::FileStore;
use crate::Result;

/// Scaffolds `.cxt/` with starter files.
///
/// Idempotent: existing files are left alone. Returns the names of the
/// files that were created.
///
/// # Errors
///
/// Returns an error if a directory or file cannot be created.
pub fn cmd_init(config: &CxtConfig, store: &dyn FileStore, branch: &str) -> Result<Vec<String>> {
    let layout = CxtLayout::new(&config.root);
    store.ensure_dir(layout.cxt_dir())?;

    let today = chrono::Local::now().date_naive();
    let mut created = Vec::new();
    for kind in ContextFileKind::all() {
        let path = layout.context_file(kind);
        if store.exists(&path) {
            continue;
        }
        store.write(&path, &crate::templates::starter(kind, branch, today))?;
        created.push(kind.file_name().to_string());
    }
    Ok(created)
}
