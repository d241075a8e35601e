//! In-memory file store.
//!
//! Used by unit tests and anywhere a throwaway store is useful.

use crate::Result;
use crate::storage::FileStore;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Stores files in a process-local map keyed by path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: Mutex<BTreeMap<PathBuf, String>>,
    dirs: Mutex<Vec<PathBuf>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_files(&self) -> std::sync::MutexGuard<'_, BTreeMap<PathBuf, String>> {
        // Poisoning only happens if a holder panicked; the map is still valid.
        self.files.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn lock_dirs(&self) -> std::sync::MutexGuard<'_, Vec<PathBuf>> {
        self.dirs.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl FileStore for MemoryStore {
    fn read_to_string(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.lock_files().get(path).cloned())
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        self.lock_files().insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        if self.lock_files().contains_key(path) {
            return true;
        }
        let files = self.lock_files();
        files.keys().any(|p| p.starts_with(path)) || self.lock_dirs().iter().any(|d| d == path)
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        self.lock_dirs().push(path.to_path_buf());
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>> {
        let files = self.lock_files();
        let mut names: Vec<String> = files
            .keys()
            .filter(|p| p.parent() == Some(path))
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        names.sort();
        Ok(names)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        let mut files = self.lock_files();
        if let Some(content) = files.remove(from) {
            files.insert(to.to_path_buf(), content);
        }
        Ok(())
    }

}
