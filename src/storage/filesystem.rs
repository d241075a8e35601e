//! Filesystem-backed file store.

use crate::storage::FileStore;
use crate::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Stores files directly on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilesystemStore;

impl FilesystemStore {
    /// Creates a new filesystem store.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn storage_err(operation: &str, e: &std::io::Error) -> Error {
        Error::Storage {
            operation: operation.to_string(),
            cause: e.to_string(),
        }
    }
}

impl FileStore for FilesystemStore {
    fn read_to_string(&self, path: &Path) -> Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::storage_err("read_file", &e)),
        }
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Self::storage_err("create_parent_dir", &e))?;
        }
        fs::write(path, content).map_err(|e| Self::storage_err("write_file", &e))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| Self::storage_err("create_dir", &e))
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>> {
        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Self::storage_err("list_dir", &e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Self::storage_err("list_dir", &e))?;
            if entry.path().is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).map_err(|e| Self::storage_err("create_parent_dir", &e))?;
        }
        fs::rename(from, to).map_err(|e| Self::storage_err("move_file", &e))
    }

}
