//! File store trait.

use crate::Result;
use std::path::Path;

/// Trait for file storage backends.
///
/// The core distinguishes "not found" from real failures: `read_to_string`
/// returns `Ok(None)` for an absent file and reserves `Err` for genuine
/// storage faults.
pub trait FileStore: Send + Sync {
    /// Reads a file's full contents, or `None` if it does not exist.
    fn read_to_string(&self, path: &Path) -> Result<Option<String>>;

    /// Writes a file, replacing any existing content.
    fn write(&self, path: &Path, content: &str) -> Result<()>;

    /// Checks whether a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Creates a directory and any missing parents.
    fn ensure_dir(&self, path: &Path) -> Result<()>;

    /// Lists the file names directly inside a directory.
    ///
    /// An absent directory lists as empty rather than failing.
    fn list_dir(&self, path: &Path) -> Result<Vec<String>>;

    /// Moves a file, replacing any existing destination.
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;
}

impl<T: FileStore + ?Sized> FileStore for &T {
    fn read_to_string(&self, path: &Path) -> Result<Option<String>> {
        (**self).read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        (**self).write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        (**self).ensure_dir(path)
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>> {
        (**self).list_dir(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        (**self).rename(from, to)
    }
}
