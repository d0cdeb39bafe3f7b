//! Artifact storage
//!
//! Generated artifacts are plain text files addressed by a path relative to
//! the project root. Stores do no locking and have no transactions; callers
//! serialize access (see the dev server).

use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{ScaffoldError, ScaffoldResult};

/// Key-value text store keyed by relative artifact path
#[cfg_attr(test, mockall::automock)]
pub trait ArtifactStore: Send + Sync {
    /// Whether an artifact exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Read the full text of the artifact at `path`
    ///
    /// # Errors
    ///
    /// [`ScaffoldError::NotFound`] if it does not exist,
    /// [`ScaffoldError::Io`] on any other failure.
    fn read(&self, path: &Path) -> ScaffoldResult<String>;

    /// Replace the artifact at `path` with `text`, creating it if needed
    ///
    /// # Errors
    ///
    /// [`ScaffoldError::Io`] if the write fails.
    fn write(&self, path: &Path, text: &str) -> ScaffoldResult<()>;

    /// Read the artifact if it exists
    ///
    /// # Errors
    ///
    /// [`ScaffoldError::Io`] if it exists but cannot be read.
    fn read_optional(&self, path: &Path) -> ScaffoldResult<Option<String>> {
        match self.read(path) {
            Ok(text) => Ok(Some(text)),
            Err(ScaffoldError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Filesystem-backed store rooted at a project directory
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Create a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Project root this store resolves paths against
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    fn io_error(path: &Path, source: io::Error) -> ScaffoldError {
        ScaffoldError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl ArtifactStore for FsStore {
    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).is_file()
    }

    fn read(&self, path: &Path) -> ScaffoldResult<String> {
        std::fs::read_to_string(self.resolve(path)).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                ScaffoldError::NotFound(path.to_path_buf())
            } else {
                Self::io_error(path, err)
            }
        })
    }

    /// Writes through a temporary file in the target directory followed by
    /// a rename.
    fn write(&self, path: &Path, text: &str) -> ScaffoldResult<()> {
        let full_path = self.resolve(path);
        let parent = full_path
            .parent()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        std::fs::create_dir_all(&parent).map_err(|err| Self::io_error(path, err))?;

        let mut temp = tempfile::NamedTempFile::new_in(&parent).map_err(|err| Self::io_error(path, err))?;
        temp.write_all(text.as_bytes())
            .map_err(|err| Self::io_error(path, err))?;
        temp.persist(&full_path)
            .map_err(|err| Self::io_error(path, err.error))?;

        tracing::trace!(path = %path.display(), bytes = text.len(), "wrote artifact");
        Ok(())
    }
}

/// In-memory store, used by tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: RwLock<HashMap<PathBuf, String>>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with artifacts
    pub fn with_files<P, S>(files: impl IntoIterator<Item = (P, S)>) -> Self
    where
        P: Into<PathBuf>,
        S: Into<String>,
    {
        Self {
            files: RwLock::new(
                files
                    .into_iter()
                    .map(|(path, text)| (path.into(), text.into()))
                    .collect(),
            ),
        }
    }

    /// All stored paths, sorted
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<_> = self.files.read().keys().cloned().collect();
        paths.sort();
        paths
    }
}

impl ArtifactStore for MemoryStore {
    fn exists(&self, path: &Path) -> bool {
        self.files.read().contains_key(path)
    }

    fn read(&self, path: &Path) -> ScaffoldResult<String> {
        self.files
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| ScaffoldError::NotFound(path.to_path_buf()))
    }

    fn write(&self, path: &Path, text: &str) -> ScaffoldResult<()> {
        self.files.write().insert(path.to_path_buf(), text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_fs_store_roundtrip() {
        let temp_dir = tempdir().unwrap();
        let store = FsStore::new(temp_dir.path());
        let path = Path::new("internals/routes.go");

        assert!(!store.exists(path));
        assert!(matches!(store.read(path), Err(ScaffoldError::NotFound(_))));
        assert_eq!(store.read_optional(path).unwrap(), None);

        store.write(path, "package internals\n").unwrap();
        assert!(store.exists(path));
        assert_eq!(store.read(path).unwrap(), "package internals\n");
        assert!(temp_dir.path().join("internals/routes.go").is_file());
    }

    #[test]
    fn test_fs_store_overwrites() {
        let temp_dir = tempdir().unwrap();
        let store = FsStore::new(temp_dir.path());
        let path = Path::new("models.json");

        store.write(path, "{}\n").unwrap();
        store.write(path, "{\"Post\": []}\n").unwrap();
        assert_eq!(store.read(path).unwrap(), "{\"Post\": []}\n");
    }

    #[test]
    fn test_fs_store_directory_is_not_an_artifact() {
        let temp_dir = tempdir().unwrap();
        std::fs::create_dir(temp_dir.path().join("views")).unwrap();
        let store = FsStore::new(temp_dir.path());
        assert!(!store.exists(Path::new("views")));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::with_files([("models.json", "{}\n")]);
        assert!(store.exists(Path::new("models.json")));
        assert_eq!(store.read(Path::new("models.json")).unwrap(), "{}\n");

        store.write(Path::new("a/b.go"), "package b\n").unwrap();
        assert_eq!(
            store.paths(),
            vec![PathBuf::from("a/b.go"), PathBuf::from("models.json")]
        );
        assert_eq!(store.read_optional(Path::new("missing")).unwrap(), None);
    }
}
