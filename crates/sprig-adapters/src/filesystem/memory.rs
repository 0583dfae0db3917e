//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Component, Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
};

use sprig_core::{
    application::{ApplicationError, FsFailure, ports::Filesystem},
    error::{SprigError, SprigResult},
};

/// In-memory filesystem for testing.
///
/// Clones share state, so a test can keep a handle while the service owns
/// another.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
    executables: BTreeSet<PathBuf>,
    read_only: BTreeSet<PathBuf>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a directory read-only: writes beneath it fail and the
    /// writability probe reports `false`.
    pub fn set_read_only(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        add_with_ancestors(&mut inner.directories, &path);
        inner.read_only.insert(path);
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner
            .files
            .get(path)
            .map(|c| String::from_utf8_lossy(c).into_owned())
    }

    pub fn is_executable(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|i| i.executables.contains(path))
            .unwrap_or(false)
    }

    /// All files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|i| i.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn write_lock(&self) -> SprigResult<std::sync::RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner.write().map_err(|_| SprigError::Internal {
            message: "memory filesystem lock poisoned".into(),
        })
    }
}

impl MemoryFilesystemInner {
    fn guard(&self, path: &Path) -> SprigResult<()> {
        if self.read_only.iter().any(|ro| path.starts_with(ro)) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "permission denied".into(),
                kind: FsFailure::PermissionDenied,
            }
            .into());
        }
        Ok(())
    }
}

fn add_with_ancestors(directories: &mut BTreeSet<PathBuf>, path: &Path) {
    let mut current = PathBuf::new();
    for component in path.components() {
        if matches!(component, Component::CurDir) {
            continue;
        }
        current.push(component);
        directories.insert(current.clone());
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> SprigResult<()> {
        let mut inner = self.write_lock()?;
        if !inner.directories.contains(path) {
            inner.guard(path)?;
        }
        add_with_ancestors(&mut inner.directories, path);
        Ok(())
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> SprigResult<()> {
        let mut inner = self.write_lock()?;
        inner.guard(path)?;

        let orphan = path
            .parent()
            .is_some_and(|p| !p.as_os_str().is_empty() && !inner.directories.contains(p));
        if orphan {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "parent directory does not exist".into(),
                kind: FsFailure::NotFound,
            }
            .into());
        }

        inner.files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn set_executable(&self, path: &Path) -> SprigResult<()> {
        self.write_lock()?.executables.insert(path.to_path_buf());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        if path == Path::new(".") || path.as_os_str().is_empty() {
            return true;
        }
        self.inner
            .read()
            .map(|i| i.files.contains_key(path) || i.directories.contains(path))
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        if path == Path::new(".") || path.as_os_str().is_empty() {
            return true;
        }
        self.inner
            .read()
            .map(|i| i.directories.contains(path))
            .unwrap_or(false)
    }

    fn list_entries(&self, path: &Path) -> SprigResult<Vec<String>> {
        let inner = self.inner.read().map_err(|_| SprigError::Internal {
            message: "memory filesystem lock poisoned".into(),
        })?;
        if !inner.directories.contains(path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "no such directory".into(),
                kind: FsFailure::NotFound,
            }
            .into());
        }

        let children = inner
            .files
            .keys()
            .chain(inner.directories.iter())
            .filter(|p| p.parent() == Some(path))
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect::<BTreeSet<_>>();
        Ok(children.into_iter().collect())
    }

    fn is_writable(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|i| i.guard(path).is_ok())
            .unwrap_or(false)
    }
}
