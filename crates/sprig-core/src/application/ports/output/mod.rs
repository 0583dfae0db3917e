//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `sprig-adapters` crate provides implementations.

use std::path::Path;

use crate::application::error::RetrievalError;
use crate::domain::{PackageManager, RemoteLocation, StagedTree};
use crate::error::SprigResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `sprig_adapters::filesystem::LocalFilesystem` (production)
/// - `sprig_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> SprigResult<()>;

    /// Write bytes to a file, replacing it if present.
    fn write_file(&self, path: &Path, contents: &[u8]) -> SprigResult<()>;

    /// Mark a file executable. A no-op where the platform has no such bit.
    fn set_executable(&self, path: &Path) -> SprigResult<()>;

    fn exists(&self, path: &Path) -> bool;

    /// `true` only for an existing directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Names of the entries directly inside `path`, sorted.
    fn list_entries(&self, path: &Path) -> SprigResult<Vec<String>>;

    /// Non-destructive check that the current user may create entries in
    /// the directory `path`.
    fn is_writable(&self, path: &Path) -> bool;
}

/// One attempt at retrieving a hosted template.
///
/// Retry and fallback policy live in the fetcher, not here.
#[cfg_attr(test, mockall::automock)]
pub trait RemoteTemplateSource: Send + Sync {
    fn retrieve(&self, location: &RemoteLocation) -> Result<StagedTree, RetrievalError>;
}

/// The template shipped inside the binary.
pub trait BundledTemplateSource: Send + Sync {
    fn default_tree(&self) -> SprigResult<StagedTree>;
}

/// What the user is told before being offered the bundled template.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackContext {
    pub location: RemoteLocation,
    pub error: RetrievalError,
    pub attempts: u32,
}

/// Decides whether to fall back to the bundled template after a remote
/// template could not be found.
pub trait FallbackConfirmation {
    fn confirm(&self, context: &FallbackContext) -> bool;
}

impl<F> FallbackConfirmation for F
where
    F: Fn(&FallbackContext) -> bool,
{
    fn confirm(&self, context: &FallbackContext) -> bool {
        self(context)
    }
}

/// Non-interactive answer: never fall back.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoDecline;

impl FallbackConfirmation for AutoDecline {
    fn confirm(&self, _context: &FallbackContext) -> bool {
        false
    }
}

/// Installs dependencies into a freshly materialized project.
pub trait Installer {
    fn install(&self, manager: PackageManager, project_dir: &Path) -> SprigResult<()>;
}
