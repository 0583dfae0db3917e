use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    application::{ApplicationError, error::FsFailure, ports::Filesystem},
    domain::DestinationState,
    error::{SprigError, SprigResult},
};

/// Whether the platform can tell us in advance that a directory is not
/// writable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionModel {
    /// Permission bits are checked before anything is written.
    Enforced,
    /// No reliable probe; write failures surface when they happen.
    Unenforced,
}

impl PermissionModel {
    pub fn native() -> Self {
        if cfg!(unix) {
            Self::Enforced
        } else {
            Self::Unenforced
        }
    }
}

/// Checks the destination before materialization writes anything.
pub struct TargetValidator {
    filesystem: Arc<dyn Filesystem>,
    permissions: PermissionModel,
}

impl TargetValidator {
    pub fn new(filesystem: Arc<dyn Filesystem>, permissions: PermissionModel) -> Self {
        Self {
            filesystem,
            permissions,
        }
    }

    /// Inspect the destination without touching it.
    ///
    /// Fails with `ConflictExists` if it has any entries, `PathOccupied` if
    /// something other than a directory is in the way, and `NotWritable` if
    /// the directory (or, when absent, its nearest existing ancestor) cannot
    /// be written.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn inspect(&self, path: &Path) -> SprigResult<DestinationState> {
        if !self.filesystem.exists(path) {
            self.ensure_writable(&nearest_existing_ancestor(&*self.filesystem, path), path)?;
            debug!("destination does not exist yet");
            return Ok(DestinationState::absent(path));
        }

        if !self.filesystem.is_dir(path) {
            return Err(ApplicationError::PathOccupied {
                path: path.to_path_buf(),
            }
            .into());
        }

        let entries = self.filesystem.list_entries(path)?;
        if !entries.is_empty() {
            return Err(ApplicationError::ConflictExists {
                path: path.to_path_buf(),
                entries,
            }
            .into());
        }

        self.ensure_writable(path, path)?;

        Ok(DestinationState {
            path: path.to_path_buf(),
            exists: true,
            is_empty: true,
            is_writable: true,
            entries: Vec::new(),
        })
    }

    /// Inspect the destination and create it if absent.
    ///
    /// The returned state describes the directory as it is afterwards, so
    /// validating an untouched empty directory twice yields the same state.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn validate(&self, path: &Path) -> SprigResult<DestinationState> {
        let state = self.inspect(path)?;

        if !state.exists {
            self.filesystem
                .create_dir_all(path)
                .map_err(|e| permission_to_not_writable(e, path))?;
            debug!("created destination");
        }

        Ok(DestinationState {
            exists: true,
            ..state
        })
    }

    fn ensure_writable(&self, probe: &Path, destination: &Path) -> SprigResult<()> {
        match self.permissions {
            PermissionModel::Unenforced => Ok(()),
            PermissionModel::Enforced if self.filesystem.is_writable(probe) => Ok(()),
            PermissionModel::Enforced => Err(ApplicationError::NotWritable {
                path: destination.to_path_buf(),
            }
            .into()),
        }
    }
}

fn nearest_existing_ancestor(fs: &dyn Filesystem, path: &Path) -> PathBuf {
    path.ancestors()
        .skip(1)
        .map(|p| {
            if p.as_os_str().is_empty() {
                Path::new(".")
            } else {
                p
            }
        })
        .find(|p| fs.exists(p))
        .unwrap_or(Path::new("."))
        .to_path_buf()
}

fn permission_to_not_writable(err: SprigError, path: &Path) -> SprigError {
    match err {
        SprigError::Application(ApplicationError::FilesystemError {
            kind: FsFailure::PermissionDenied,
            ..
        }) => ApplicationError::NotWritable {
            path: path.to_path_buf(),
        }
        .into(),
        other => other,
    }
}
