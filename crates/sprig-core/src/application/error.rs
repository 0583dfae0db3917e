//! Application layer errors.
//!
//! These errors represent failures while orchestrating I/O, not business
//! rules. Business rule violations are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// Remote retrieval failed after the retry and no fallback was taken.
    #[error("Could not download \"{reference}\": {reason}")]
    FetchFailed {
        reference: String,
        reason: String,
        not_found: bool,
    },

    #[error(
        "The directory {} contains files that could conflict:\n{}",
        path.display(),
        list_entries(entries)
    )]
    ConflictExists { path: PathBuf, entries: Vec<String> },

    /// Something other than a directory already sits at the destination.
    #[error(
        "The path {} already exists and is not a directory, so it could conflict",
        path.display()
    )]
    PathOccupied { path: PathBuf },

    #[error(
        "The application path {} is not writable, please check folder permissions (write permission is missing)",
        path.display()
    )]
    NotWritable { path: PathBuf },

    /// Materialization stopped part way; files already written stay.
    #[error("Failed to write {}: {reason}", path.display())]
    WriteFailed { path: PathBuf, reason: String },

    #[error("Filesystem error at {}: {reason}", path.display())]
    FilesystemError {
        path: PathBuf,
        reason: String,
        kind: FsFailure,
    },

    #[error("Template manifest is invalid: {reason}")]
    ManifestInvalid { reason: String },

    /// The project is on disk; only dependency installation failed.
    #[error("Installing dependencies with {manager} failed: {reason}")]
    InstallFailed { manager: String, reason: String },
}

/// Coarse classification of a filesystem failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsFailure {
    PermissionDenied,
    NotFound,
    Other,
}

impl From<std::io::ErrorKind> for FsFailure {
    fn from(kind: std::io::ErrorKind) -> Self {
        match kind {
            std::io::ErrorKind::PermissionDenied | std::io::ErrorKind::ReadOnlyFilesystem => {
                Self::PermissionDenied
            }
            std::io::ErrorKind::NotFound => Self::NotFound,
            _ => Self::Other,
        }
    }
}

fn list_entries(entries: &[String]) -> String {
    entries
        .iter()
        .map(|e| format!("  {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

impl ApplicationError {
    pub fn filesystem(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::FilesystemError {
            path: path.into(),
            reason: err.to_string(),
            kind: err.kind().into(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FetchFailed { not_found: true, .. } => vec![
                "Check that the repository and path exist and are public".into(),
                "Run: sprig list to see the named examples".into(),
            ],
            Self::FetchFailed { .. } => vec![
                "Check your network connection and try again".into(),
                "Set SPRIG_NETWORK__TIMEOUT_SECS to allow slower downloads".into(),
            ],
            Self::ConflictExists { .. } => vec![
                "Either try using a new directory name, or remove the files listed above".into(),
            ],
            Self::PathOccupied { path } => vec![
                format!("Remove or rename {}", path.display()),
                "Or choose a different project directory".into(),
            ],
            Self::NotWritable { path } => vec![
                format!("Grant write permission on {}", path.display()),
                "Or choose a directory you own".into(),
            ],
            Self::WriteFailed { path, .. } => vec![
                format!("Some files may already exist in {}", path.display()),
                "Remove the partially written directory before retrying".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Ensure the parent directory exists".into(),
            ],
            Self::InstallFailed { manager, .. } => vec![
                "The project files were created; only the install step failed".into(),
                format!("Run: {manager} install inside the project directory"),
            ],
            Self::ManifestInvalid { .. } => vec!["The template's package.json is not valid JSON".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FetchFailed { not_found: true, .. } => ErrorCategory::NotFound,
            Self::FetchFailed { .. } => ErrorCategory::Network,
            Self::ConflictExists { .. } | Self::PathOccupied { .. } => ErrorCategory::Conflict,
            Self::NotWritable { .. } => ErrorCategory::Permission,
            Self::FilesystemError {
                kind: FsFailure::PermissionDenied,
                ..
            } => ErrorCategory::Permission,
            Self::WriteFailed { .. } | Self::FilesystemError { .. } => ErrorCategory::Internal,
            Self::ManifestInvalid { .. } => ErrorCategory::Validation,
            Self::InstallFailed { .. } => ErrorCategory::Internal,
        }
    }
}

/// Why a single remote retrieval attempt failed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RetrievalError {
    /// Repository, ref, or subpath does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("network error: {0}")]
    Network(String),

    /// The archive could not be decoded.
    #[error("corrupt archive: {0}")]
    Corrupt(String),
}

impl RetrievalError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_stable_substrings() {
        let conflict = ApplicationError::ConflictExists {
            path: "my-app".into(),
            entries: vec!["README.md".into(), "src".into()],
        };
        let text = conflict.to_string();
        assert!(text.contains("contains files that could conflict"));
        assert!(text.contains("  README.md"));

        let occupied = ApplicationError::PathOccupied {
            path: "my-app".into(),
        };
        assert!(occupied.to_string().contains("could conflict"));
        assert_eq!(occupied.category(), ErrorCategory::Conflict);

        let perm = ApplicationError::NotWritable {
            path: "/ro/app".into(),
        };
        assert!(perm.to_string().contains("write permission"));

        let fetch = ApplicationError::FetchFailed {
            reference: "acme/x".into(),
            reason: "not found".into(),
            not_found: true,
        };
        assert!(fetch.to_string().contains("Could not download"));
    }

    #[test]
    fn categories_distinguish_failure_classes() {
        let nf = ApplicationError::FetchFailed {
            reference: "r".into(),
            reason: "x".into(),
            not_found: true,
        };
        let net = ApplicationError::FetchFailed {
            reference: "r".into(),
            reason: "x".into(),
            not_found: false,
        };
        assert_eq!(nf.category(), ErrorCategory::NotFound);
        assert_eq!(net.category(), ErrorCategory::Network);
        assert_eq!(
            ApplicationError::NotWritable { path: "p".into() }.category(),
            ErrorCategory::Permission
        );
    }

    #[test]
    fn io_kinds_map_to_failures() {
        assert_eq!(
            FsFailure::from(std::io::ErrorKind::PermissionDenied),
            FsFailure::PermissionDenied
        );
        assert_eq!(FsFailure::from(std::io::ErrorKind::NotFound), FsFailure::NotFound);
        assert_eq!(FsFailure::from(std::io::ErrorKind::Other), FsFailure::Other);
    }
}
