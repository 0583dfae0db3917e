use super::DomainError;
use std::fmt;
use std::path::{Path, PathBuf};

/// A normalized, forward-slash path relative to a template root.
///
/// Invariant: never absolute, never empty, never contains `..`.
/// Enforced at construction, so archive entries and subpaths that would
/// escape the destination cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(String);

impl RelativePath {
    /// Fallible constructor. Backslashes become `/`, `.` segments and
    /// repeated or trailing separators are dropped.
    pub fn try_new(path: impl AsRef<str>) -> Result<Self, DomainError> {
        let raw = path.as_ref();
        let unified = raw.replace('\\', "/");

        if unified.starts_with('/') || Path::new(raw).is_absolute() || has_drive_prefix(&unified)
        {
            return Err(DomainError::AbsolutePathNotAllowed { path: raw.into() });
        }

        let mut segments = Vec::new();
        for segment in unified.split('/') {
            match segment {
                "" | "." => continue,
                ".." => return Err(DomainError::PathTraversal { path: raw.into() }),
                s => segments.push(s),
            }
        }

        if segments.is_empty() {
            return Err(DomainError::InvalidReference {
                reference: raw.into(),
                reason: "path is empty".into(),
            });
        }

        Ok(Self(segments.join("/")))
    }

    /// For compile-time constants known to be normalized.
    pub(crate) fn from_trusted(path: &str) -> Self {
        Self(path.to_string())
    }

    /// Join a segment, maintaining the relative invariant.
    pub fn join(&self, segment: impl AsRef<str>) -> Result<Self, DomainError> {
        Self::try_new(format!("{}/{}", self.0, segment.as_ref()))
    }

    /// Strip `prefix` if this path lies beneath it.
    pub fn strip_prefix(&self, prefix: &RelativePath) -> Option<RelativePath> {
        self.0
            .strip_prefix(prefix.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|rest| !rest.is_empty())
            .map(|rest| Self(rest.to_string()))
    }

    pub fn is_top_level(&self) -> bool {
        !self.0.contains('/')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Platform path for this relative path.
    pub fn to_path_buf(&self) -> PathBuf {
        self.0.split('/').collect()
    }
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RelativePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
