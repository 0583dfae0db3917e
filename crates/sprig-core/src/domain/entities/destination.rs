use std::path::PathBuf;

/// Snapshot of the destination directory.
///
/// Computed fresh on every validation and never cached; the directory can
/// change between invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationState {
    pub path: PathBuf,
    pub exists: bool,
    pub is_empty: bool,
    pub is_writable: bool,
    /// Names of the entries already present, sorted.
    pub entries: Vec<String>,
}

impl DestinationState {
    /// State of a path that does not exist yet.
    pub fn absent(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            exists: false,
            is_empty: true,
            is_writable: true,
            entries: Vec::new(),
        }
    }
}
