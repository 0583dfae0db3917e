// ============================================================================
// domain/error.rs - PURE FAILURES (no I/O involved)
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (the fetcher re-reports them after a retry)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Reference errors
    // ========================================================================
    #[error("Invalid template reference '{reference}': {reason}")]
    InvalidReference { reference: String, reason: String },

    #[error("Could not locate an example named \"{name}\"")]
    UnknownExample { name: String },

    #[error("Unsupported repository host '{host}': only github.com repositories can be fetched")]
    UnsupportedHost { host: String },

    // ========================================================================
    // Path errors
    // ========================================================================
    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Path escapes the template root: {path}")]
    PathTraversal { path: String },

    #[error("Duplicate path in staged tree: {path}")]
    DuplicatePath { path: String },

    // ========================================================================
    // Input errors
    // ========================================================================
    #[error("Could not create a project called \"{name}\" because of npm naming restrictions")]
    InvalidPackageName { name: String, problems: Vec<String> },

    #[error("Unknown template variant '{0}'")]
    UnknownVariant(String),

    #[error("Unknown package manager '{0}'")]
    UnknownPackageManager(String),

    #[error("Invalid package manifest: {reason}")]
    InvalidManifest { reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnknownExample { name } => vec![
                format!("\"{name}\" is not in the example registry"),
                "Try: sprig list to see the available examples".into(),
                "Or pass a full GitHub URL with --example".into(),
            ],
            Self::InvalidReference { .. } => vec![
                "Pass an example name, 'default', or a GitHub URL".into(),
                "Example: --example https://github.com/owner/repo/tree/main/app".into(),
            ],
            Self::UnsupportedHost { .. } => vec![
                "Templates can only be downloaded from github.com".into(),
            ],
            Self::InvalidPackageName { problems, .. } => {
                let mut out: Vec<String> = problems.iter().map(|p| format!("  • {p}")).collect();
                out.push("Choose a lowercase name such as my-app".into());
                out
            }
            Self::UnknownVariant(_) => vec!["Supported variants: javascript, typescript".into()],
            Self::UnknownPackageManager(_) => {
                vec!["Supported package managers: npm, pnpm, yarn, bun".into()]
            }
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownExample { .. } => ErrorCategory::NotFound,
            Self::InvalidReference { .. }
            | Self::UnsupportedHost { .. }
            | Self::InvalidPackageName { .. }
            | Self::UnknownVariant(_)
            | Self::UnknownPackageManager(_) => ErrorCategory::Validation,
            Self::AbsolutePathNotAllowed { .. }
            | Self::PathTraversal { .. }
            | Self::DuplicatePath { .. }
            | Self::InvalidManifest { .. } => ErrorCategory::Internal,
        }
    }

    /// Whether this error belongs to the `InvalidReference` failure class.
    pub fn is_invalid_reference(&self) -> bool {
        matches!(
            self,
            Self::InvalidReference { .. } | Self::UnknownExample { .. } | Self::UnsupportedHost { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
