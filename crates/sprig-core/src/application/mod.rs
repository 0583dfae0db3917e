//! Application layer for Sprig.
//!
//! This layer contains:
//! - **Services**: use case orchestration (`ScaffoldService` and its steps)
//! - **Ports**: interface definitions (traits) for external dependencies
//! - **Errors**: application-specific error types
//!
//! The application layer coordinates the domain layer and performs all I/O
//! through ports. Business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    MaterializeReport, PermissionModel, ProjectMaterializer, ScaffoldOutcome, ScaffoldPlan,
    ScaffoldRequest, ScaffoldService, TargetValidator, TemplateFetcher,
};

pub use ports::{
    AutoDecline, BundledTemplateSource, FallbackConfirmation, FallbackContext, Filesystem,
    Installer, RemoteTemplateSource,
};

pub use error::{ApplicationError, FsFailure, RetrievalError};
