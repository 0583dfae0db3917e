//! Application services - orchestrate use cases.
//!
//! `ScaffoldService` drives the creation workflow; the other services are
//! its steps and can be used on their own.

pub mod fetcher;
pub mod materializer;
pub mod scaffold_service;
pub mod target_validator;

pub use fetcher::{MAX_ATTEMPTS, TemplateFetcher};
pub use materializer::{DEFAULT_GITIGNORE, MaterializeReport, ProjectMaterializer};
pub use scaffold_service::{ScaffoldOutcome, ScaffoldPlan, ScaffoldRequest, ScaffoldService};
pub use target_validator::{PermissionModel, TargetValidator};
