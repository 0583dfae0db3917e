//! Sprig Core - template resolution and project materialization.
//!
//! This crate provides the domain and application layers for the Sprig
//! web-application bootstrapper, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             sprig-cli (CLI)             │
//! │   (argument parsing, prompts, output)   │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │          Application Services           │
//! │  ScaffoldService → TemplateFetcher →    │
//! │  TargetValidator → ProjectMaterializer  │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Application Ports (Traits)       │
//! │ Filesystem, RemoteTemplateSource, ...   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      sprig-adapters (Infrastructure)    │
//! │ LocalFilesystem, GithubArchiveSource,   │
//! │ BundledTemplates, ProcessInstaller      │
//! └─────────────────────────────────────────┘
//!
//! Domain layer (pure): SourceResolver, PackageManagerSelector,
//! StagedTree, PackageManifest
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sprig_core::prelude::*;
//!
//! let service = ScaffoldService::new(resolver, filesystem, remote, bundled);
//! let request = ScaffoldRequest::new("my-app")
//!     .reference(TemplateReference::parse(Some("with-docker"))?);
//! let outcome = service.scaffold(&request, &AutoDecline, &ambient)?;
//! ```

pub mod application;
pub mod domain;
pub mod error;

/// Public API - what external crates should use.
pub mod prelude {
    pub use crate::application::{
        ApplicationError, AutoDecline, FallbackConfirmation, FallbackContext, PermissionModel,
        ScaffoldOutcome, ScaffoldPlan, ScaffoldRequest, ScaffoldService,
        ports::{BundledTemplateSource, Filesystem, Installer, RemoteTemplateSource},
    };
    pub use crate::domain::{
        AmbientSnapshot, ExampleRegistry, FetchDescriptor, ManifestVariant, PackageManager,
        SourceResolver, TemplateReference,
    };
    pub use crate::error::{SprigError, SprigResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
