//! Infrastructure adapters for Sprig.
//!
//! This crate implements the ports defined in `sprig_core::application::ports`
//! and holds every piece of I/O: the local disk, the embedded default
//! template, GitHub downloads, the search path, and child processes.

pub mod bundled;
pub mod environment;
pub mod filesystem;
pub mod github;
pub mod installer;

pub use bundled::BundledTemplates;
pub use environment::capture_ambient;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use github::{GithubArchiveSource, GithubSettings};
pub use installer::ProcessInstaller;
