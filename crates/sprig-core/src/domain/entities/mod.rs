pub mod common;
pub mod destination;
pub mod manifest;
pub mod reference;
pub mod staged_tree;

pub use crate::domain::DomainError;
pub use common::RelativePath;
pub use destination::DestinationState;
pub use manifest::{MANIFEST_FILE, PackageManifest};
pub use reference::{FetchDescriptor, RemoteLocation, Repository, TemplateReference};
pub use staged_tree::{ManifestProfile, StagedFile, StagedTree, TreeOrigin};
