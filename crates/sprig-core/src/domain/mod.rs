//! Core domain layer for Sprig.
//!
//! Pure logic only: no filesystem, network, or process access. Everything
//! that touches the outside world goes through the ports in
//! [`crate::application::ports`].
//!
//! - [`resolver`] turns a [`TemplateReference`] into a [`FetchDescriptor`].
//! - [`package_manager`] picks a [`PackageManager`] from an
//!   [`AmbientSnapshot`].
//! - [`entities`] holds the staged tree and manifest model the
//!   materializer works on.

pub mod entities;
pub mod error;
pub mod package_manager;
pub mod registry;
pub mod resolver;
pub mod validation;
pub mod value_objects;

pub use entities::{
    DestinationState, FetchDescriptor, MANIFEST_FILE, ManifestProfile, PackageManifest,
    RelativePath, RemoteLocation, Repository, StagedFile, StagedTree, TemplateReference,
    TreeOrigin,
};
pub use error::{DomainError, ErrorCategory};
pub use package_manager::{AmbientSnapshot, PackageManagerSelector, Selection, SelectionReason};
pub use registry::{ExampleEntry, ExampleRegistry};
pub use resolver::SourceResolver;
pub use validation::{project_name_from_path, validate_package_name};
pub use value_objects::{ManifestVariant, PackageManager};

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Reference → descriptor
    // ========================================================================

    #[test]
    fn every_registered_example_resolves() {
        let resolver = SourceResolver::default();
        for entry in resolver.registry().entries() {
            let reference = TemplateReference::parse(Some(entry.name)).unwrap();
            let descriptor = resolver.resolve(&reference, None).unwrap();
            assert!(!descriptor.is_bundled(), "{}", entry.name);
        }
    }

    #[test]
    fn resolution_is_pure() {
        let resolver = SourceResolver::default();
        let reference =
            TemplateReference::parse(Some("https://github.com/acme/mono/tree/main/web")).unwrap();
        let first = resolver.resolve(&reference, Some("docs")).unwrap();
        let second = resolver.resolve(&reference, Some("docs")).unwrap();
        assert_eq!(first, second);
    }

    // ========================================================================
    // Errors
    // ========================================================================

    #[test]
    fn reference_errors_are_categorized() {
        let err = DomainError::UnknownExample {
            name: "nope".into(),
        };
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(err.suggestions().iter().any(|s| s.contains("sprig list")));

        let err = validate_package_name("Bad Name").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(!err.is_invalid_reference());
    }
}
