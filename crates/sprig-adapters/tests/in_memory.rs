//! The scaffold workflow over `MemoryFilesystem`.

use std::path::Path;
use std::sync::Arc;

use sprig_adapters::{BundledTemplates, MemoryFilesystem};
use sprig_core::{
    application::{ApplicationError, RetrievalError},
    domain::{RelativePath, RemoteLocation, StagedFile, StagedTree, TreeOrigin},
    prelude::*,
};

/// Serves a small starter with one executable script.
struct Starter;

impl RemoteTemplateSource for Starter {
    fn retrieve(&self, location: &RemoteLocation) -> Result<StagedTree, RetrievalError> {
        let file = |path: &str, body: &str| {
            StagedFile::new(RelativePath::try_new(path).unwrap(), body)
        };
        StagedTree::new(TreeOrigin::Remote(location.clone()))
            .with_file(file("package.json", r#"{"name":"starter","dependencies":{"left-pad":"1"}}"#))
            .and_then(|t| t.with_file(file("index.js", "console.log(1)")))
            .and_then(|t| t.with_file(file("bin/dev.sh", "#!/bin/sh\n").executable(true)))
            .map_err(|e| RetrievalError::Corrupt(e.to_string()))
    }
}

fn service(fs: &MemoryFilesystem) -> ScaffoldService {
    ScaffoldService::new(
        SourceResolver::new(ExampleRegistry::default()),
        Arc::new(fs.clone()),
        Box::new(Starter),
        Box::new(BundledTemplates::new()),
    )
}

fn starter_request(dest: &str) -> ScaffoldRequest {
    ScaffoldRequest::new(dest)
        .reference(TemplateReference::parse(Some("https://github.com/acme/starter")).unwrap())
}

#[test]
fn remote_starter_is_written_with_exec_bits() {
    let fs = MemoryFilesystem::new();

    let outcome = service(&fs)
        .scaffold(&starter_request("web"), &AutoDecline, &AmbientSnapshot::default())
        .unwrap();

    assert!(!outcome.used_fallback);
    assert!(fs.is_executable(Path::new("web/bin/dev.sh")));
    assert!(!fs.is_executable(Path::new("web/index.js")));

    let manifest: serde_json::Value =
        serde_json::from_str(&fs.read_file(Path::new("web/package.json")).unwrap()).unwrap();
    assert_eq!(manifest["name"], "web");
    assert_eq!(manifest["dependencies"]["left-pad"], "1");
    assert!(fs.read_file(Path::new("web/.gitignore")).is_some());
}

#[test]
fn read_only_parent_is_not_writable() {
    let fs = MemoryFilesystem::new();
    fs.set_read_only("locked");

    let err = service(&fs)
        .scaffold(&starter_request("locked/web"), &AutoDecline, &AmbientSnapshot::default())
        .unwrap_err();

    assert!(matches!(
        err,
        SprigError::Application(ApplicationError::NotWritable { .. })
    ));
    assert!(fs.list_files().is_empty());
}

#[test]
fn file_at_destination_is_occupied() {
    let fs = MemoryFilesystem::new();
    fs.write_file(Path::new("web"), b"stray").unwrap();

    let err = service(&fs)
        .scaffold(&starter_request("web"), &AutoDecline, &AmbientSnapshot::default())
        .unwrap_err();

    assert!(matches!(
        err,
        SprigError::Application(ApplicationError::PathOccupied { .. })
    ));
    assert_eq!(fs.list_files(), [Path::new("web").to_path_buf()]);
}
