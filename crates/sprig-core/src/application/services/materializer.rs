use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{
        MANIFEST_FILE, ManifestProfile, ManifestVariant, PackageManifest, RelativePath, StagedTree,
    },
    error::{SprigError, SprigResult},
};

const IGNORE_FILE: &str = ".gitignore";
const TEMPLATE_IGNORE_FILE: &str = "gitignore";

/// Written when the template ships no ignore file of its own.
pub const DEFAULT_GITIGNORE: &str = "\
# dependencies
/node_modules
/.pnp
.pnp.*
.yarn/*

# testing
/coverage

# next.js
/.next/
/out/

# production
/build

# misc
.DS_Store
*.pem

# debug
npm-debug.log*
yarn-debug.log*
yarn-error.log*

# env files
.env*

# typescript
*.tsbuildinfo
next-env.d.ts
";

/// What materialization did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializeReport {
    pub files_written: usize,
    pub manifest_path: PathBuf,
    /// `true` when the default ignore file was written.
    pub generated_ignore: bool,
}

pub struct ProjectMaterializer {
    filesystem: Arc<dyn Filesystem>,
}

impl ProjectMaterializer {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Write `tree` into `destination`, consuming it.
    ///
    /// The destination must already have been validated. A failure part way
    /// leaves the files written so far in place.
    #[instrument(skip(self, tree), fields(destination = %destination.display(), %variant))]
    pub fn materialize(
        &self,
        tree: StagedTree,
        destination: &Path,
        variant: ManifestVariant,
        project_name: &str,
    ) -> SprigResult<MaterializeReport> {
        let (_, files, profile) = tree.into_parts();

        let mut files_written = 0;
        let mut manifest_path = None;
        let mut has_ignore = false;

        for file in files.into_iter().filter(|f| f.applies_to(variant)) {
            let relative = output_path(&file.path)?;
            let target = destination.join(relative.to_path_buf());

            let contents = if is_manifest(&relative) {
                manifest_path = Some(target.clone());
                render_manifest(&file.contents, project_name, variant, profile.as_ref())?
            } else {
                file.contents
            };
            has_ignore |= relative.is_top_level() && relative.as_str() == IGNORE_FILE;

            self.write(&target, &contents, file.executable)?;
            files_written += 1;
        }

        let manifest_path = match manifest_path {
            Some(path) => path,
            None => {
                debug!("template has no manifest, writing a minimal one");
                let path = destination.join(MANIFEST_FILE);
                let mut manifest = PackageManifest::minimal(project_name);
                manifest.apply(project_name, variant, profile.as_ref());
                let bytes = manifest.to_bytes().map_err(manifest_error)?;
                self.write_plain(&path, &bytes)?;
                files_written += 1;
                path
            }
        };

        if !has_ignore {
            self.write_plain(&destination.join(IGNORE_FILE), DEFAULT_GITIGNORE.as_bytes())?;
            files_written += 1;
        }

        info!(files_written, "project materialized");
        Ok(MaterializeReport {
            files_written,
            manifest_path,
            generated_ignore: !has_ignore,
        })
    }

    fn write(&self, target: &Path, contents: &[u8], executable: bool) -> SprigResult<()> {
        self.write_plain(target, contents)?;
        if executable {
            self.filesystem
                .set_executable(target)
                .map_err(|e| write_failed(target, e))?;
        }
        Ok(())
    }

    fn write_plain(&self, target: &Path, contents: &[u8]) -> SprigResult<()> {
        if let Some(parent) = target.parent() {
            self.filesystem
                .create_dir_all(parent)
                .map_err(|e| write_failed(parent, e))?;
        }
        self.filesystem
            .write_file(target, contents)
            .map_err(|e| write_failed(target, e))
    }
}

/// Template-side names that are stored differently from how they are
/// written.
fn output_path(path: &RelativePath) -> SprigResult<RelativePath> {
    if path.is_top_level() && path.as_str() == TEMPLATE_IGNORE_FILE {
        return Ok(RelativePath::try_new(IGNORE_FILE)?);
    }
    Ok(path.clone())
}

fn is_manifest(path: &RelativePath) -> bool {
    path.is_top_level() && path.as_str() == MANIFEST_FILE
}

fn render_manifest(
    raw: &[u8],
    project_name: &str,
    variant: ManifestVariant,
    profile: Option<&ManifestProfile>,
) -> SprigResult<Vec<u8>> {
    let mut manifest = PackageManifest::parse(raw).map_err(manifest_error)?;
    manifest.apply(project_name, variant, profile);
    manifest.to_bytes().map_err(manifest_error)
}

fn manifest_error(err: crate::domain::DomainError) -> SprigError {
    ApplicationError::ManifestInvalid {
        reason: err.to_string(),
    }
    .into()
}

fn write_failed(path: &Path, err: SprigError) -> SprigError {
    ApplicationError::WriteFailed {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use super::*;
    use crate::domain::{StagedFile, TreeOrigin};

    #[derive(Default)]
    struct RecordingFs {
        files: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
        executable: Mutex<Vec<PathBuf>>,
        fail_on: Option<PathBuf>,
    }

    impl RecordingFs {
        fn read(&self, path: &str) -> String {
            let files = self.files.lock().unwrap();
            String::from_utf8(files[Path::new(path)].clone()).unwrap()
        }

        fn paths(&self) -> Vec<String> {
            self.files
                .lock()
                .unwrap()
                .keys()
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .collect()
        }
    }

    impl Filesystem for RecordingFs {
        fn create_dir_all(&self, _: &Path) -> SprigResult<()> {
            Ok(())
        }
        fn write_file(&self, path: &Path, contents: &[u8]) -> SprigResult<()> {
            if self.fail_on.as_deref() == Some(path) {
                return Err(ApplicationError::filesystem(
                    path,
                    &std::io::Error::other("disk full"),
                )
                .into());
            }
            self.files
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), contents.to_vec());
            Ok(())
        }
        fn set_executable(&self, path: &Path) -> SprigResult<()> {
            self.executable.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }
        fn exists(&self, path: &Path) -> bool {
            self.files.lock().unwrap().contains_key(path)
        }
        fn is_dir(&self, _: &Path) -> bool {
            false
        }
        fn list_entries(&self, _: &Path) -> SprigResult<Vec<String>> {
            Ok(Vec::new())
        }
        fn is_writable(&self, _: &Path) -> bool {
            true
        }
    }

    fn path(p: &str) -> RelativePath {
        RelativePath::try_new(p).unwrap()
    }

    fn bundled_tree() -> StagedTree {
        let profile = ManifestProfile {
            dependencies: [("next", "15"), ("react", "^19"), ("react-dom", "^19")]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            dev_dependencies: [("eslint".to_string(), "^9".to_string())].into(),
            typed_dev_dependencies: [("@types/react", "^19"), ("typescript", "^5")]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            typed_scripts: BTreeMap::new(),
        };
        StagedTree::new(TreeOrigin::Bundled)
            .with_profile(profile)
            .with_file(StagedFile::new(
                path("package.json"),
                r#"{"name":"x","scripts":{"dev":"next dev"}}"#,
            ))
            .unwrap()
            .with_file(StagedFile::new(path("gitignore"), "node_modules\n"))
            .unwrap()
            .with_file(
                StagedFile::new(path("app/page.js"), "js").for_variant(ManifestVariant::JavaScript),
            )
            .unwrap()
            .with_file(
                StagedFile::new(path("app/page.tsx"), "ts").for_variant(ManifestVariant::TypeScript),
            )
            .unwrap()
            .with_file(
                StagedFile::new(path("next-env.d.ts"), "///").for_variant(ManifestVariant::TypeScript),
            )
            .unwrap()
    }

    fn materialize(
        fs: Arc<RecordingFs>,
        tree: StagedTree,
        variant: ManifestVariant,
    ) -> SprigResult<MaterializeReport> {
        ProjectMaterializer::new(fs).materialize(tree, Path::new("out"), variant, "my-app")
    }

    #[test]
    fn typed_variant_selects_typed_files() {
        let fs = Arc::new(RecordingFs::default());
        let report = materialize(fs.clone(), bundled_tree(), ManifestVariant::TypeScript).unwrap();

        assert_eq!(
            fs.paths(),
            ["out/.gitignore", "out/app/page.tsx", "out/next-env.d.ts", "out/package.json"]
        );
        assert_eq!(report.files_written, 4);
        assert!(!report.generated_ignore);
        assert_eq!(report.manifest_path, Path::new("out").join("package.json"));
    }

    #[test]
    fn untyped_variant_omits_typed_files() {
        let fs = Arc::new(RecordingFs::default());
        materialize(fs.clone(), bundled_tree(), ManifestVariant::JavaScript).unwrap();
        assert_eq!(fs.paths(), ["out/.gitignore", "out/app/page.js", "out/package.json"]);
    }

    #[test]
    fn manifest_is_renamed_and_dependencies_selected() {
        let fs = Arc::new(RecordingFs::default());
        materialize(fs.clone(), bundled_tree(), ManifestVariant::TypeScript).unwrap();

        let manifest: serde_json::Value =
            serde_json::from_str(&fs.read("out/package.json")).unwrap();
        assert_eq!(manifest["name"], "my-app");
        let deps: Vec<_> = manifest["dependencies"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(deps, ["next", "react", "react-dom"]);
        let dev: Vec<_> = manifest["devDependencies"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(dev, ["@types/react", "eslint", "typescript"]);
    }

    #[test]
    fn manifest_output_is_reproducible() {
        let a = Arc::new(RecordingFs::default());
        let b = Arc::new(RecordingFs::default());
        materialize(a.clone(), bundled_tree(), ManifestVariant::TypeScript).unwrap();
        materialize(b.clone(), bundled_tree(), ManifestVariant::TypeScript).unwrap();
        assert_eq!(a.read("out/package.json"), b.read("out/package.json"));
    }

    #[test]
    fn default_ignore_file_is_generated() {
        let fs = Arc::new(RecordingFs::default());
        let tree = StagedTree::new(TreeOrigin::Bundled)
            .with_file(StagedFile::new(path("index.js"), "x"))
            .unwrap();
        let report = materialize(fs.clone(), tree, ManifestVariant::JavaScript).unwrap();

        assert!(report.generated_ignore);
        assert_eq!(fs.read("out/.gitignore"), DEFAULT_GITIGNORE);
        assert!(fs.read("out/package.json").contains("\"name\": \"my-app\""));
    }

    #[test]
    fn executable_bits_are_preserved() {
        let fs = Arc::new(RecordingFs::default());
        let tree = StagedTree::new(TreeOrigin::Bundled)
            .with_file(StagedFile::new(path("bin/run.sh"), "#!/bin/sh").executable(true))
            .unwrap();
        materialize(fs.clone(), tree, ManifestVariant::JavaScript).unwrap();
        assert_eq!(
            *fs.executable.lock().unwrap(),
            [Path::new("out").join("bin").join("run.sh")]
        );
    }

    #[test]
    fn write_error_is_write_failed() {
        let fs = Arc::new(RecordingFs {
            fail_on: Some(Path::new("out").join("app").join("page.js")),
            ..Default::default()
        });
        let err = materialize(fs, bundled_tree(), ManifestVariant::JavaScript).unwrap_err();
        assert!(err.to_string().starts_with("Failed to write"));
    }

    #[test]
    fn invalid_manifest_is_reported() {
        let fs = Arc::new(RecordingFs::default());
        let tree = StagedTree::new(TreeOrigin::Bundled)
            .with_file(StagedFile::new(path("package.json"), "{"))
            .unwrap();
        let err = materialize(fs, tree, ManifestVariant::JavaScript).unwrap_err();
        assert!(matches!(
            err,
            SprigError::Application(ApplicationError::ManifestInvalid { .. })
        ));
    }
}
