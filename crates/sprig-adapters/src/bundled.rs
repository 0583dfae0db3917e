//! The default template, compiled into the binary.
//!
//! Files live under `templates/default/` in this crate:
//!
//! - `shared/` is written for every variant
//! - `ts/` and `js/` hold the typed and untyped counterparts
//! - `template.json` declares the dependency sets per variant
//!
//! The ignore file is stored as `gitignore`; the materializer renames it.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::{debug, instrument};

use sprig_core::{
    application::ports::BundledTemplateSource,
    domain::{ManifestProfile, ManifestVariant, RelativePath, StagedFile, StagedTree, TreeOrigin},
    error::{SprigError, SprigResult},
};

macro_rules! template_file {
    ($variant:expr, $dir:literal, $path:literal) => {
        (
            $variant,
            $path,
            include_bytes!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/templates/default/",
                $dir,
                "/",
                $path
            ))
            .as_slice(),
        )
    };
}

type EmbeddedFile = (Option<ManifestVariant>, &'static str, &'static [u8]);

const TS: Option<ManifestVariant> = Some(ManifestVariant::TypeScript);
const JS: Option<ManifestVariant> = Some(ManifestVariant::JavaScript);

const FILES: &[EmbeddedFile] = &[
    template_file!(None, "shared", "package.json"),
    template_file!(None, "shared", "README.md"),
    template_file!(None, "shared", "gitignore"),
    template_file!(None, "shared", "next.config.mjs"),
    template_file!(None, "shared", "eslint.config.mjs"),
    template_file!(None, "shared", "app/globals.css"),
    template_file!(TS, "ts", "app/layout.tsx"),
    template_file!(TS, "ts", "app/page.tsx"),
    template_file!(TS, "ts", "next-env.d.ts"),
    template_file!(TS, "ts", "tsconfig.json"),
    template_file!(JS, "js", "app/layout.js"),
    template_file!(JS, "js", "app/page.js"),
    template_file!(JS, "js", "jsconfig.json"),
];

const PROFILE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/templates/default/template.json"
));

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileFile {
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
    #[serde(default)]
    dev_dependencies: BTreeMap<String, String>,
    #[serde(default)]
    typed_dev_dependencies: BTreeMap<String, String>,
    #[serde(default)]
    typed_scripts: BTreeMap<String, String>,
}

impl From<ProfileFile> for ManifestProfile {
    fn from(p: ProfileFile) -> Self {
        Self {
            dependencies: p.dependencies,
            dev_dependencies: p.dev_dependencies,
            typed_dev_dependencies: p.typed_dev_dependencies,
            typed_scripts: p.typed_scripts,
        }
    }
}

/// Serves the embedded default template.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledTemplates;

impl BundledTemplates {
    pub fn new() -> Self {
        Self
    }

    /// Number of embedded files across all variants.
    pub fn file_count() -> usize {
        FILES.len()
    }
}

impl BundledTemplateSource for BundledTemplates {
    #[instrument(skip(self))]
    fn default_tree(&self) -> SprigResult<StagedTree> {
        let profile: ProfileFile =
            serde_json::from_str(PROFILE).map_err(|e| SprigError::Internal {
                message: format!("bundled template profile is invalid: {e}"),
            })?;

        let mut tree = StagedTree::new(TreeOrigin::Bundled).with_profile(profile.into());
        for (variant, path, contents) in FILES {
            let mut file = StagedFile::new(RelativePath::try_new(path)?, *contents);
            file.variant = *variant;
            tree.push(file)?;
        }

        debug!(files = tree.file_count(), "loaded bundled template");
        Ok(tree)
    }
}
