use std::collections::{BTreeMap, HashSet};

use crate::domain::{
    entities::{common::RelativePath, reference::RemoteLocation},
    error::DomainError,
    value_objects::ManifestVariant,
};

/// Where a staged tree came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeOrigin {
    Bundled,
    Remote(RemoteLocation),
}

/// One file waiting to be materialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub path: RelativePath,
    pub contents: Vec<u8>,
    pub executable: bool,
    /// `None` means the file belongs to every variant.
    pub variant: Option<ManifestVariant>,
}

impl StagedFile {
    pub fn new(path: RelativePath, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path,
            contents: contents.into(),
            executable: false,
            variant: None,
        }
    }

    pub fn executable(mut self, executable: bool) -> Self {
        self.executable = executable;
        self
    }

    pub fn for_variant(mut self, variant: ManifestVariant) -> Self {
        self.variant = Some(variant);
        self
    }

    pub fn applies_to(&self, variant: ManifestVariant) -> bool {
        self.variant.is_none_or(|v| v == variant)
    }
}

/// Dependency sets a template declares per variant.
///
/// Only bundled templates carry one; remote trees keep whatever their own
/// manifest lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestProfile {
    pub dependencies: BTreeMap<String, String>,
    pub dev_dependencies: BTreeMap<String, String>,
    /// Added to `dev_dependencies` for typed variants.
    pub typed_dev_dependencies: BTreeMap<String, String>,
    /// Script entries replaced (or added) for typed variants.
    pub typed_scripts: BTreeMap<String, String>,
}

impl ManifestProfile {
    pub fn dependencies_for(&self, _variant: ManifestVariant) -> BTreeMap<String, String> {
        self.dependencies.clone()
    }

    pub fn dev_dependencies_for(&self, variant: ManifestVariant) -> BTreeMap<String, String> {
        let mut merged = self.dev_dependencies.clone();
        if variant.is_typed() {
            merged.extend(
                self.typed_dev_dependencies
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone())),
            );
        }
        merged
    }

    pub fn scripts_for(&self, variant: ManifestVariant) -> BTreeMap<String, String> {
        if variant.is_typed() {
            self.typed_scripts.clone()
        } else {
            BTreeMap::new()
        }
    }
}

/// Ephemeral, in-memory file tree produced by a fetch.
///
/// Owned by the fetcher until handed (by value) to the materializer, which
/// consumes it.
#[derive(Debug, Clone)]
pub struct StagedTree {
    origin: TreeOrigin,
    files: Vec<StagedFile>,
    profile: Option<ManifestProfile>,
}

impl StagedTree {
    pub fn new(origin: TreeOrigin) -> Self {
        Self {
            origin,
            files: Vec::new(),
            profile: None,
        }
    }

    pub fn with_profile(mut self, profile: ManifestProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Add a file. Two files with the same path and overlapping variants are
    /// a duplicate.
    pub fn push(&mut self, file: StagedFile) -> Result<(), DomainError> {
        let clash = self.files.iter().any(|f| {
            f.path == file.path
                && (f.variant.is_none() || file.variant.is_none() || f.variant == file.variant)
        });
        if clash {
            return Err(DomainError::DuplicatePath {
                path: file.path.to_string(),
            });
        }
        self.files.push(file);
        Ok(())
    }

    pub fn with_file(mut self, file: StagedFile) -> Result<Self, DomainError> {
        self.push(file)?;
        Ok(self)
    }

    pub fn origin(&self) -> &TreeOrigin {
        &self.origin
    }

    pub fn profile(&self) -> Option<&ManifestProfile> {
        self.profile.as_ref()
    }

    pub fn files(&self) -> impl Iterator<Item = &StagedFile> {
        self.files.iter()
    }

    /// Files that belong to `variant`.
    pub fn files_for(&self, variant: ManifestVariant) -> impl Iterator<Item = &StagedFile> {
        self.files.iter().filter(move |f| f.applies_to(variant))
    }

    pub fn get(&self, path: &str) -> Option<&StagedFile> {
        self.files.iter().find(|f| f.path.as_str() == path)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Distinct paths, for checking the tree has no duplicates per variant.
    pub fn validate(&self) -> Result<(), DomainError> {
        for variant in ManifestVariant::ALL {
            let mut seen = HashSet::new();
            for file in self.files_for(variant) {
                if !seen.insert(file.path.as_str()) {
                    return Err(DomainError::DuplicatePath {
                        path: file.path.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn into_parts(self) -> (TreeOrigin, Vec<StagedFile>, Option<ManifestProfile>) {
        (self.origin, self.files, self.profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(p: &str) -> RelativePath {
        RelativePath::try_new(p).unwrap()
    }

    #[test]
    fn variant_files_may_share_a_path() {
        let mut tree = StagedTree::new(TreeOrigin::Bundled);
        tree.push(StagedFile::new(path("app/page"), "js").for_variant(ManifestVariant::JavaScript))
            .unwrap();
        tree.push(StagedFile::new(path("app/page"), "ts").for_variant(ManifestVariant::TypeScript))
            .unwrap();
        assert_eq!(tree.file_count(), 2);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn shared_file_clashes_with_variant_file() {
        let mut tree = StagedTree::new(TreeOrigin::Bundled);
        tree.push(StagedFile::new(path("README.md"), "a")).unwrap();
        let err = tree
            .push(StagedFile::new(path("README.md"), "b").for_variant(ManifestVariant::TypeScript))
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicatePath { .. }));
    }

    #[test]
    fn files_for_filters_by_variant() {
        let tree = StagedTree::new(TreeOrigin::Bundled)
            .with_file(StagedFile::new(path("package.json"), "{}"))
            .unwrap()
            .with_file(
                StagedFile::new(path("tsconfig.json"), "{}").for_variant(ManifestVariant::TypeScript),
            )
            .unwrap();

        assert_eq!(tree.files_for(ManifestVariant::JavaScript).count(), 1);
        assert_eq!(tree.files_for(ManifestVariant::TypeScript).count(), 2);
    }

    #[test]
    fn typed_profile_merges_dev_dependencies() {
        let profile = ManifestProfile {
            dev_dependencies: [("eslint".to_string(), "^9".to_string())].into(),
            typed_dev_dependencies: [("typescript".to_string(), "^5".to_string())].into(),
            ..Default::default()
        };
        let js: Vec<_> = profile.dev_dependencies_for(ManifestVariant::JavaScript).into_keys().collect();
        let ts: Vec<_> = profile.dev_dependencies_for(ManifestVariant::TypeScript).into_keys().collect();
        assert_eq!(js, ["eslint"]);
        assert_eq!(ts, ["eslint", "typescript"]);
    }
}
