//! The project manifest (`package.json`).
//!
//! Only the fields the materializer rewrites are typed; every other field is
//! carried through untouched, in template order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{
    entities::staged_tree::ManifestProfile, error::DomainError, value_objects::ManifestVariant,
};

pub const MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    /// Script order is the template's own.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub scripts: Map<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dev_dependencies: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PackageManifest {
    /// Manifest written when a template ships none.
    pub fn minimal(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: Some("0.1.0".into()),
            private: Some(true),
            scripts: Map::new(),
            dependencies: BTreeMap::new(),
            dev_dependencies: BTreeMap::new(),
            extra: Map::new(),
        }
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, DomainError> {
        serde_json::from_slice(bytes).map_err(|e| DomainError::InvalidManifest {
            reason: e.to_string(),
        })
    }

    /// Pretty JSON with a trailing newline.
    pub fn to_bytes(&self) -> Result<Vec<u8>, DomainError> {
        let mut out = serde_json::to_vec_pretty(self).map_err(|e| DomainError::InvalidManifest {
            reason: e.to_string(),
        })?;
        out.push(b'\n');
        Ok(out)
    }

    /// Rename the project and, when the template declares a profile, select
    /// the dependency sets and script substitutions for `variant`.
    pub fn apply(
        &mut self,
        project_name: &str,
        variant: ManifestVariant,
        profile: Option<&ManifestProfile>,
    ) {
        self.name = project_name.to_string();

        let Some(profile) = profile else {
            return;
        };

        self.dependencies = profile.dependencies_for(variant);
        self.dev_dependencies = profile.dev_dependencies_for(variant);
        for (script, command) in profile.scripts_for(variant) {
            self.scripts.insert(script, Value::String(command));
        }
    }
}
