//! Domain value objects: ManifestVariant, PackageManager.
//!
//! # Design
//!
//! These are pure value types: `Copy` and compared by value.
//! This file only defines the types, their string representations, and
//! their `FromStr` parsers. Selection logic lives in `package_manager.rs`.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── ManifestVariant ──────────────────────────────────────────────────────────

/// Template flavor: decides which entry points, config files, and dependency
/// sets are materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestVariant {
    JavaScript,
    #[default]
    TypeScript,
}

impl ManifestVariant {
    pub const ALL: [Self; 2] = [Self::JavaScript, Self::TypeScript];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
        }
    }

    /// Short directory/flag form (`js`, `ts`).
    pub const fn short(&self) -> &'static str {
        match self {
            Self::JavaScript => "js",
            Self::TypeScript => "ts",
        }
    }

    /// Whether this variant carries type declarations and a compiler.
    pub const fn is_typed(self) -> bool {
        matches!(self, Self::TypeScript)
    }
}

impl fmt::Display for ManifestVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ManifestVariant {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "javascript" | "js" => Ok(Self::JavaScript),
            "typescript" | "ts" => Ok(Self::TypeScript),
            other => Err(DomainError::UnknownVariant(other.to_string())),
        }
    }
}

// ── PackageManager ───────────────────────────────────────────────────────────

/// A package manager identity handed to the installer.
///
/// The core only selects the identity; lockfile creation and the install
/// itself belong to the installer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl PackageManager {
    /// Probe order used when neither a flag nor the user agent decides.
    pub const SEARCH_ORDER: [Self; 4] = [Self::Npm, Self::Pnpm, Self::Yarn, Self::Bun];

    /// The manager assumed to exist everywhere.
    pub const FALLBACK: Self = Self::Npm;

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Pnpm => "pnpm",
            Self::Yarn => "yarn",
            Self::Bun => "bun",
        }
    }

    /// Executable name probed on the search path.
    pub const fn binary(&self) -> &'static str {
        self.as_str()
    }

    /// Lockfile the installer is expected to produce.
    pub const fn lockfile(&self) -> &'static str {
        match self {
            Self::Npm => "package-lock.json",
            Self::Pnpm => "pnpm-lock.yaml",
            Self::Yarn => "yarn.lock",
            Self::Bun => "bun.lockb",
        }
    }

    pub const fn install_args(&self) -> &'static [&'static str] {
        &["install"]
    }

    /// Command line that runs a manifest script, e.g. `npm run dev`.
    pub fn run_script(&self, script: &str) -> String {
        match self {
            Self::Npm => format!("npm run {script}"),
            other => format!("{} {script}", other.as_str()),
        }
    }

    /// Parse an `npm_config_user_agent` style string such as
    /// `pnpm/9.1.0 npm/? node/v20.11.0 darwin arm64`.
    pub fn from_user_agent(user_agent: &str) -> Option<Self> {
        let product = user_agent.split_whitespace().next()?;
        let name = product.split('/').next()?;
        name.parse().ok()
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageManager {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "npm" => Ok(Self::Npm),
            "pnpm" => Ok(Self::Pnpm),
            "yarn" => Ok(Self::Yarn),
            "bun" => Ok(Self::Bun),
            other => Err(DomainError::UnknownPackageManager(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_parses_short_and_long_forms() {
        assert_eq!("ts".parse::<ManifestVariant>().unwrap(), ManifestVariant::TypeScript);
        assert_eq!("JavaScript".parse::<ManifestVariant>().unwrap(), ManifestVariant::JavaScript);
        assert!("coffee".parse::<ManifestVariant>().is_err());
    }

    #[test]
    fn default_variant_is_typed() {
        assert!(ManifestVariant::default().is_typed());
        assert!(!ManifestVariant::JavaScript.is_typed());
    }

    #[test]
    fn lockfiles_are_distinct() {
        let mut names: Vec<_> = PackageManager::SEARCH_ORDER.iter().map(|p| p.lockfile()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn user_agent_parsing() {
        assert_eq!(
            PackageManager::from_user_agent("pnpm/9.1.0 npm/? node/v20.11.0 darwin arm64"),
            Some(PackageManager::Pnpm)
        );
        assert_eq!(
            PackageManager::from_user_agent("yarn/1.22.19 npm/? node/v18.0.0 linux x64"),
            Some(PackageManager::Yarn)
        );
        assert_eq!(
            PackageManager::from_user_agent("bun/1.1.0 npm/? node/v21 linux x64"),
            Some(PackageManager::Bun)
        );
        assert_eq!(PackageManager::from_user_agent("deno/1.0"), None);
        assert_eq!(PackageManager::from_user_agent(""), None);
    }

    #[test]
    fn run_script_forms() {
        assert_eq!(PackageManager::Npm.run_script("dev"), "npm run dev");
        assert_eq!(PackageManager::Yarn.run_script("dev"), "yarn dev");
    }
}
