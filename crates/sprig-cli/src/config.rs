//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `SPRIG_` prefix, `__` between sections,
//!    e.g. `SPRIG_NETWORK__TIMEOUT_SECS=60`
//! 3. Config file: `--config FILE`, else `<config dir>/sprig/config.toml`
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use sprig_adapters::GithubSettings;
use sprig_core::domain::{
    ExampleRegistry, ManifestVariant, PackageManager,
    registry::{DEFAULT_EXAMPLES_BRANCH, DEFAULT_EXAMPLES_DIRECTORY, DEFAULT_EXAMPLES_REPOSITORY},
};

pub const ENV_PREFIX: &str = "SPRIG";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default values for new projects.
    pub defaults: Defaults,
    /// Remote template downloads.
    pub network: NetworkConfig,
    /// Where named examples live.
    pub examples: ExamplesConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defaults {
    pub variant: ManifestVariant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_manager: Option<PackageManager>,
    pub skip_install: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub github_api: String,
    pub codeload: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamplesConfig {
    pub repository: String,
    pub branch: String,
    pub directory: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let github = GithubSettings::default();
        Self {
            defaults: Defaults {
                variant: ManifestVariant::default(),
                package_manager: None,
                skip_install: false,
            },
            network: NetworkConfig {
                timeout_secs: github.timeout.as_secs(),
                user_agent: None,
                github_api: github.api_base,
                codeload: github.codeload_base,
            },
            examples: ExamplesConfig {
                repository: DEFAULT_EXAMPLES_REPOSITORY.into(),
                branch: DEFAULT_EXAMPLES_BRANCH.into(),
                directory: DEFAULT_EXAMPLES_DIRECTORY.into(),
            },
            output: OutputConfig { no_color: false },
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the config file, then `SPRIG_*`
    /// environment variables.
    ///
    /// An explicit `config_file` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_from(config_file, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_from(config_file: Option<&Path>, environment: Environment) -> anyhow::Result<Self> {
        let file = match config_file {
            Some(path) => File::from(path).format(FileFormat::Toml).required(true),
            None => File::from(Self::config_path())
                .format(FileFormat::Toml)
                .required(false),
        };

        let defaults = toml::to_string(&Self::default()).context("failed to encode defaults")?;
        let settings = Config::builder()
            .add_source(File::from_str(&defaults, FileFormat::Toml))
            .add_source(file)
            .add_source(environment.prefix_separator("_").separator("__"))
            .build()
            .context("failed to read configuration")?;

        let config: Self = settings
            .try_deserialize()
            .context("configuration has invalid values")?;
        anyhow::ensure!(
            config.network.timeout_secs > 0,
            "network.timeout_secs must be at least 1"
        );
        Ok(config)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::BaseDirs` for cross-platform correctness,
    /// falling back to `.sprig.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::BaseDirs::new()
            .map(|d| d.config_dir().join("sprig").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".sprig.toml"))
    }

    /// The file this run reads: `--config` if given, else the default.
    pub fn active_path(config_file: Option<&Path>) -> PathBuf {
        config_file.map_or_else(Self::config_path, Path::to_path_buf)
    }

    pub fn registry(&self) -> Result<ExampleRegistry, sprig_core::domain::DomainError> {
        ExampleRegistry::with_location(
            &self.examples.repository,
            self.examples.branch.clone(),
            &self.examples.directory,
        )
    }

    pub fn github_settings(&self) -> GithubSettings {
        let mut settings = GithubSettings {
            api_base: self.network.github_api.clone(),
            codeload_base: self.network.codeload.clone(),
            timeout: Duration::from_secs(self.network.timeout_secs),
            ..GithubSettings::default()
        };
        if let Some(agent) = &self.network.user_agent {
            settings.user_agent = agent.clone();
        }
        settings
    }

    /// Look up a dotted key such as `network.timeout_secs`.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let root = serde_json::to_value(self).ok()?;
        key.split('.')
            .try_fold(root, |value, part| value.get(part).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn defaults_match_upstream_examples() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.examples.repository, "vercel/next.js");
        assert_eq!(cfg.examples.branch, "canary");
        assert_eq!(cfg.defaults.variant, ManifestVariant::TypeScript);
        assert_eq!(cfg.network.timeout_secs, 30);
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn explicit_file_must_exist_and_may_be_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load_from(Some(dir.path().join("none.toml").as_path()), env(&[]));
        assert!(cfg.is_err(), "explicit config must exist");

        let path = dir.path().join("sprig.toml");
        std::fs::write(&path, "").unwrap();
        let cfg = AppConfig::load_from(Some(path.as_path()), env(&[])).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sprig.toml");
        std::fs::write(
            &path,
            "[defaults]\nvariant = \"javascript\"\npackage_manager = \"pnpm\"\n\n[network]\ntimeout_secs = 5\n",
        )
        .unwrap();

        let cfg = AppConfig::load_from(Some(path.as_path()), env(&[])).unwrap();
        assert_eq!(cfg.defaults.variant, ManifestVariant::JavaScript);
        assert_eq!(cfg.defaults.package_manager, Some(PackageManager::Pnpm));
        assert_eq!(cfg.network.timeout_secs, 5);
        assert_eq!(cfg.examples.branch, "canary");
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sprig.toml");
        std::fs::write(&path, "[network]\ntimeout_secs = 5\n").unwrap();

        let cfg = AppConfig::load_from(
            Some(path.as_path()),
            env(&[
                ("SPRIG_NETWORK__TIMEOUT_SECS", "90"),
                ("SPRIG_DEFAULTS__SKIP_INSTALL", "true"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.network.timeout_secs, 90);
        assert!(cfg.defaults.skip_install);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sprig.toml");
        std::fs::write(&path, "").unwrap();

        let err = AppConfig::load_from(
            Some(path.as_path()),
            env(&[("SPRIG_NETWORK__TIMEOUT_SECS", "0")]),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("network.timeout_secs"));
    }

    #[test]
    fn get_walks_dotted_keys() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.get("examples.branch"), Some("canary".into()));
        assert_eq!(cfg.get("output.no_color"), Some(false.into()));
        assert_eq!(cfg.get("nope.nothing"), None);
    }

    #[test]
    fn github_settings_follow_network_section() {
        let mut cfg = AppConfig::default();
        cfg.network.timeout_secs = 7;
        cfg.network.user_agent = Some("custom/1".into());

        let settings = cfg.github_settings();
        assert_eq!(settings.timeout, Duration::from_secs(7));
        assert_eq!(settings.user_agent, "custom/1");
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
