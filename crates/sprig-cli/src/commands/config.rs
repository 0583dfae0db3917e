//! `sprig config`: inspect configuration values.

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            println!("{}", get_config_value(&config, &key)?);
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            let serialised =
                toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                    message: format!("Failed to serialise config: {e}"),
                    source: Some(Box::new(e)),
                })?;
            output.print(serialised.trim_end())?;
        }

        ConfigCommands::Path => {
            println!(
                "{}",
                AppConfig::active_path(global.config.as_deref()).display()
            );
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

/// Scalar values print bare; sections print as JSON.
fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    match config.get(key) {
        Some(serde_json::Value::String(s)) => Ok(s),
        Some(serde_json::Value::Object(map)) => Ok(serde_json::Value::Object(map).to_string()),
        Some(other) => Ok(other.to_string()),
        None => Err(CliError::ConfigError {
            message: format!("Unknown config key: '{key}'"),
            source: None,
        }),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_known_key() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "defaults.variant").unwrap(), "typescript");
        assert_eq!(get_config_value(&cfg, "network.timeout_secs").unwrap(), "30");
    }

    #[test]
    fn get_unknown_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(
            get_config_value(&cfg, "does.not.exist"),
            Err(CliError::ConfigError { .. })
        ));
    }

    #[test]
    fn unset_optional_key_is_unknown() {
        let cfg = AppConfig::default();
        assert!(get_config_value(&cfg, "defaults.package_manager").is_err());
    }

    #[test]
    fn section_prints_as_json() {
        let cfg = AppConfig::default();
        let value = get_config_value(&cfg, "output").unwrap();
        assert_eq!(value, r#"{"no_color":false}"#);
    }
}
