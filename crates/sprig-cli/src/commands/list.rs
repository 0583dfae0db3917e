//! Implementation of the `sprig list` command.

use serde_json::json;

use sprig_core::domain::ExampleEntry;

use crate::{
    cli::{ListArgs, ListFormat},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let registry = config.registry()?;
    let examples = registry.entries();

    match args.format {
        ListFormat::Table => {
            output.header(&format!(
                "Examples from {} ({}):",
                registry.repository(),
                registry.branch()
            ))?;
            let width = examples.iter().map(|e| e.name.len()).max().unwrap_or(0);
            for example in examples {
                output.print(&format!(
                    "  {:<width$}  {}",
                    example.name, example.description
                ))?;
            }
            output.print("")?;
            output.print("Use one with: sprig new my-app --example <name>")?;
        }

        // Machine-readable output bypasses OutputManager so it stays
        // parseable even with --quiet.
        ListFormat::Json => {
            let text = serde_json::to_string_pretty(&to_json(examples)).map_err(|e| {
                CliError::ConfigError {
                    message: format!("failed to encode example list: {e}"),
                    source: Some(Box::new(e)),
                }
            })?;
            println!("{text}");
        }

        ListFormat::List => {
            for example in examples {
                println!("{}", example.name);
            }
        }
    }

    Ok(())
}

fn to_json(examples: &[ExampleEntry]) -> serde_json::Value {
    examples
        .iter()
        .map(|e| json!({ "name": e.name, "description": e.description }))
        .collect()
}
