//! Interactive questions asked by `sprig new`.
//!
//! Prompts only appear when stdin and stderr are terminals and `--yes` was
//! not given. Otherwise the fallback question is answered "no".

use std::io::{self, IsTerminal};

use indicatif::ProgressBar;
use tracing::debug;

use sprig_core::application::{FallbackConfirmation, FallbackContext};

use crate::error::{CliError, CliResult};

pub const DEFAULT_PROJECT_NAME: &str = "my-app";

/// Decides whether questions may be asked.
#[derive(Debug, Clone, Copy)]
pub struct Prompter {
    interactive: bool,
}

impl Prompter {
    /// Interactive only on a real terminal and without `--yes`.
    pub fn detect(assume_yes: bool) -> Self {
        let interactive = cfg!(feature = "interactive")
            && !assume_yes
            && io::stdin().is_terminal()
            && io::stderr().is_terminal();
        Self { interactive }
    }

    #[cfg(test)]
    pub fn non_interactive() -> Self {
        Self { interactive: false }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Ask for the project directory, validated as a package name.
    pub fn project_name(&self) -> CliResult<String> {
        if !self.interactive {
            return Err(CliError::MissingProjectName);
        }
        ask_project_name()
    }

    /// Confirmation used when a remote template cannot be found.
    ///
    /// The spinner, if any, is paused while the question is on screen.
    pub fn fallback(&self, spinner: ProgressBar) -> FallbackPrompt {
        FallbackPrompt {
            interactive: self.interactive,
            spinner,
        }
    }
}

/// Asks whether to use the default template instead of a missing remote one.
pub struct FallbackPrompt {
    interactive: bool,
    spinner: ProgressBar,
}

impl FallbackConfirmation for FallbackPrompt {
    fn confirm(&self, context: &FallbackContext) -> bool {
        if !self.interactive {
            debug!(location = %context.location, "fallback declined, not interactive");
            return false;
        }
        let question = format!(
            "Could not find \"{}\" ({}). Use the default template instead?",
            context.location, context.error
        );
        self.spinner.suspend(|| ask_confirm(&question))
    }
}

#[cfg(feature = "interactive")]
fn ask_project_name() -> CliResult<String> {
    use dialoguer::{Input, theme::ColorfulTheme};
    use sprig_core::domain::validate_package_name;

    Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt("What is your project named?")
        .default(DEFAULT_PROJECT_NAME.into())
        .validate_with(|input: &String| -> Result<(), String> {
            let name = input.trim();
            let leaf = std::path::Path::new(name)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            validate_package_name(&leaf).map_err(|e| e.to_string())
        })
        .interact_text()
        .map(|name| name.trim().to_string())
        .map_err(|e| match e {
            dialoguer::Error::IO(io) if io.kind() == std::io::ErrorKind::Interrupted => {
                CliError::Cancelled
            }
            other => CliError::Prompt {
                message: other.to_string(),
            },
        })
}

#[cfg(not(feature = "interactive"))]
fn ask_project_name() -> CliResult<String> {
    Err(CliError::MissingProjectName)
}

#[cfg(feature = "interactive")]
fn ask_confirm(question: &str) -> bool {
    use dialoguer::{Confirm, theme::ColorfulTheme};

    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(question)
        .default(true)
        .interact()
        .unwrap_or(false)
}

#[cfg(not(feature = "interactive"))]
fn ask_confirm(_question: &str) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprig_core::{
        application::RetrievalError,
        domain::{RemoteLocation, Repository},
    };

    fn context() -> FallbackContext {
        FallbackContext {
            location: RemoteLocation {
                repository: Repository::parse("acme/gone").unwrap(),
                git_ref: None,
                subpath: None,
                example: None,
            },
            error: RetrievalError::NotFound("404".into()),
            attempts: 2,
        }
    }

    #[test]
    fn non_interactive_declines_fallback() {
        let prompt = Prompter::non_interactive().fallback(ProgressBar::hidden());
        assert!(!prompt.confirm(&context()));
    }

    #[test]
    fn non_interactive_cannot_ask_for_name() {
        assert!(matches!(
            Prompter::non_interactive().project_name(),
            Err(CliError::MissingProjectName)
        ));
    }

    #[test]
    fn yes_disables_prompts() {
        assert!(!Prompter::detect(true).is_interactive());
    }
}
