//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

use sprig_core::domain::{ManifestVariant, PackageManager};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "sprig",
    bin_name = "sprig",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Bootstrap a web application from the default template or an example",
    long_about = "Sprig creates a new web application in an empty directory, \
                  from the bundled default template, a named example, or any \
                  public GitHub repository.",
    after_help = "EXAMPLES:\n\
        \x20 sprig new my-app\n\
        \x20 sprig new blog --example blog-starter\n\
        \x20 sprig new site --example https://github.com/acme/starters/tree/main/web\n\
        \x20 sprig list\n\
        \x20 sprig completions bash > /usr/share/bash-completion/completions/sprig",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project.
    #[command(
        visible_alias = "n",
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 sprig new my-app\n\
            \x20 sprig new my-app --js --use-pnpm\n\
            \x20 sprig new my-app -e with-tailwindcss --skip-install\n\
            \x20 sprig new my-app -e https://github.com/acme/mono --example-path apps/web"
    )]
    New(NewArgs),

    /// List the named examples.
    #[command(
        visible_alias = "ls",
        about = "List available examples",
        after_help = "EXAMPLES:\n\
            \x20 sprig list\n\
            \x20 sprig list --format json"
    )]
    List(ListArgs),

    /// Write a default configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 sprig init\n\
            \x20 sprig init --force\n\
            \x20 sprig --config ./sprig.toml init"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 sprig completions bash > ~/.local/share/bash-completion/completions/sprig\n\
            \x20 sprig completions zsh  > ~/.zfunc/_sprig\n\
            \x20 sprig completions fish > ~/.config/fish/completions/sprig.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the configuration.
    #[command(
        about = "Configuration inspection",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 sprig config path\n\
            \x20 sprig config get defaults.variant\n\
            \x20 sprig config list"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `sprig new`.
#[derive(Debug, Default, Args)]
#[command(group(
    ArgGroup::new("package_manager")
        .args(["use_npm", "use_pnpm", "use_yarn", "use_bun"])
        .multiple(false)
))]
pub struct NewArgs {
    /// Project directory.  A plain name creates `./name`; the final path
    /// component becomes the package name.
    #[arg(value_name = "NAME", help = "Project directory (prompted if omitted)")]
    pub name: Option<String>,

    /// Example name or repository URL.
    #[arg(
        short = 'e',
        long = "example",
        value_name = "NAME|URL",
        help = "Named example or GitHub URL to start from"
    )]
    pub example: Option<String>,

    /// Directory inside the repository, for branch names containing `/`.
    #[arg(
        long = "example-path",
        value_name = "PATH",
        help = "Path to the example inside the repository"
    )]
    pub example_path: Option<String>,

    #[arg(
        long = "ts",
        visible_alias = "typescript",
        conflicts_with = "js",
        help = "Use the TypeScript variant (default)"
    )]
    pub ts: bool,

    #[arg(
        long = "js",
        visible_alias = "javascript",
        help = "Use the JavaScript variant"
    )]
    pub js: bool,

    #[arg(long = "use-npm", help = "Install dependencies with npm")]
    pub use_npm: bool,

    #[arg(long = "use-pnpm", help = "Install dependencies with pnpm")]
    pub use_pnpm: bool,

    #[arg(long = "use-yarn", help = "Install dependencies with Yarn")]
    pub use_yarn: bool,

    #[arg(long = "use-bun", help = "Install dependencies with Bun")]
    pub use_bun: bool,

    /// Leave dependency installation to the user.
    #[arg(long = "skip-install", help = "Do not install dependencies")]
    pub skip_install: bool,

    /// Never prompt; declines the default-template fallback.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Run without prompts"
    )]
    pub yes: bool,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

impl NewArgs {
    /// Variant chosen on the command line, if any.
    pub fn variant(&self) -> Option<ManifestVariant> {
        if self.js {
            Some(ManifestVariant::JavaScript)
        } else if self.ts {
            Some(ManifestVariant::TypeScript)
        } else {
            None
        }
    }

    /// Package manager chosen on the command line, if any.
    pub fn package_manager(&self) -> Option<PackageManager> {
        [
            (self.use_npm, PackageManager::Npm),
            (self.use_pnpm, PackageManager::Pnpm),
            (self.use_yarn, PackageManager::Yarn),
            (self.use_bun, PackageManager::Bun),
        ]
        .into_iter()
        .find_map(|(set, manager)| set.then_some(manager))
    }
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `sprig list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Names with descriptions.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `sprig init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `sprig completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `sprig config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `network.timeout_secs`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    fn parse_new(args: &[&str]) -> NewArgs {
        let cli = Cli::parse_from(["sprig", "new"].into_iter().chain(args.iter().copied()));
        match cli.command {
            Commands::New(args) => args,
            other => panic!("expected New command, got {other:?}"),
        }
    }

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn new_without_name_is_allowed() {
        let args = parse_new(&[]);
        assert!(args.name.is_none());
        assert_eq!(args.variant(), None);
        assert_eq!(args.package_manager(), None);
    }

    #[test]
    fn example_short_flag() {
        let args = parse_new(&["app", "-e", "blog", "--example-path", "apps/web"]);
        assert_eq!(args.example.as_deref(), Some("blog"));
        assert_eq!(args.example_path.as_deref(), Some("apps/web"));
    }

    #[test]
    fn variant_flags() {
        assert_eq!(parse_new(&["app", "--js"]).variant(), Some(ManifestVariant::JavaScript));
        assert_eq!(parse_new(&["app", "--typescript"]).variant(), Some(ManifestVariant::TypeScript));
        assert!(Cli::try_parse_from(["sprig", "new", "app", "--ts", "--js"]).is_err());
    }

    #[test]
    fn package_manager_flags_are_exclusive() {
        assert_eq!(
            parse_new(&["app", "--use-pnpm"]).package_manager(),
            Some(PackageManager::Pnpm)
        );
        assert!(Cli::try_parse_from(["sprig", "new", "app", "--use-npm", "--use-bun"]).is_err());
    }

    #[test]
    fn list_format_defaults_to_table() {
        let cli = Cli::parse_from(["sprig", "list"]);
        assert!(matches!(
            cli.command,
            Commands::List(ListArgs { format: ListFormat::Table })
        ));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["sprig", "--quiet", "--verbose", "list"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["sprig", "list", "-vv", "--config", "x.toml"]);
        assert_eq!(cli.global.verbose, 2);
        assert_eq!(cli.global.config.as_deref(), Some(std::path::Path::new("x.toml")));
    }
}
