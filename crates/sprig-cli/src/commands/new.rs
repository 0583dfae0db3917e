//! Implementation of the `sprig new` command.
//!
//! Responsibility: translate CLI arguments into a `ScaffoldRequest`, wire the
//! adapters into the core service, and display results. No business logic
//! lives here.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use sprig_adapters::{
    BundledTemplates, GithubArchiveSource, LocalFilesystem, ProcessInstaller, capture_ambient,
};
use sprig_core::{
    application::{
        ScaffoldOutcome, ScaffoldPlan, ScaffoldRequest, ScaffoldService, ports::Installer,
    },
    domain::{
        FetchDescriptor, ManifestVariant, PackageManager, PackageManagerSelector, SourceResolver,
        TemplateReference,
    },
};

use crate::{
    cli::{GlobalArgs, NewArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    prompts::Prompter,
};

/// Execute the `sprig new` command.
///
/// Dispatch sequence:
/// 1. Settle the project directory (argument or prompt)
/// 2. Build the request from flags and configured defaults
/// 3. Early-exit with a plan if `--dry-run`
/// 4. Scaffold via `ScaffoldService`
/// 5. Install dependencies unless skipped
/// 6. Print next-steps guidance
#[instrument(skip_all, fields(example = args.example.as_deref().unwrap_or("default")))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let prompter = Prompter::detect(args.yes);
    debug!(interactive = prompter.is_interactive(), "prompt mode");

    // 1. Project directory
    let name = match args.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => name.to_string(),
        None => prompter.project_name()?,
    };
    let destination = resolve_destination(&name);

    // 2. Request
    let request = build_request(&args, &config, destination)?;
    debug!(?request, "request built");

    let service = build_service(&config)?;

    // 3. Dry run: resolve and inspect, never download or write.
    if args.dry_run {
        let plan = service.plan(&request)?;
        let manager =
            PackageManagerSelector::select_from(request.package_manager, &capture_ambient());
        show_plan(&plan, request.variant, manager.manager, &output)?;
        return Ok(());
    }

    // 4. Scaffold
    output.header(&format!(
        "Creating a new app in {}",
        display_path(&request.destination).display()
    ))?;
    info!(destination = %request.destination.display(), "scaffold started");

    let spinner = output.spinner("Downloading files...");
    let confirmation = prompter.fallback(spinner.clone());
    let result = service.scaffold(&request, &confirmation, &capture_ambient());
    spinner.finish_and_clear();
    let outcome = result?;

    report_outcome(&outcome, &output)?;

    // 5. Install
    let manager = outcome.package_manager.manager;
    let skip_install = args.skip_install || config.defaults.skip_install;
    if skip_install {
        output.info("Skipping dependency installation")?;
    } else {
        output.info(&format!("Installing dependencies with {manager}..."))?;
        ProcessInstaller::new()
            .quiet(global.quiet)
            .install(manager, &outcome.destination)?;
        output.success("Dependencies installed")?;
    }

    // 6. Next steps
    print_next_steps(&name, manager, skip_install, &output)?;
    Ok(())
}

// ── Request construction ──────────────────────────────────────────────────────

fn resolve_destination(name: &str) -> PathBuf {
    PathBuf::from(name)
}

fn build_request(
    args: &NewArgs,
    config: &AppConfig,
    destination: PathBuf,
) -> CliResult<ScaffoldRequest> {
    let reference = TemplateReference::parse(args.example.as_deref())?;

    let mut request = ScaffoldRequest::new(destination)
        .reference(reference)
        .variant(args.variant().unwrap_or(config.defaults.variant))
        .package_manager(args.package_manager().or(config.defaults.package_manager));
    if let Some(path) = &args.example_path {
        request = request.subpath(path.clone());
    }
    Ok(request)
}

fn build_service(config: &AppConfig) -> CliResult<ScaffoldService> {
    let registry = config.registry().map_err(|e| CliError::ConfigError {
        message: format!("invalid [examples] section: {e}"),
        source: Some(Box::new(e)),
    })?;
    let remote = GithubArchiveSource::new(config.github_settings())?;

    Ok(ScaffoldService::new(
        SourceResolver::new(registry),
        Arc::new(LocalFilesystem::new()),
        Box::new(remote),
        Box::new(BundledTemplates::new()),
    ))
}

// ── UI helpers ────────────────────────────────────────────────────────────────

/// Absolute form of a path for display; falls back to the path as given.
fn display_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn describe_template(descriptor: &FetchDescriptor) -> String {
    match descriptor {
        FetchDescriptor::Bundled => "default template".into(),
        FetchDescriptor::Remote(location) => match &location.example {
            Some(example) => format!("example \"{example}\""),
            None => format!("{location}"),
        },
    }
}

fn show_plan(
    plan: &ScaffoldPlan,
    variant: ManifestVariant,
    manager: PackageManager,
    out: &OutputManager,
) -> CliResult<()> {
    out.info(&format!(
        "Dry run: would create '{}' at {}",
        plan.project_name,
        display_path(&plan.destination.path).display()
    ))?;
    out.print(&format!("  Template:        {}", describe_template(&plan.descriptor)))?;
    out.print(&format!("  Variant:         {variant}"))?;
    out.print(&format!("  Package manager: {manager}"))?;
    let state = if plan.destination.exists { "exists, empty" } else { "will be created" };
    out.print(&format!("  Directory:       {state}"))?;
    Ok(())
}

fn report_outcome(outcome: &ScaffoldOutcome, out: &OutputManager) -> CliResult<()> {
    if outcome.used_fallback {
        out.warning(&format!(
            "{} was not found; used the default template instead",
            describe_template(&outcome.descriptor)
        ))?;
    }
    if outcome.report.generated_ignore {
        debug!("template had no ignore file, wrote the default one");
    }

    out.success(&format!(
        "Created {} at {} ({} files)",
        outcome.project_name,
        display_path(&outcome.destination).display(),
        outcome.report.files_written
    ))?;
    out.print(&format!(
        "Using {} ({})",
        outcome.package_manager.manager, outcome.package_manager.reason
    ))?;
    Ok(())
}

fn print_next_steps(
    name: &str,
    manager: PackageManager,
    install_skipped: bool,
    out: &OutputManager,
) -> CliResult<()> {
    if out.is_quiet() {
        return Ok(());
    }
    out.print("")?;
    out.print("Inside that directory, you can run several commands:")?;
    out.print("")?;
    out.command(&manager.run_script("dev"))?;
    out.print("    Starts the development server.")?;
    out.print("")?;
    out.command(&manager.run_script("build"))?;
    out.print("    Builds the app for production.")?;
    out.print("")?;
    out.command(&manager.run_script("start"))?;
    out.print("    Runs the built app in production mode.")?;
    out.print("")?;
    out.print("We suggest that you begin by typing:")?;
    out.print("")?;
    out.command(&format!("cd {name}"))?;
    if install_skipped {
        out.command(&format!("{manager} install"))?;
    }
    out.command(&manager.run_script("dev"))?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn args(example: Option<&str>) -> NewArgs {
        NewArgs {
            name: Some("my-app".into()),
            example: example.map(str::to_string),
            ..NewArgs::default()
        }
    }

    #[test]
    fn config_defaults_fill_missing_flags() {
        let mut config = AppConfig::default();
        config.defaults.variant = ManifestVariant::JavaScript;
        config.defaults.package_manager = Some(PackageManager::Yarn);

        let request = build_request(&args(None), &config, "my-app".into()).unwrap();
        assert_eq!(request.variant, ManifestVariant::JavaScript);
        assert_eq!(request.package_manager, Some(PackageManager::Yarn));
        assert!(request.reference.is_default());
    }

    #[test]
    fn flags_beat_config_defaults() {
        let mut config = AppConfig::default();
        config.defaults.package_manager = Some(PackageManager::Yarn);

        let mut cli = args(Some("blog"));
        cli.ts = true;
        cli.use_bun = true;
        cli.example_path = Some("apps/web".into());

        let request = build_request(&cli, &config, "my-app".into()).unwrap();
        assert_eq!(request.variant, ManifestVariant::TypeScript);
        assert_eq!(request.package_manager, Some(PackageManager::Bun));
        assert_eq!(request.explicit_subpath.as_deref(), Some("apps/web"));
    }

    #[test]
    fn bad_reference_is_rejected_before_any_io() {
        let err = build_request(
            &args(Some("ftp://github.com/a/b")),
            &AppConfig::default(),
            "x".into(),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Core(e) if e.is_invalid_reference()));
    }

    #[test]
    fn nested_destination_keeps_path() {
        assert_eq!(
            resolve_destination("apps/web-client"),
            PathBuf::from("apps").join("web-client")
        );
    }
}
