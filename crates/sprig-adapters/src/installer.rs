//! Dependency installation by spawning the selected package manager.

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, info, instrument};

use sprig_core::{
    application::{ApplicationError, ports::Installer},
    domain::PackageManager,
    error::SprigResult,
};

/// Environment handed to every install, keeping install-time banners and
/// ad scripts quiet.
const INSTALL_ENV: &[(&str, &str)] = &[
    ("ADBLOCK", "1"),
    ("DISABLE_OPENCOLLECTIVE", "1"),
    ("NODE_ENV", "development"),
];

/// Runs `<manager> install` inside the project directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessInstaller {
    quiet: bool,
}

impl ProcessInstaller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard the child's output instead of streaming it to the terminal.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    fn run<S: AsRef<OsStr>>(
        &self,
        label: &str,
        program: S,
        args: &[&str],
        project_dir: &Path,
    ) -> SprigResult<()> {
        let failed = |reason: String| ApplicationError::InstallFailed {
            manager: label.to_string(),
            reason,
        };

        if !project_dir.is_dir() {
            return Err(failed(format!("{} is not a directory", project_dir.display())).into());
        }

        let (stdout, stderr) = if self.quiet {
            (Stdio::null(), Stdio::null())
        } else {
            (Stdio::inherit(), Stdio::inherit())
        };

        debug!(program = %label, ?args, dir = %project_dir.display(), "spawning installer");
        let status = Command::new(program)
            .args(args)
            .current_dir(project_dir)
            .envs(INSTALL_ENV.iter().copied())
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .status()
            .map_err(|e| failed(format!("could not start {label}: {e}")))?;

        if status.success() {
            Ok(())
        } else {
            let reason = match status.code() {
                Some(code) => format!("{label} exited with status {code}"),
                None => format!("{label} was terminated by a signal"),
            };
            Err(failed(reason).into())
        }
    }
}

impl Installer for ProcessInstaller {
    #[instrument(skip(self), fields(manager = %manager))]
    fn install(&self, manager: PackageManager, project_dir: &Path) -> SprigResult<()> {
        info!("installing dependencies");
        self.run(
            manager.as_str(),
            manager.binary(),
            manager.install_args(),
            project_dir,
        )
    }
}
