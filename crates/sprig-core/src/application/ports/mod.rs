//! Application ports (traits) for external dependencies.
//!
//! Driven ports are called by the services and implemented in
//! `sprig-adapters` (or by the CLI, for the prompt-backed ones):
//!
//! - `Filesystem`: destination inspection and file writes
//! - `RemoteTemplateSource`: one retrieval attempt of a hosted template
//! - `BundledTemplateSource`: the template compiled into the binary
//! - `FallbackConfirmation`: the yes/no question asked after a failed fetch
//! - `Installer`: dependency installation after materialization

pub mod output;

pub use output::{
    AutoDecline, BundledTemplateSource, FallbackConfirmation, FallbackContext, Filesystem,
    Installer, RemoteTemplateSource,
};

#[cfg(test)]
pub use output::MockRemoteTemplateSource;
