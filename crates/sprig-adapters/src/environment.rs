//! Ambient facts used for package manager selection.

use std::env;

use tracing::debug;

use sprig_core::domain::{AmbientSnapshot, PackageManager};

/// Variable npm-compatible launchers set for child processes.
pub const USER_AGENT_VAR: &str = "npm_config_user_agent";

/// Read the launcher's user agent and probe the search path for every
/// known package manager.
pub fn capture_ambient() -> AmbientSnapshot {
    capture_with(env::var(USER_AGENT_VAR).ok(), |binary| {
        which::which(binary).is_ok()
    })
}

/// Build a snapshot from an explicit user agent and probe.
pub fn capture_with(
    user_agent: Option<String>,
    probe: impl Fn(&str) -> bool,
) -> AmbientSnapshot {
    let mut snapshot = AmbientSnapshot::default();
    if let Some(agent) = user_agent.filter(|a| !a.trim().is_empty()) {
        snapshot = snapshot.with_user_agent(agent);
    }

    for manager in PackageManager::SEARCH_ORDER {
        if probe(manager.binary()) {
            snapshot = snapshot.with_available(manager);
        }
    }

    debug!(
        user_agent = ?snapshot.user_agent,
        available = ?snapshot.available,
        "captured ambient environment"
    );
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_only_found_binaries() {
        let snapshot = capture_with(None, |bin| bin == "pnpm" || bin == "bun");
        let found: Vec<_> = snapshot.available.iter().copied().collect();
        assert_eq!(found, [PackageManager::Pnpm, PackageManager::Bun]);
        assert!(snapshot.user_agent.is_none());
    }

    #[test]
    fn blank_user_agent_is_ignored() {
        let snapshot = capture_with(Some("  ".into()), |_| false);
        assert!(snapshot.user_agent.is_none());
        assert!(snapshot.available.is_empty());
    }

    #[test]
    fn keeps_user_agent() {
        let snapshot = capture_with(Some("yarn/4.1.0 npm/? node/v20".into()), |_| true);
        assert_eq!(snapshot.user_agent.as_deref(), Some("yarn/4.1.0 npm/? node/v20"));
        assert_eq!(snapshot.available.len(), 4);
    }
}
