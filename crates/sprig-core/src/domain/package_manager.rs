use std::collections::BTreeSet;
use std::fmt;

use crate::domain::value_objects::PackageManager;

/// Ambient signals captured once, before selection.
///
/// Keeping this as plain data lets the selector stay pure; the adapters
/// layer fills it from the environment and the search path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmbientSnapshot {
    /// Value of `npm_config_user_agent`, if the process was launched by a
    /// package manager.
    pub user_agent: Option<String>,
    /// Managers whose binary was found on the search path.
    pub available: BTreeSet<PackageManager>,
}

impl AmbientSnapshot {
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_available(mut self, manager: PackageManager) -> Self {
        self.available.insert(manager);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionReason {
    Explicit,
    UserAgent,
    SearchPath,
    Fallback,
}

impl fmt::Display for SelectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Explicit => "requested explicitly",
            Self::UserAgent => "detected from the invoking package manager",
            Self::SearchPath => "found on PATH",
            Self::Fallback => "default",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub manager: PackageManager,
    pub reason: SelectionReason,
}

pub struct PackageManagerSelector;

impl PackageManagerSelector {
    /// Pick a package manager: explicit choice, then the invoking manager's
    /// user agent, then the first binary on the search path, then npm.
    pub fn select(
        explicit: Option<PackageManager>,
        user_agent: Option<&str>,
        probe: impl Fn(PackageManager) -> bool,
    ) -> Selection {
        if let Some(manager) = explicit {
            return Selection {
                manager,
                reason: SelectionReason::Explicit,
            };
        }

        if let Some(manager) = user_agent.and_then(PackageManager::from_user_agent) {
            return Selection {
                manager,
                reason: SelectionReason::UserAgent,
            };
        }

        if let Some(manager) = PackageManager::SEARCH_ORDER.into_iter().find(|m| probe(*m)) {
            return Selection {
                manager,
                reason: SelectionReason::SearchPath,
            };
        }

        Selection {
            manager: PackageManager::FALLBACK,
            reason: SelectionReason::Fallback,
        }
    }

    pub fn select_from(explicit: Option<PackageManager>, ambient: &AmbientSnapshot) -> Selection {
        Self::select(explicit, ambient.user_agent.as_deref(), |m| {
            ambient.available.contains(&m)
        })
    }
}
