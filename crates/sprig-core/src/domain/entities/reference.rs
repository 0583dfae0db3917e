//! Template references and the fetch descriptors they resolve to.
//!
//! A [`TemplateReference`] is what the user typed; a [`FetchDescriptor`] is
//! the unambiguous location the fetcher works from.

use std::fmt;

use url::Url;

use crate::domain::{entities::common::RelativePath, error::DomainError};

/// Reserved name that selects the bundled template.
pub const DEFAULT_SENTINEL: &str = "default";

/// Raw user input naming the desired project skeleton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateReference {
    /// Nothing given, or the `"default"` sentinel.
    Default,
    /// A bare name looked up in the example registry.
    Named(String),
    /// A URL on a Git hosting provider.
    Url(Url),
}

impl TemplateReference {
    /// Classify raw input.
    ///
    /// Input containing `://` must parse as an http(s) URL; anything else is
    /// treated as a bare example name. Whether that name exists is decided
    /// later, by the resolver.
    pub fn parse(raw: Option<&str>) -> Result<Self, DomainError> {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(Self::Default);
        };

        if raw == DEFAULT_SENTINEL {
            return Ok(Self::Default);
        }

        if raw.contains("://") {
            let url = Url::parse(raw).map_err(|e| DomainError::InvalidReference {
                reference: raw.into(),
                reason: format!("malformed URL: {e}"),
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(DomainError::InvalidReference {
                    reference: raw.into(),
                    reason: format!("unsupported scheme '{}'", url.scheme()),
                });
            }
            return Ok(Self::Url(url));
        }

        Ok(Self::Named(raw.to_string()))
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }
}

impl fmt::Display for TemplateReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str(DEFAULT_SENTINEL),
            Self::Named(name) => f.write_str(name),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

/// `owner/name` on the hosting provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repository {
    owner: String,
    name: String,
}

impl Repository {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self, DomainError> {
        let owner = owner.into();
        let name = name.into();
        let name = name.strip_suffix(".git").map(str::to_string).unwrap_or(name);

        for part in [&owner, &name] {
            if part.is_empty() || part.contains('/') || part == "." || part == ".." {
                return Err(DomainError::InvalidReference {
                    reference: format!("{owner}/{name}"),
                    reason: "repository must be written as owner/name".into(),
                });
            }
        }
        Ok(Self { owner, name })
    }

    pub(crate) fn from_trusted(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse `owner/name`.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.trim_matches('/').split_once('/') {
            Some((owner, name)) => Self::new(owner, name),
            None => Err(DomainError::InvalidReference {
                reference: s.into(),
                reason: "repository must be written as owner/name".into(),
            }),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A resolved remote template location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLocation {
    pub repository: Repository,
    /// Branch, tag, or commit. `None` means the repository's default branch.
    pub git_ref: Option<String>,
    /// Directory within the repository; `None` is the repository root.
    pub subpath: Option<RelativePath>,
    /// Registry name when this location came from a named example.
    pub example: Option<String>,
}

impl RemoteLocation {
    /// Same location pinned to a concrete ref.
    pub fn with_ref(&self, git_ref: impl Into<String>) -> Self {
        Self {
            git_ref: Some(git_ref.into()),
            ..self.clone()
        }
    }
}

impl fmt::Display for RemoteLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(example) = &self.example {
            return f.write_str(example);
        }
        write!(f, "{}", self.repository)?;
        if let Some(git_ref) = &self.git_ref {
            write!(f, "@{git_ref}")?;
        }
        if let Some(subpath) = &self.subpath {
            write!(f, ":{subpath}")?;
        }
        Ok(())
    }
}

/// Resolved, unambiguous result of interpreting a [`TemplateReference`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchDescriptor {
    /// The template compiled into the binary; never touches the network.
    Bundled,
    Remote(RemoteLocation),
}

impl FetchDescriptor {
    pub fn is_bundled(&self) -> bool {
        matches!(self, Self::Bundled)
    }

    pub fn remote(&self) -> Option<&RemoteLocation> {
        match self {
            Self::Remote(location) => Some(location),
            Self::Bundled => None,
        }
    }
}

impl fmt::Display for FetchDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bundled => f.write_str("default template"),
            Self::Remote(location) => write!(f, "{location}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_sentinel_are_default() {
        assert_eq!(TemplateReference::parse(None).unwrap(), TemplateReference::Default);
        assert_eq!(TemplateReference::parse(Some("  ")).unwrap(), TemplateReference::Default);
        assert_eq!(
            TemplateReference::parse(Some("default")).unwrap(),
            TemplateReference::Default
        );
    }

    #[test]
    fn bare_names_are_named() {
        assert_eq!(
            TemplateReference::parse(Some("with-docker")).unwrap(),
            TemplateReference::Named("with-docker".into())
        );
    }

    #[test]
    fn any_bare_name_is_left_to_the_registry() {
        for name in ["Blog", "With Spaces", ".hidden"] {
            assert_eq!(
                TemplateReference::parse(Some(name)).unwrap(),
                TemplateReference::Named(name.into())
            );
        }
    }

    #[test]
    fn urls_are_parsed() {
        let r = TemplateReference::parse(Some("https://github.com/owner/repo")).unwrap();
        assert!(matches!(r, TemplateReference::Url(_)));
    }

    #[test]
    fn malformed_or_non_http_urls_are_invalid() {
        assert!(TemplateReference::parse(Some("https://")).is_err());
        assert!(TemplateReference::parse(Some("ftp://github.com/a/b")).is_err());
    }

    #[test]
    fn repository_strips_git_suffix() {
        let repo = Repository::parse("owner/repo.git").unwrap();
        assert_eq!(repo.name(), "repo");
        assert_eq!(repo.to_string(), "owner/repo");
        assert!(Repository::parse("just-owner").is_err());
    }

    #[test]
    fn location_display() {
        let loc = RemoteLocation {
            repository: Repository::parse("o/r").unwrap(),
            git_ref: Some("main".into()),
            subpath: Some(RelativePath::try_new("apps/web").unwrap()),
            example: None,
        };
        assert_eq!(loc.to_string(), "o/r@main:apps/web");
    }
}
