//! Turns what the user typed into something the fetcher can act on.

use tracing::debug;
use url::Url;

use crate::domain::{
    entities::{
        common::RelativePath,
        reference::{FetchDescriptor, RemoteLocation, Repository, TemplateReference},
    },
    error::DomainError,
    registry::ExampleRegistry,
};

const SUPPORTED_HOSTS: &[&str] = &["github.com", "www.github.com"];

/// Pure mapping from [`TemplateReference`] to [`FetchDescriptor`].
#[derive(Debug, Clone, Default)]
pub struct SourceResolver {
    registry: ExampleRegistry,
}

impl SourceResolver {
    pub fn new(registry: ExampleRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ExampleRegistry {
        &self.registry
    }

    /// Resolve a reference.
    ///
    /// `explicit_subpath` wins over any subpath embedded in a URL. An empty
    /// override (or `/`) selects the repository root.
    pub fn resolve(
        &self,
        reference: &TemplateReference,
        explicit_subpath: Option<&str>,
    ) -> Result<FetchDescriptor, DomainError> {
        match reference {
            TemplateReference::Default => {
                if explicit_subpath.is_some() {
                    debug!("subpath override ignored for the default template");
                }
                Ok(FetchDescriptor::Bundled)
            }
            TemplateReference::Named(name) => {
                if explicit_subpath.is_some() {
                    debug!(example = %name, "subpath override ignored for named example");
                }
                self.registry
                    .lookup(name)
                    .map(FetchDescriptor::Remote)
                    .ok_or_else(|| DomainError::UnknownExample { name: name.clone() })
            }
            TemplateReference::Url(url) => {
                resolve_url(url, explicit_subpath).map(FetchDescriptor::Remote)
            }
        }
    }
}

fn resolve_url(url: &Url, explicit_subpath: Option<&str>) -> Result<RemoteLocation, DomainError> {
    let host = url.host_str().unwrap_or_default();
    if !SUPPORTED_HOSTS.contains(&host) {
        return Err(DomainError::UnsupportedHost { host: host.into() });
    }

    let invalid = |reason: &str| DomainError::InvalidReference {
        reference: url.to_string(),
        reason: reason.into(),
    };

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let [owner, name, rest @ ..] = segments.as_slice() else {
        return Err(invalid("expected a repository URL such as https://github.com/owner/repo"));
    };
    let repository = Repository::new(*owner, *name)?;

    let override_path = explicit_subpath.map(parse_override).transpose()?;

    let (git_ref, url_subpath) = match rest {
        [] => (None, None),
        ["tree", tail @ ..] if !tail.is_empty() => {
            split_ref_and_path(tail, override_path.as_ref().and_then(|o| o.as_ref()))
        }
        ["tree"] => return Err(invalid("missing branch after /tree/")),
        _ => return Err(invalid("only /tree/<branch>/<path> URLs are supported")),
    };

    let subpath = match override_path {
        Some(explicit) => explicit,
        None => url_subpath
            .map(RelativePath::try_new)
            .transpose()
            .map_err(|e| invalid(&e.to_string()))?,
    };

    Ok(RemoteLocation {
        repository,
        git_ref,
        subpath,
        example: None,
    })
}

/// `Some(None)` is an explicit request for the repository root.
fn parse_override(raw: &str) -> Result<Option<RelativePath>, DomainError> {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Ok(None);
    }
    RelativePath::try_new(trimmed)
        .map(Some)
        .map_err(|e| DomainError::InvalidReference {
            reference: raw.into(),
            reason: e.to_string(),
        })
}

/// Split the segments after `/tree/` into a ref and a subpath.
///
/// Branch names may contain `/`. When the override path matches the end of
/// the URL, everything before it is the ref; otherwise the first segment is.
fn split_ref_and_path(
    tail: &[&str],
    override_path: Option<&RelativePath>,
) -> (Option<String>, Option<String>) {
    if let Some(explicit) = override_path {
        let wanted: Vec<&str> = explicit.as_str().split('/').collect();
        if tail.len() > wanted.len() && tail.ends_with(&wanted) {
            let git_ref = tail[..tail.len() - wanted.len()].join("/");
            return (Some(git_ref), Some(explicit.to_string()));
        }
    }

    let (git_ref, path) = tail.split_at(1);
    let path = (!path.is_empty()).then(|| path.join("/"));
    (Some(git_ref[0].to_string()), path)
}
