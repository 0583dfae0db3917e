//! Remote templates from GitHub.
//!
//! One retrieval is: resolve the default branch if the location has no ref,
//! download the repository tarball from codeload, then keep only the
//! entries under the requested subpath.

use std::io::Read;
use std::time::Duration;

use flate2::read::GzDecoder;
use reqwest::{StatusCode, blocking::Client};
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use sprig_core::{
    application::{RetrievalError, ports::RemoteTemplateSource},
    domain::{RelativePath, RemoteLocation, Repository, StagedFile, StagedTree, TreeOrigin},
    error::{SprigError, SprigResult},
};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_CODELOAD_BASE: &str = "https://codeload.github.com";

/// Connection settings, normally filled from configuration.
#[derive(Debug, Clone)]
pub struct GithubSettings {
    pub api_base: String,
    pub codeload_base: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for GithubSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.into(),
            codeload_base: DEFAULT_CODELOAD_BASE.into(),
            user_agent: concat!("sprig/", env!("CARGO_PKG_VERSION")).into(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RepoInfo {
    default_branch: String,
}

pub struct GithubArchiveSource {
    client: Client,
    api_base: Url,
    codeload_base: Url,
}

impl GithubArchiveSource {
    pub fn new(settings: GithubSettings) -> SprigResult<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent)
            .timeout(settings.timeout)
            .build()
            .map_err(|e| SprigError::Configuration {
                message: format!("could not build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_base: parse_base(&settings.api_base)?,
            codeload_base: parse_base(&settings.codeload_base)?,
        })
    }

    fn default_branch(&self, repository: &Repository) -> Result<String, RetrievalError> {
        let url = join(
            &self.api_base,
            &["repos", repository.owner(), repository.name()],
        )?;
        debug!(%url, "looking up default branch");

        let response = self
            .client
            .get(url.clone())
            .header("Accept", "application/vnd.github+json")
            .send()
            .map_err(network)?;
        check_status(response.status(), &url)?;

        let info: RepoInfo = response.json().map_err(|e| {
            RetrievalError::Corrupt(format!("unexpected response from {url}: {e}"))
        })?;
        Ok(info.default_branch)
    }

    fn download(&self, repository: &Repository, git_ref: &str) -> Result<Vec<u8>, RetrievalError> {
        let mut segments = vec![repository.owner(), repository.name(), "tar.gz"];
        segments.extend(git_ref.split('/'));
        let url = join(&self.codeload_base, &segments)?;
        debug!(%url, "downloading archive");

        let response = self.client.get(url.clone()).send().map_err(network)?;
        check_status(response.status(), &url)?;

        let bytes = response.bytes().map_err(network)?;
        Ok(bytes.to_vec())
    }
}

impl RemoteTemplateSource for GithubArchiveSource {
    #[instrument(skip(self), fields(location = %location))]
    fn retrieve(&self, location: &RemoteLocation) -> Result<StagedTree, RetrievalError> {
        let git_ref = match &location.git_ref {
            Some(git_ref) => git_ref.clone(),
            None => self.default_branch(&location.repository)?,
        };
        let archive = self.download(&location.repository, &git_ref)?;
        let origin = TreeOrigin::Remote(location.with_ref(git_ref));
        extract(&archive, location.subpath.as_ref(), origin)
    }
}

/// Unpack a gzipped tarball into a staged tree.
///
/// The archive's top-level directory is dropped, then only entries under
/// `subpath` are kept, relative to it. Anything other than regular files is
/// skipped; entries that would escape the root make the archive corrupt.
pub fn extract(
    archive: &[u8],
    subpath: Option<&RelativePath>,
    origin: TreeOrigin,
) -> Result<StagedTree, RetrievalError> {
    let mut tar = tar::Archive::new(GzDecoder::new(archive));
    let mut tree = StagedTree::new(origin);

    for entry in tar.entries().map_err(corrupt)? {
        let mut entry = entry.map_err(corrupt)?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let raw = entry.path().map_err(corrupt)?.to_string_lossy().into_owned();
        let Some((_, inner)) = raw.split_once('/') else {
            continue;
        };
        if inner.is_empty() {
            continue;
        }

        let path = RelativePath::try_new(inner).map_err(corrupt)?;
        let path = match subpath {
            Some(prefix) => match path.strip_prefix(prefix) {
                Some(rest) => rest,
                None => continue,
            },
            None => path,
        };

        let mode = entry.header().mode().unwrap_or(0o644);
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents).map_err(corrupt)?;

        tree.push(StagedFile::new(path, contents).executable(mode & 0o111 != 0))
            .map_err(corrupt)?;
    }

    if tree.is_empty() {
        let what = subpath.map_or_else(|| "the repository".to_string(), |p| format!("'{p}'"));
        return Err(RetrievalError::NotFound(format!("no files found in {what}")));
    }

    debug!(files = tree.file_count(), "archive extracted");
    Ok(tree)
}

fn parse_base(raw: &str) -> SprigResult<Url> {
    Url::parse(raw).map_err(|e| SprigError::Configuration {
        message: format!("invalid base URL '{raw}': {e}"),
    })
}

fn join(base: &Url, segments: &[&str]) -> Result<Url, RetrievalError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| RetrievalError::Network(format!("cannot build a URL from {base}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn check_status(status: StatusCode, url: &Url) -> Result<(), RetrievalError> {
    if status.is_success() {
        Ok(())
    } else if status == StatusCode::NOT_FOUND {
        Err(RetrievalError::NotFound(format!("{url} returned 404")))
    } else {
        Err(RetrievalError::Network(format!("HTTP {status} from {url}")))
    }
}

fn network(e: reqwest::Error) -> RetrievalError {
    RetrievalError::Network(e.to_string())
}

fn corrupt(e: impl std::fmt::Display) -> RetrievalError {
    RetrievalError::Corrupt(e.to_string())
}
