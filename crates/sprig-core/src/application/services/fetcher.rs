//! Template retrieval with one retry and an optional fallback.

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        error::RetrievalError,
        ports::{BundledTemplateSource, FallbackConfirmation, FallbackContext, RemoteTemplateSource},
    },
    domain::{FetchDescriptor, RemoteLocation, StagedTree},
    error::SprigResult,
};

/// First attempt plus one retry.
pub const MAX_ATTEMPTS: u32 = 2;

pub struct TemplateFetcher {
    remote: Box<dyn RemoteTemplateSource>,
    bundled: Box<dyn BundledTemplateSource>,
}

impl TemplateFetcher {
    pub fn new(
        remote: Box<dyn RemoteTemplateSource>,
        bundled: Box<dyn BundledTemplateSource>,
    ) -> Self {
        Self { remote, bundled }
    }

    /// Produce the staged tree for `descriptor`.
    ///
    /// A remote failure is retried once. If the retry fails with a
    /// not-found error, `confirm` decides whether the bundled template is
    /// used instead. The returned tree's origin tells the caller which one
    /// it got.
    #[instrument(skip_all, fields(descriptor = %descriptor))]
    pub fn fetch(
        &self,
        descriptor: &FetchDescriptor,
        confirm: &dyn FallbackConfirmation,
    ) -> SprigResult<StagedTree> {
        let location = match descriptor {
            FetchDescriptor::Bundled => {
                debug!("using bundled template");
                return self.bundled.default_tree();
            }
            FetchDescriptor::Remote(location) => location,
        };

        let mut attempts = 0;
        let error = loop {
            attempts += 1;
            match self.attempt(location) {
                Ok(tree) => {
                    info!(files = tree.file_count(), attempts, "template downloaded");
                    return Ok(tree);
                }
                Err(e) if attempts < MAX_ATTEMPTS => {
                    warn!(attempt = attempts, error = %e, "download failed, retrying");
                }
                Err(e) => break e,
            }
        };

        if error.is_not_found() {
            let context = FallbackContext {
                location: location.clone(),
                error: error.clone(),
                attempts,
            };
            if confirm.confirm(&context) {
                info!("falling back to the bundled template");
                return self.bundled.default_tree();
            }
        }

        Err(ApplicationError::FetchFailed {
            reference: location.to_string(),
            reason: error.to_string(),
            not_found: error.is_not_found(),
        }
        .into())
    }

    fn attempt(&self, location: &RemoteLocation) -> Result<StagedTree, RetrievalError> {
        let tree = self.remote.retrieve(location)?;
        if tree.is_empty() {
            return Err(RetrievalError::NotFound(format!("no files found at {location}")));
        }
        Ok(tree)
    }
}
