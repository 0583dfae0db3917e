//! Scaffold Service - main application orchestrator.
//!
//! Coordinates the whole creation workflow:
//! 1. Validate the project name
//! 2. Resolve the template reference
//! 3. Inspect the destination (fails fast on conflicts, touches nothing)
//! 4. Fetch the template
//! 5. Validate the destination, creating it if absent
//! 6. Materialize the staged tree
//! 7. Select the package manager for the install hand-off

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::{
    application::{
        ports::{BundledTemplateSource, FallbackConfirmation, Filesystem, RemoteTemplateSource},
        services::{
            fetcher::TemplateFetcher,
            materializer::{MaterializeReport, ProjectMaterializer},
            target_validator::{PermissionModel, TargetValidator},
        },
    },
    domain::{
        AmbientSnapshot, DestinationState, ExampleEntry, FetchDescriptor,
        ManifestVariant, PackageManager, PackageManagerSelector, Selection, SourceResolver,
        TemplateReference, TreeOrigin, project_name_from_path, validate_package_name,
    },
    error::SprigResult,
};

/// Everything needed to create one project.
#[derive(Debug, Clone)]
pub struct ScaffoldRequest {
    pub reference: TemplateReference,
    pub explicit_subpath: Option<String>,
    pub destination: PathBuf,
    /// Defaults to the destination's final path component.
    pub project_name: Option<String>,
    pub variant: ManifestVariant,
    pub package_manager: Option<PackageManager>,
}

impl ScaffoldRequest {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            reference: TemplateReference::Default,
            explicit_subpath: None,
            destination: destination.into(),
            project_name: None,
            variant: ManifestVariant::default(),
            package_manager: None,
        }
    }

    pub fn reference(mut self, reference: TemplateReference) -> Self {
        self.reference = reference;
        self
    }

    pub fn subpath(mut self, subpath: impl Into<String>) -> Self {
        self.explicit_subpath = Some(subpath.into());
        self
    }

    pub fn variant(mut self, variant: ManifestVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn package_manager(mut self, manager: Option<PackageManager>) -> Self {
        self.package_manager = manager;
        self
    }

    fn resolved_name(&self) -> SprigResult<String> {
        let name = self
            .project_name
            .clone()
            .or_else(|| project_name_from_path(&self.destination))
            .unwrap_or_default();
        validate_package_name(&name)?;
        Ok(name)
    }
}

/// What a dry run would do.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaffoldPlan {
    pub project_name: String,
    pub descriptor: FetchDescriptor,
    pub destination: DestinationState,
}

/// Result of a completed scaffold.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaffoldOutcome {
    pub project_name: String,
    pub destination: PathBuf,
    pub descriptor: FetchDescriptor,
    /// The remote template was replaced by the bundled one.
    pub used_fallback: bool,
    pub report: MaterializeReport,
    pub package_manager: Selection,
}

/// Main scaffolding service.
pub struct ScaffoldService {
    filesystem: Arc<dyn Filesystem>,
    resolver: SourceResolver,
    fetcher: TemplateFetcher,
    validator: TargetValidator,
    materializer: ProjectMaterializer,
}

impl ScaffoldService {
    /// Create a new scaffold service with the given adapters.
    pub fn new(
        resolver: SourceResolver,
        filesystem: Arc<dyn Filesystem>,
        remote: Box<dyn RemoteTemplateSource>,
        bundled: Box<dyn BundledTemplateSource>,
    ) -> Self {
        Self {
            validator: TargetValidator::new(filesystem.clone(), PermissionModel::native()),
            materializer: ProjectMaterializer::new(filesystem.clone()),
            fetcher: TemplateFetcher::new(remote, bundled),
            filesystem,
            resolver,
        }
    }

    /// Replace the platform's default permission model.
    pub fn with_permission_model(mut self, model: PermissionModel) -> Self {
        self.validator = TargetValidator::new(self.filesystem.clone(), model);
        self
    }

    pub fn examples(&self) -> &'static [ExampleEntry] {
        self.resolver.registry().entries()
    }

    /// Resolve and inspect without writing or downloading anything.
    #[instrument(skip_all, fields(reference = %request.reference))]
    pub fn plan(&self, request: &ScaffoldRequest) -> SprigResult<ScaffoldPlan> {
        let project_name = request.resolved_name()?;
        let descriptor = self
            .resolver
            .resolve(&request.reference, request.explicit_subpath.as_deref())?;
        let destination = self.validator.inspect(&request.destination)?;

        Ok(ScaffoldPlan {
            project_name,
            descriptor,
            destination,
        })
    }

    /// Create a project.
    #[instrument(
        skip_all,
        fields(
            reference = %request.reference,
            destination = %request.destination.display(),
        )
    )]
    pub fn scaffold(
        &self,
        request: &ScaffoldRequest,
        confirm: &dyn FallbackConfirmation,
        ambient: &AmbientSnapshot,
    ) -> SprigResult<ScaffoldOutcome> {
        let plan = self.plan(request)?;
        info!(project = %plan.project_name, descriptor = %plan.descriptor, "scaffolding");

        let tree = self.fetcher.fetch(&plan.descriptor, confirm)?;
        let used_fallback = !plan.descriptor.is_bundled() && tree.origin() == &TreeOrigin::Bundled;

        let state = self.validator.validate(&request.destination)?;
        let report = self.materializer.materialize(
            tree,
            &state.path,
            request.variant,
            &plan.project_name,
        )?;

        let package_manager = PackageManagerSelector::select_from(request.package_manager, ambient);
        info!(
            manager = %package_manager.manager,
            reason = %package_manager.reason,
            "package manager selected"
        );

        Ok(ScaffoldOutcome {
            project_name: plan.project_name,
            destination: state.path,
            descriptor: plan.descriptor,
            used_fallback,
            report,
            package_manager,
        })
    }
}
