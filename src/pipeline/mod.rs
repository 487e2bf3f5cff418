//! Packaging pipeline
//!
//! One run, in order: parameter context, resource list, staging, optional validation of
//! the rendered configuration, assembly. Configuration problems surface before anything
//! is written; a validation failure stops the run before the assembler is called.

use std::path::PathBuf;
use std::sync::Arc;

use crate::assembler::{AssemblyRequest, BundleAssembler};
use crate::config::PackageConfig;
use crate::error::Result;
use crate::introspect::{ArtifactOpener, NativeLoader, RUNTIME_DEPENDENCY};
use crate::params::ParameterContext;
use crate::report::Reporter;
use crate::resource::{ResourceList, build_resource_list};
use crate::staging::{Manifest, OwnershipMode, StagedTree, StagingOptions, extract};
use crate::validation::{SkipReason, ValidationOutcome, check_artifact_with};

/// Per-invocation overrides of the package configuration
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Skip validation regardless of the configuration
    pub skip_validation: bool,

    pub ownership: OwnershipMode,

    /// Stage here instead of `<build_dir>/svcdeb-package`
    pub work_dir: Option<PathBuf>,
}

/// What a completed run produced
#[derive(Debug, Clone)]
pub struct PackageOutcome {
    pub staged: StagedTree,
    pub validation: ValidationOutcome,
    /// Path returned by the assembler
    pub output: PathBuf,
}

/// Runs the packaging steps for one configuration
#[derive(Debug, Clone)]
pub struct Pipeline {
    options: PipelineOptions,
    opener: Arc<dyn ArtifactOpener>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineOptions::default())
    }
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            options,
            opener: Arc::new(NativeLoader),
        }
    }

    /// Open artifacts through `opener` instead of the dynamic loader
    pub fn with_opener(mut self, opener: Arc<dyn ArtifactOpener>) -> Self {
        self.opener = opener;
        self
    }

    /// Full run: stage, validate, assemble
    pub fn run(
        &self,
        config: &PackageConfig,
        assembler: &dyn BundleAssembler,
        reporter: &dyn Reporter,
    ) -> Result<PackageOutcome> {
        let (resources, staged) = self.stage(config, reporter)?;
        let validation = self.validate(config, &staged, reporter)?.into_result()?;

        let request = AssemblyRequest {
            resources: &resources,
            staged: &staged,
            package: config.deb_metadata()?,
            output: config.output_file()?,
            signing: config.signing.clone(),
        };
        let output = assembler.assemble(&request)?;
        reporter.info(&format!("Bundle handed off at {}", output.display()));

        Ok(PackageOutcome {
            staged,
            validation,
            output,
        })
    }

    /// Build the context and resource list, then stage them
    pub fn stage(
        &self,
        config: &PackageConfig,
        reporter: &dyn Reporter,
    ) -> Result<(ResourceList, StagedTree)> {
        let context = ParameterContext::from_config(config)?;
        let resources = build_resource_list(config)?;
        let work_dir = self
            .options
            .work_dir
            .clone()
            .unwrap_or_else(|| config.work_dir());
        let options = StagingOptions {
            ownership: self.options.ownership,
        };
        let staged = extract(&resources, &work_dir, &context, &options, reporter)?;
        Manifest::load(&staged.root)?.verify(&staged.payload_root)?;
        reporter.debug("Staged tree matches its manifest");
        Ok((resources, staged))
    }

    /// Validate the staged configuration file, or say why not
    fn validate(
        &self,
        config: &PackageConfig,
        staged: &StagedTree,
        reporter: &dyn Reporter,
    ) -> Result<ValidationOutcome> {
        if self.options.skip_validation || !config.validate {
            reporter.info("Configuration validation disabled");
            return Ok(ValidationOutcome::Skipped(SkipReason::Disabled));
        }
        let Some(dependency) = config.project.dependency(RUNTIME_DEPENDENCY) else {
            reporter.warn(&format!(
                "Failed to find {RUNTIME_DEPENDENCY} dependency in project. Skipping configuration validation."
            ));
            return Ok(ValidationOutcome::Skipped(SkipReason::NotDeclared));
        };
        reporter.info(&format!(
            "Detected {RUNTIME_DEPENDENCY} {}, attempting to validate configuration.",
            dependency.version.as_deref().unwrap_or("(unversioned)")
        ));

        let document = staged.payload_path(&config.layout().config_file);
        check_artifact_with(self.opener.as_ref(), &config.artifact, &document, reporter)
    }
}
