//! Command implementations for the svcdeb CLI

pub mod completions;
pub mod package;
pub mod resources;
pub mod stage;
pub mod validate;
pub mod version;

use crate::cli::{ConfigArgs, StagingArgs};
use crate::config::PackageConfig;
use crate::error::Result;
use crate::pipeline::PipelineOptions;
use crate::staging::OwnershipMode;

/// Load the package configuration named on the command line
fn load_config(args: &ConfigArgs) -> Result<PackageConfig> {
    PackageConfig::load(&args.config)
}

/// Pipeline options from shared staging flags
fn pipeline_options(staging: &StagingArgs, skip_validation: bool) -> PipelineOptions {
    PipelineOptions {
        skip_validation,
        ownership: if staging.chown {
            OwnershipMode::Apply
        } else {
            OwnershipMode::Record
        },
        work_dir: staging.work_dir.clone(),
    }
}
