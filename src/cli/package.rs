use clap::{Args, Parser};
use std::path::PathBuf;

/// Location of the package configuration
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Package configuration file
    #[arg(long, short = 'c', default_value = "svcdeb.yaml", env = "SVCDEB_CONFIG")]
    pub config: PathBuf,
}

/// Flags that change how files are staged
#[derive(Args, Debug, Clone)]
pub struct StagingArgs {
    /// Apply owner and group to staged files (requires privileges)
    #[arg(long)]
    pub chown: bool,

    /// Stage into this directory instead of <build_dir>/svcdeb-package
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,
}

/// Arguments for the package command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Package using ./svcdeb.yaml:\n    svcdeb package\n\n\
                  Package without configuration validation:\n    svcdeb package --no-validate\n\n\
                  Stage with real ownership (as root):\n    sudo svcdeb package --chown")]
pub struct PackageArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub staging: StagingArgs,

    /// Skip validation of the rendered configuration
    #[arg(long)]
    pub no_validate: bool,
}

/// Arguments for the stage command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Stage using ./svcdeb.yaml:\n    svcdeb stage\n\n\
                  Stage into a scratch directory:\n    svcdeb stage --work-dir /tmp/hello-stage")]
pub struct StageArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub staging: StagingArgs,
}
