//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - package: Package and stage command arguments (shared config and staging flags)
//! - validate: Validate command arguments
//! - resources: Resources command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand, ValueEnum};

pub mod completions;
pub mod package;
pub mod resources;
pub mod validate;

pub use completions::CompletionsArgs;
pub use package::{ConfigArgs, PackageArgs, StageArgs, StagingArgs};
pub use resources::ResourcesArgs;
pub use validate::ValidateArgs;

/// svcdeb - Debian service bundle stager
///
/// Stage a compiled service with its init scripts, units and configuration, and
/// validate the rendered configuration against the service before shipping.
#[derive(Parser, Debug)]
#[command(
    name = "svcdeb",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Stage Debian service bundles and validate their runtime configuration",
    long_about = "svcdeb renders a service's configuration template, init scripts and \
                  service-manager units into a staged payload tree, validates the rendered \
                  configuration against the configuration type the service artifact exports, \
                  and hands the tree to a bundle assembler.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  svcdeb package                               \x1b[90m# Stage, validate and hand off using ./svcdeb.yaml\x1b[0m\n   \
                  svcdeb package --no-validate                 \x1b[90m# Skip configuration validation\x1b[0m\n   \
                  svcdeb stage -c deploy/svcdeb.yaml           \x1b[90m# Stage only\x1b[0m\n   \
                  svcdeb resources --json                      \x1b[90m# Print the resolved resource list\x1b[0m\n   \
                  svcdeb validate --artifact lib.so --config app.yml \x1b[90m# Validate one document\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text, env = "SVCDEB_LOG_FORMAT")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Format of log lines written to stderr
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stage, validate and assemble a service bundle
    Package(PackageArgs),

    /// Stage the payload tree without validating or assembling
    Stage(StageArgs),

    /// Validate a configuration document against a service artifact
    Validate(ValidateArgs),

    /// Print the resolved resource list
    Resources(ResourcesArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
