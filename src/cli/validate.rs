use clap::Parser;
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Validate a rendered configuration:\n    \
                  svcdeb validate --artifact target/release/libhello.so --config /etc/hello/hello.yml")]
pub struct ValidateArgs {
    /// Service artifact (shared object) exporting the configuration type
    #[arg(long)]
    pub artifact: PathBuf,

    /// Configuration document to validate (YAML or JSON)
    #[arg(long)]
    pub config: PathBuf,
}
