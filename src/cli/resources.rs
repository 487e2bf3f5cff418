use clap::Parser;

use super::ConfigArgs;

/// Arguments for the resources command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List the files a package would install:\n    svcdeb resources\n\n\
                  Machine-readable output:\n    svcdeb resources --json")]
pub struct ResourcesArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Print the list as JSON
    #[arg(long)]
    pub json: bool,
}
