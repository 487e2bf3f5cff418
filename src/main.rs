//! svcdeb - Debian service bundle stager
//!
//! Command line entry point: parses arguments, installs the log subscriber and reports
//! the terminal error, if any, as a diagnostic.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use svcdeb::cli::{Cli, Commands, LogFormat};
use svcdeb::commands;

/// Install the process-wide tracing subscriber writing to stderr
///
/// `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool, format: LogFormat) {
    let default_level = if verbose { "svcdeb=debug" } else { "svcdeb=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_format);

    let result = match cli.command {
        Commands::Package(args) => commands::package::run(args),
        Commands::Stage(args) => commands::stage::run(args),
        Commands::Validate(args) => commands::validate::run(args),
        Commands::Resources(args) => commands::resources::run(args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("{:?}", miette::Report::new(e));
        std::process::exit(1);
    }
}
