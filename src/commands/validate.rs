//! Validate command implementation

use console::Style;

use crate::cli::ValidateArgs;
use crate::error::Result;
use crate::report::TracingReporter;
use crate::validation::{ValidationOutcome, check_artifact};

/// Run validate command
///
/// Succeeds when the document is valid or when the artifact does not use the runtime.
pub fn run(args: ValidateArgs) -> Result<()> {
    let label = args
        .artifact
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let reporter = TracingReporter::new(label);

    match check_artifact(&args.artifact, &args.config, &reporter)?.into_result()? {
        ValidationOutcome::Skipped(reason) => println!(
            "{} {}",
            Style::new().bold().yellow().apply_to("Skipped:"),
            reason
        ),
        _ => println!(
            "{} {}",
            Style::new().bold().green().apply_to("Valid:"),
            args.config.display()
        ),
    }
    Ok(())
}
