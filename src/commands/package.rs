//! Package command implementation
//!
//! Runs the full pipeline: stage, validate the rendered configuration, hand off to the
//! assembler.

use console::Style;

use crate::assembler::HandoffAssembler;
use crate::cli::PackageArgs;
use crate::error::Result;
use crate::pipeline::{PackageOutcome, Pipeline};
use crate::report::{Reporter, TracingReporter};
use crate::staging::ownership::effective_uid;

/// Run package command
pub fn run(args: PackageArgs) -> Result<()> {
    let config = super::load_config(&args.config)?;
    let reporter = TracingReporter::new(config.package_name());
    if args.staging.chown && effective_uid() != 0 {
        reporter.warn("--chown without root privileges; applying ownership is likely to fail");
    }

    let pipeline = Pipeline::new(super::pipeline_options(&args.staging, args.no_validate));
    let outcome = pipeline.run(&config, &HandoffAssembler, &reporter)?;

    print_summary(&config.package_name(), &config.project.version, &outcome);
    Ok(())
}

fn print_summary(name: &str, version: &str, outcome: &PackageOutcome) {
    println!(
        "{} {} {}",
        Style::new().bold().green().apply_to("Packaged"),
        Style::new().bold().apply_to(name),
        version
    );
    println!(
        "  {} {} ({} files)",
        Style::new().bold().apply_to("Staged:    "),
        outcome.staged.root.display(),
        outcome.staged.entries.len()
    );
    println!(
        "  {} {}",
        Style::new().bold().apply_to("Validation:"),
        outcome.validation
    );
    println!(
        "  {} {}",
        Style::new().bold().apply_to("Handoff:   "),
        outcome.output.display()
    );
}
