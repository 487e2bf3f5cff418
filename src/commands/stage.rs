//! Stage command implementation

use console::Style;

use crate::cli::StageArgs;
use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::report::TracingReporter;
use crate::staging::StagedTree;

/// Run stage command
pub fn run(args: StageArgs) -> Result<()> {
    let config = super::load_config(&args.config)?;
    let reporter = TracingReporter::new(config.package_name());
    let pipeline = Pipeline::new(super::pipeline_options(&args.staging, true));
    let (_, staged) = pipeline.stage(&config, &reporter)?;

    print_tree(&staged);
    Ok(())
}

fn print_tree(staged: &StagedTree) {
    println!(
        "{} {}",
        Style::new().bold().green().apply_to("Staged"),
        staged.root.display()
    );
    println!();
    for entry in &staged.entries {
        let kind = if entry.template { "rendered" } else { "copied" };
        println!(
            "  {} {:>17} {}  {}",
            entry.mode,
            format!("{}:{}", entry.owner, entry.group),
            Style::new().cyan().apply_to(&entry.destination),
            Style::new().dim().apply_to(kind)
        );
    }
}
