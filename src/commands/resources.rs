//! Resources command implementation
//!
//! Prints the resolved resource list without touching the filesystem beyond checking
//! that sources exist.

use console::Style;

use crate::cli::ResourcesArgs;
use crate::error::Result;
use crate::resource::{ResourceList, build_resource_list};

/// Run resources command
pub fn run(args: ResourcesArgs) -> Result<()> {
    let config = super::load_config(&args.config)?;
    let resources = build_resource_list(&config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&resources)?);
    } else {
        print_list(&resources);
    }
    Ok(())
}

fn print_list(resources: &ResourceList) {
    println!("Resources ({}):", resources.len());
    println!();
    for resource in resources {
        println!(
            "  {}",
            Style::new().bold().yellow().apply_to(&resource.destination)
        );
        println!(
            "    {} {}",
            Style::new().bold().apply_to("Source:"),
            resource.label()
        );
        println!(
            "    {} {}:{} {}{}",
            Style::new().bold().apply_to("Install:"),
            resource.owner,
            resource.group,
            resource.mode,
            if resource.template { " (template)" } else { "" }
        );
    }
}
