//! Cells command implementation.

use anyhow::Result;
use console::style;

use super::common::{Session, library_cells};
use crate::config::Config;

/// List registered cells and library files.
pub fn execute(config: &Config) -> Result<()> {
    let session = Session::new(config)?;

    println!("{}", style("Standard cells:").bold());
    for (name, cell) in session.registry().iter() {
        let widths = |groups: &[redwire_ir::PortGroup]| {
            groups
                .iter()
                .map(|g| g.width.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!(
            "  {:<8} ({}) -> ({})  {} nodes",
            style(name).cyan(),
            widths(cell.input_groups()),
            widths(cell.output_groups()),
            cell.circuit().size()
        );
    }

    if !session.library().is_empty() {
        println!("\n{}", style("Library cells:").bold());
        for name in library_cells(session.library())? {
            let status = if session.registry().contains(&name) {
                style("(shadowed)").dim().to_string()
            } else {
                String::new()
            };
            println!("  {} {status}", style(name).cyan());
        }
    }
    Ok(())
}
