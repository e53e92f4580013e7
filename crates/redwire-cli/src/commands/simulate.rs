//! Simulate command implementation.

use anyhow::{Context, Result};
use console::style;
use redwire_compile::{Trim, bits};
use redwire_sim::{Simulator, TriState};

use super::common::{Session, parse_bits};
use crate::config::Config;

/// Execute the simulate command.
pub fn execute(
    config: &Config,
    input: &str,
    inputs: &str,
    no_trim: bool,
    probes: &[String],
) -> Result<()> {
    let values = parse_bits(inputs)?;
    let mut session = Session::new(config)?;
    let mut debug = session.compile_file(input)?;
    if !no_trim {
        debug = debug
            .trim_with(&config.trim)
            .context("Failed to trim circuit")?
            .circuit;
    }

    let circuit = debug.circuit();
    let simulation = Simulator::new(circuit.circuit())
        .run(&values)
        .context("Simulation failed")?;
    let outputs = simulation.outputs()?;

    println!(
        "{} {} -> {}",
        style("✓").green().bold(),
        style(bits(&values)).cyan(),
        style(bits(&outputs)).yellow()
    );

    let mut offset = 0;
    for group in circuit.output_groups() {
        let slice = &outputs[offset..offset + group.width];
        println!("  {}: {}", style(&group.name).green(), bits(slice));
        offset += group.width;
    }

    for name in probes {
        let states = simulation
            .probe(&debug, name)
            .with_context(|| format!("No instance named '{name}'"))?;
        let rendered: String = states.iter().map(TriState::to_string).collect();
        println!("  {} {}: {}", style("probe").dim(), style(name).cyan(), rendered);
    }
    Ok(())
}
