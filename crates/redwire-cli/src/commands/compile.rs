//! Compile command implementation.

use std::fs;

use anyhow::{Context, Result};
use console::style;
use redwire_compile::{Trim, TrimStats, verify_equivalence};
use redwire_ir::AnnotatedCircuit;

use super::common::Session;
use crate::config::Config;

/// Execute the compile command.
pub fn execute(
    config: &Config,
    input: &str,
    output: Option<&str>,
    no_trim: bool,
    verify: bool,
) -> Result<()> {
    eprintln!(
        "{} Compiling {}{}",
        style("→").cyan().bold(),
        style(input).green(),
        if config.strict { "" } else { " (lax)" }
    );

    let mut session = Session::new(config)?;
    let compiled = session.compile_file(input)?.into_circuit();
    eprintln!(
        "  Flattened: {} nodes, {} edges, {} -> {} bits",
        compiled.circuit().size(),
        compiled.circuit().edge_count(),
        compiled.total_input_width(),
        compiled.total_output_width()
    );

    let result = if no_trim {
        compiled
    } else {
        let trimmed = compiled
            .trim_with(&config.trim)
            .context("Failed to trim circuit")?;
        print_stats(&trimmed.stats);

        if verify {
            let vectors = verify_equivalence(compiled.circuit(), trimmed.circuit.circuit())
                .context("Trimmed circuit failed verification")?;
            eprintln!(
                "{} Verified on {} input vectors",
                style("✓").green().bold(),
                vectors
            );
        }
        trimmed.circuit
    };

    write_output(&result, output)?;
    eprintln!("{} Compilation complete", style("✓").green().bold());
    Ok(())
}

/// Print trim statistics.
pub fn print_stats(stats: &TrimStats) {
    eprintln!(
        "  Trimmed: {} -> {} nodes, {} -> {} edges",
        stats.nodes_before,
        style(stats.nodes_after).yellow(),
        stats.edges_before,
        style(stats.edges_after).yellow()
    );
    eprintln!(
        "  Pruned {}, folded {}, forwarded {}",
        stats.pruned, stats.folded, stats.forwarded
    );
}

/// Write the circuit as JSON to `path`, or stdout.
fn write_output(circuit: &AnnotatedCircuit, path: Option<&str>) -> Result<()> {
    let json = serde_json::to_string_pretty(circuit).context("Failed to serialize circuit")?;
    match path {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write file: {path}"))?;
            eprintln!("  Output: {}", style(path).green());
        }
        None => println!("{json}"),
    }
    Ok(())
}
