//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - wire-level logic compiler",
        style("Redwire").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  redwire-ir       Circuit graphs and hierarchical builder");
    println!("  redwire-hdl      Description language and standard cells");
    println!("  redwire-sim      Tri-state simulator");
    println!("  redwire-compile  Trim optimizer");
    println!("  redwire-cli      Command-line interface");
    println!();
    println!("License: {}", style("Apache-2.0").dim());
}
