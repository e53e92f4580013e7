//! Redwire Command-Line Interface
//!
//! Batch front end: compile `.rw` sources to JSON circuits, simulate them on
//! an input vector, and list the available cells.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{cells, compile, simulate, version};
use config::Config;

/// Redwire - compile a line-oriented HDL into wire-level circuits
#[derive(Parser)]
#[command(name = "redwire")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML configuration file
    #[arg(long, global = true, env = "REDWIRE_CONFIG")]
    config: Option<PathBuf>,

    /// Extra library directory searched for `<cell>.rw` files
    #[arg(short = 'L', long = "library", global = true)]
    library: Vec<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a source file to a JSON circuit
    Compile {
        /// Input file (.rw)
        #[arg(short, long)]
        input: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Skip the trim optimizer
        #[arg(long)]
        no_trim: bool,

        /// Tolerate argument count and width mismatches
        #[arg(long)]
        lax: bool,

        /// Check the trimmed circuit against the flattened one
        #[arg(long)]
        verify: bool,
    },

    /// Compile a source file and evaluate it on one input vector
    Simulate {
        /// Input file (.rw)
        #[arg(short, long)]
        input: String,

        /// Input bits, first port first (e.g. 0110)
        #[arg(long = "inputs", default_value = "")]
        bits: String,

        /// Skip the trim optimizer
        #[arg(long)]
        no_trim: bool,

        /// Tolerate argument count and width mismatches
        #[arg(long)]
        lax: bool,

        /// Print the value of a named binding (repeatable)
        #[arg(short, long)]
        probe: Vec<String>,
    },

    /// List available cells
    Cells,

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = load_config(&cli).and_then(|mut config| match cli.command {
        Commands::Compile {
            input,
            output,
            no_trim,
            lax,
            verify,
        } => {
            config.strict &= !lax;
            compile::execute(&config, &input, output.as_deref(), no_trim, verify)
        }

        Commands::Simulate {
            input,
            bits,
            no_trim,
            lax,
            probe,
        } => {
            config.strict &= !lax;
            simulate::execute(&config, &input, &bits, no_trim, &probe)
        }

        Commands::Cells => cells::execute(&config),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    });

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

/// Load configuration and apply command-line overrides.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    config.library.extend(cli.library.iter().cloned());
    config.validate()?;
    Ok(config)
}
