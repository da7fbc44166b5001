//! medifuse — assess a patient bundle from the command line.
//!
//! Reads a JSON `PatientBundle`, prints the fused assessment or anomaly
//! report as JSON on stdout. Logs go to stderr.

mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{run, Cli};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("medifuse=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = run(&cli)?;
    println!("{output}");
    Ok(())
}
