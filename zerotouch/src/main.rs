//! Command-line entry point: one provisioning pass over a CSV of expected
//! devices.

use std::path::PathBuf;

use clap::Parser;
use log::info;

use zerotouch::{BatchRunner, load_records_from_path};

/// First-time provisioning of network devices over their serial consoles.
#[derive(Debug, Parser)]
#[command(name = "zerotouch", version, about)]
struct Cli {
    /// CSV file listing the expected devices, one row per device.
    records: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // A schema error here is the only thing allowed to abort the run.
    let records = load_records_from_path(&cli.records)?;
    info!(
        "Loaded {} device records from {}",
        records.len(),
        cli.records.display()
    );

    let reports = BatchRunner::new().run(&records).await;

    let configured = reports.iter().filter(|r| r.is_configured()).count();
    info!(
        "Batch complete: {}/{} devices configured",
        configured,
        reports.len()
    );

    Ok(())
}
