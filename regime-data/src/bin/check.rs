use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use regime_data::SlabTableLoader;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Validate a slab table CSV file and print the tables it defines.
///
/// The CSV file should have the following columns:
/// - table: The table name (e.g., current, proposed, surcharge)
/// - upper_bound: The bracket's upper bound (empty for open-ended)
/// - rate: The rate as a decimal (e.g., 0.05)
#[derive(Parser, Debug)]
#[command(name = "slab-table-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing slab table data
    #[arg(short, long)]
    file: PathBuf,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    info!("Loading slab tables from: {}", args.file.display());

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let tables = SlabTableLoader::load(file)
        .with_context(|| format!("Invalid slab table CSV: {}", args.file.display()))?;

    info!("Validated {} tables", tables.len());

    for (name, table) in &tables {
        println!("{name}");
        let mut lower = rust_decimal::Decimal::ZERO;
        for slab in table.slabs() {
            let upper = slab
                .upper_bound
                .map_or_else(|| "∞".to_string(), |b| b.to_string());
            println!("  {lower:>12} - {upper:<12} {}", slab.rate);
            if let Some(bound) = slab.upper_bound {
                lower = bound;
            }
        }
    }

    Ok(())
}
