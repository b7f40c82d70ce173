//! geotrack — well-log ingestion and trajectory interpolation CLI.
//!
//! # Usage
//!
//! ```bash
//! # Ingest well files (header + curve samples)
//! geotrack well logs/well_42.las logs/well_43.las
//!
//! # Ingest a trajectory file
//! geotrack welltrack surveys/tracks.txt
//!
//! # Ingest a thickness table
//! geotrack thickness --kind formation tables/formation.txt
//!
//! # Interpolate coordinates for every well (or one well)
//! geotrack interpolate
//! geotrack interpolate --well 42
//!
//! # List stored wells
//! geotrack wells
//! ```
//!
//! # Environment Variables
//!
//! - `GEOTRACK_CONFIG`: path to a TOML config file
//! - `RUST_LOG`: logging level (default: info)

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use geotrack::config::Config;
use geotrack::ingest::{ingest_thickness, ingest_well_file_batch, ingest_welltrack};
use geotrack::interpolation::{interpolate_all, interpolate_well};
use geotrack::storage::{SledStore, StorageGateway};
use geotrack::types::ThicknessKind;

#[derive(Parser)]
#[command(name = "geotrack")]
#[command(about = "Well-log ingestion and trajectory interpolation")]
#[command(version)]
struct Cli {
    /// Override the configured database directory.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest one or more well files (well header + curve samples).
    Well {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Ingest a welltrack trajectory file.
    Welltrack { file: PathBuf },
    /// Ingest a formation / effective-formation thickness table.
    Thickness {
        /// Which thickness variant the table holds.
        #[arg(long)]
        kind: ThicknessKind,
        file: PathBuf,
    },
    /// Interpolate curve sample coordinates along well trajectories.
    Interpolate {
        /// Interpolate a single well instead of all wells.
        #[arg(long)]
        well: Option<u64>,
    },
    /// List stored wells.
    Wells,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load();
    let db_path = cli.db.unwrap_or(config.db_path);
    let store = SledStore::open(&db_path)
        .with_context(|| format!("failed to open database at {}", db_path.display()))?;

    match cli.command {
        Command::Well { files } => {
            let mut failures = 0usize;
            let mut readable: Vec<(&PathBuf, String)> = Vec::with_capacity(files.len());
            for path in &files {
                match fs::read_to_string(path) {
                    Ok(text) => readable.push((path, text)),
                    Err(err) => {
                        failures += 1;
                        eprintln!("{}: failed to read: {err}", path.display());
                    }
                }
            }

            let texts: Vec<&str> = readable.iter().map(|(_, text)| text.as_str()).collect();
            for ((path, _), result) in readable
                .iter()
                .zip(ingest_well_file_batch(&store, &texts))
            {
                match result {
                    Ok(summary) => println!(
                        "{}: well {} ({}), {} curve samples saved, {} lines skipped",
                        path.display(),
                        summary.well_id,
                        summary.well_name,
                        summary.curves_saved,
                        summary.lines_skipped
                    ),
                    Err(err) => {
                        failures += 1;
                        eprintln!("{}: {err}", path.display());
                    }
                }
            }
            store.flush()?;
            if failures > 0 {
                bail!("{failures} of {} well file(s) failed", files.len());
            }
        }
        Command::Welltrack { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let summary = ingest_welltrack(&store, &text)?;
            store.flush()?;
            println!(
                "{} wells processed, {} trajectory rows saved, {} lines skipped",
                summary.wells_processed, summary.rows_saved, summary.lines_skipped
            );
        }
        Command::Thickness { kind, file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let summary = ingest_thickness(&store, kind, &text)?;
            store.flush()?;
            println!(
                "{} {} thickness rows saved across {} wells, {} lines skipped",
                summary.rows_saved, summary.kind, summary.wells_touched, summary.lines_skipped
            );
        }
        Command::Interpolate { well } => match well {
            Some(well_id) => {
                let saved = interpolate_well(&store, well_id)?;
                store.flush()?;
                println!("well {well_id}: {saved} interpolated points saved");
            }
            None => {
                let summary = interpolate_all(&store)?;
                store.flush()?;
                println!(
                    "{} wells interpolated, {} points saved",
                    summary.wells_processed, summary.points_saved
                );
                for failure in &summary.failures {
                    eprintln!("well {} skipped: {}", failure.well_id, failure.reason);
                }
            }
        },
        Command::Wells => {
            let wells = store.get_wells()?;
            if wells.is_empty() {
                println!("no wells stored");
            } else {
                println!("{:<8} {:<24} {:>12} {:>12}", "ID", "NAME", "START MD", "END MD");
                for well in wells {
                    let fmt_md = |md: Option<f64>| {
                        md.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"))
                    };
                    println!(
                        "{:<8} {:<24} {:>12} {:>12}",
                        well.id,
                        well.name,
                        fmt_md(well.start_measured_depth),
                        fmt_md(well.end_measured_depth)
                    );
                }
            }
        }
    }

    Ok(())
}
