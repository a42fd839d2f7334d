//! Snowfall Deviation from Neutral Seasons
//!
//! Builds the data/config JSON payload pair for the percentage-deviation
//! chart: one bar per non-Neutral ENSO phase per station, showing how far
//! that phase's average snowfall sits above or below the station's
//! Neutral-season baseline.
//!
//! Data flow:
//! 1. `wse-cli report` writes `phase_deviation.csv` and
//!    `season_totals.csv` into the report directory. Stations without a
//!    Neutral baseline are already absent from the deviation table.
//! 2. This app reads both, carries the observed season range into the
//!    title and the source citation into the caption, and writes
//!    `phase_deviation_data.json` / `phase_deviation_config.json` for the
//!    D3.js renderer.

use anyhow::Context;
use clap::Parser;
use log::info;
use std::path::Path;
use wse_data::aggregate::{season_year_range, SeasonSnowTotal};
use wse_data::stats::PhaseComparison;
use wse_data::DATA_CITATION;
use wse_oni::phase::SeasonPhase;

#[derive(Parser)]
#[command(
    name = "chart-phase-deviation",
    version,
    about = "Build the percentage-deviation chart payload"
)]
struct Cli {
    /// Directory holding the report tables
    #[arg(short = 'd', long)]
    report_dir: String,

    /// Directory for the payload JSON files
    #[arg(short = 'o', long)]
    out_dir: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let deviation_path = Path::new(&cli.report_dir).join("phase_deviation.csv");
    let mut deviation_reader = csv::Reader::from_path(&deviation_path)
        .with_context(|| format!("Failed to open {}", deviation_path.display()))?;
    let deviation: Vec<PhaseComparison> = deviation_reader
        .deserialize()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to parse {}", deviation_path.display()))?;

    let totals_path = Path::new(&cli.report_dir).join("season_totals.csv");
    let mut totals_reader = csv::Reader::from_path(&totals_path)
        .with_context(|| format!("Failed to open {}", totals_path.display()))?;
    let totals: Vec<SeasonSnowTotal> = totals_reader
        .deserialize()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to parse {}", totals_path.display()))?;

    let (min_year, max_year) =
        season_year_range(&totals).context("Season totals table is empty")?;

    let data: Vec<serde_json::Value> = deviation
        .iter()
        .map(|row| {
            serde_json::json!({
                "station_id": row.station_id,
                "phase": row.phase.label(),
                "color": row.phase.color(),
                "phase_avg_snowfall": row.phase_avg_snowfall,
                "baseline_avg_snowfall": row.baseline_avg_snowfall,
                "pct_diff": row.pct_diff,
            })
        })
        .collect();

    let comparison_phases: Vec<serde_json::Value> = SeasonPhase::ALL
        .iter()
        .filter(|&&p| p != SeasonPhase::Neutral)
        .map(|p| {
            serde_json::json!({
                "label": p.label(),
                "color": p.color(),
            })
        })
        .collect();

    let config = serde_json::json!({
        "title": format!(
            "Snowfall Deviation from Neutral Seasons, {}-{}",
            min_year, max_year
        ),
        "caption": DATA_CITATION,
        "yAxisLabel": "Difference vs Neutral seasons (%)",
        "baseline": SeasonPhase::Neutral.label(),
        "phases": comparison_phases,
    });

    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("Failed to create {}", cli.out_dir))?;
    let data_path = Path::new(&cli.out_dir).join("phase_deviation_data.json");
    std::fs::write(&data_path, serde_json::to_string(&data)?)?;
    let config_path = Path::new(&cli.out_dir).join("phase_deviation_config.json");
    std::fs::write(&config_path, serde_json::to_string(&config)?)?;

    info!(
        "Wrote {} deviation rows to {} and config to {}",
        data.len(),
        data_path.display(),
        config_path.display()
    );
    Ok(())
}
