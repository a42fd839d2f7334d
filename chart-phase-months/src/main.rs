//! Average Monthly Snowfall by ENSO Phase
//!
//! Builds the data/config JSON payload pair for the phase/month profile
//! chart: one grouped-bar series per ENSO phase, months Nov through Apr on
//! the x-axis, one panel per station.
//!
//! Data flow:
//! 1. `wse-cli report` writes `phase_month_profile.csv` and
//!    `season_totals.csv` into the report directory.
//! 2. This app reads both, carries the observed season range into the
//!    title and the source citation into the caption, and writes
//!    `phase_months_data.json` / `phase_months_config.json` for the
//!    D3.js renderer.

use anyhow::Context;
use clap::Parser;
use log::info;
use std::path::Path;
use wse_data::aggregate::{season_year_range, SeasonMonth, SeasonSnowTotal};
use wse_data::stats::PhaseMonthProfile;
use wse_data::DATA_CITATION;
use wse_oni::phase::SeasonPhase;

#[derive(Parser)]
#[command(
    name = "chart-phase-months",
    version,
    about = "Build the phase/month profile chart payload"
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

    let profile_path = Path::new(&cli.report_dir).join("phase_month_profile.csv");
    let mut profile_reader = csv::Reader::from_path(&profile_path)
        .with_context(|| format!("Failed to open {}", profile_path.display()))?;
    let profile: Vec<PhaseMonthProfile> = profile_reader
        .deserialize()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to parse {}", profile_path.display()))?;

    let totals_path = Path::new(&cli.report_dir).join("season_totals.csv");
    let mut totals_reader = csv::Reader::from_path(&totals_path)
        .with_context(|| format!("Failed to open {}", totals_path.display()))?;
    let totals: Vec<SeasonSnowTotal> = totals_reader
        .deserialize()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to parse {}", totals_path.display()))?;

    let (min_year, max_year) =
        season_year_range(&totals).context("Season totals table is empty")?;

    let data: Vec<serde_json::Value> = profile
        .iter()
        .map(|row| {
            serde_json::json!({
                "station_id": row.station_id,
                "month": row.month.label(),
                "phase": row.phase.label(),
                "color": row.phase.color(),
                "avg_snowfall": row.avg_snowfall,
            })
        })
        .collect();

    let config = serde_json::json!({
        "title": format!(
            "Average Monthly Snowfall by ENSO Phase, Seasons {}-{}",
            min_year, max_year
        ),
        "caption": DATA_CITATION,
        "yAxisLabel": "Average snowfall (inches)",
        "monthOrder": SeasonMonth::ALL.iter().map(|m| m.label()).collect::<Vec<_>>(),
        "phases": SeasonPhase::ALL.iter().map(|p| serde_json::json!({
            "label": p.label(),
            "color": p.color(),
        })).collect::<Vec<_>>(),
    });

    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("Failed to create {}", cli.out_dir))?;
    let data_path = Path::new(&cli.out_dir).join("phase_months_data.json");
    std::fs::write(&data_path, serde_json::to_string(&data)?)?;
    let config_path = Path::new(&cli.out_dir).join("phase_months_config.json");
    std::fs::write(&config_path, serde_json::to_string(&config)?)?;

    info!(
        "Wrote {} profile rows to {} and config to {}",
        data.len(),
        data_path.display(),
        config_path.display()
    );
    Ok(())
}
