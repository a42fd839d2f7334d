//! Report pipeline: cached downloads in, phase-comparative tables out.

use anyhow::Context;
use log::{info, warn};
use std::collections::BTreeSet;
use std::path::Path;
use wse_data::aggregate::{aggregate_season_totals, merge_with_phases, season_year_range};
use wse_data::stats::{phase_deviation, phase_month_profile};
use wse_oni::oni::parse_oni_text;
use wse_oni::phase::classify_seasons;
use wse_snotel::observation::Observation;
use wse_snotel::snowfall::derive_snowfall;

/// Output table file names, consumed by the chart apps.
pub const SEASON_TOTALS_CSV: &str = "season_totals.csv";
pub const PHASE_MONTH_PROFILE_CSV: &str = "phase_month_profile.csv";
pub const PHASE_DEVIATION_CSV: &str = "phase_deviation.csv";

/// Run the full pipeline over the cached snow CSV and ONI text and write
/// the three report tables into `out_dir`.
///
/// Partial history is tolerated: season-years present on only one side of
/// the snow/phase join are dropped and counted, and stations without a
/// Neutral baseline are omitted from the deviation table and listed. Both
/// omissions are reported in the log, never silently zero-filled.
pub fn run_report(snow_csv: &str, oni_text: &str, out_dir: &str) -> anyhow::Result<()> {
    let snow_body = std::fs::read_to_string(snow_csv)
        .with_context(|| format!("Failed to read {snow_csv}"))?;
    let observations = Observation::parse_cache_csv(&snow_body)
        .with_context(|| format!("Failed to parse snow observations from {snow_csv}"))?;

    let oni_body = std::fs::read_to_string(oni_text)
        .with_context(|| format!("Failed to read {oni_text}"))?;
    let readings = parse_oni_text(&oni_body)
        .with_context(|| format!("Failed to parse ONI index from {oni_text}"))?;

    info!(
        "Loaded {} depth observations and {} index readings",
        observations.len(),
        readings.len()
    );

    let snowfall = derive_snowfall(&observations);
    let totals = aggregate_season_totals(&snowfall);
    let phases = classify_seasons(&readings);
    let merged = merge_with_phases(&totals, &phases);

    match season_year_range(&totals) {
        Some((min, max)) => info!("Observed snow seasons {min}-{max}"),
        None => warn!("No season totals were derived"),
    }
    info!("Classified {} snow seasons", phases.len());

    let unjoined: BTreeSet<i32> = totals
        .iter()
        .map(|t| t.season_year)
        .filter(|year| !phases.contains_key(year))
        .collect();
    if !unjoined.is_empty() {
        warn!(
            "{} season-years with snowfall but no phase classification dropped from the join: {:?}",
            unjoined.len(),
            unjoined
        );
    }

    let profile = phase_month_profile(&merged);
    let deviation = phase_deviation(&merged);

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {out_dir}"))?;
    write_table(out_dir, SEASON_TOTALS_CSV, &totals)?;
    write_table(out_dir, PHASE_MONTH_PROFILE_CSV, &profile)?;
    write_table(out_dir, PHASE_DEVIATION_CSV, &deviation.rows)?;

    info!(
        "Report complete: {} season totals, {} profile rows, {} deviation rows, {} stations without a Neutral baseline",
        totals.len(),
        profile.len(),
        deviation.rows.len(),
        deviation.skipped_stations.len()
    );
    Ok(())
}

fn write_table<T: serde::Serialize>(
    out_dir: &str,
    file_name: &str,
    rows: &[T],
) -> anyhow::Result<()> {
    let path = Path::new(out_dir).join(file_name);
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}
