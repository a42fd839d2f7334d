//! Fetch implementations for the SNOTEL and ONI data sources.

use anyhow::Context;
use log::{info, warn};
use wse_oni::oni::parse_oni_text;
use wse_snotel::snow_station::SnowStation;

/// Fixed URL of the NOAA PSL ONI index text.
pub const ONI_URL: &str = "https://psl.noaa.gov/data/correlation/oni.data";

/// Run a full query of SNOTEL snow-depth data for the Washington catalog.
///
/// Fetches the daily snow depth (SNWD) period-of-record CSV for each
/// station and writes the combined cache in the format
/// `station_id,date(YYYYMMDD),depth` (no headers, blank depth for days a
/// station did not report).
///
/// A station whose fetch or parse fails is logged and skipped; the run
/// completes with whatever succeeded and reports the skipped count.
///
/// # SNOTEL report service
///
/// - Element SNWD: snow depth in inches, start-of-day value, daily duration
/// - URL pattern:
///   `https://wcc.sc.egov.usda.gov/reportGenerator/view_csv/customSingleStationReport/daily/{ID}:WA:SNTL%7Cid=%22%22%7Cname/POR_BEGIN,POR_END/SNWD::value`
///
/// The response carries `#`-prefixed comment lines, then a header row,
/// then `YYYY-MM-DD,depth` rows.
pub async fn run_snow_query(snow_csv: &str) -> anyhow::Result<()> {
    let stations = SnowStation::station_catalog()
        .map_err(|e| anyhow::anyhow!("Failed to parse station catalog: {}", e))?;

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(60))
        .build()?;

    info!("Querying {} snow stations", stations.len());

    let mut all_obs: Vec<String> = Vec::new();
    let mut skipped: Vec<String> = Vec::new();

    for station in &stations {
        info!(
            "Fetching snow depth for {} ({})",
            station.name, station.station_id
        );

        let url = format!(
            "https://wcc.sc.egov.usda.gov/reportGenerator/view_csv/customSingleStationReport/daily/{}:WA:SNTL%7Cid=%22%22%7Cname/POR_BEGIN,POR_END/SNWD::value",
            station.station_id
        );

        let response = match client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("Failed to fetch {}: {}", station.station_id, e);
                skipped.push(station.station_id.clone());
                continue;
            }
        };

        if !response.status().is_success() {
            warn!(
                "Bad response for {}: {}",
                station.station_id,
                response.status()
            );
            skipped.push(station.station_id.clone());
            continue;
        }

        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => {
                warn!("Failed to read body for {}: {}", station.station_id, e);
                skipped.push(station.station_id.clone());
                continue;
            }
        };

        let rows = parse_snotel_depth_csv(&station.station_id, &body);
        if rows.is_empty() {
            warn!("No observations in response for {}", station.station_id);
            skipped.push(station.station_id.clone());
            continue;
        }

        info!("  {} observations for {}", rows.len(), station.station_id);
        all_obs.extend(rows);

        // Be polite to the NRCS server
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
    }

    let output = all_obs.join("\n");
    std::fs::write(snow_csv, &output)
        .with_context(|| format!("Failed to write {snow_csv}"))?;

    info!(
        "Snow query complete. {} observations written to {}, {} stations skipped",
        all_obs.len(),
        snow_csv,
        skipped.len()
    );
    if !skipped.is_empty() {
        warn!("Skipped stations: {}", skipped.join(", "));
    }
    Ok(())
}

/// Parse one station's SNOTEL report CSV into combined-cache rows.
///
/// Comment lines start with `#`; the first remaining line is the header.
/// Depth fields may be blank, which is preserved as a blank (missing) in
/// the cache.
fn parse_snotel_depth_csv(station_id: &str, body: &str) -> Vec<String> {
    let mut rows = Vec::new();
    let mut header_seen = false;
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if !header_seen {
            header_seen = true;
            continue;
        }
        let mut fields = line.splitn(2, ',');
        let date_field = match fields.next() {
            Some(d) => d.trim(),
            None => continue,
        };
        let date = match wse_utils::dates::parse_date(date_field) {
            Ok(d) => d,
            Err(_) => continue,
        };
        let depth_field = fields.next().unwrap_or("").trim();
        rows.push(format!(
            "{},{},{}",
            station_id,
            date.format("%Y%m%d"),
            depth_field
        ));
    }
    rows
}

/// Fetch the raw ONI text from the fixed PSL URL and cache it verbatim.
///
/// The body is validated before writing: index text with zero parseable
/// data rows is a format failure for the whole source and propagates.
pub async fn run_oni_query(oni_text: &str) -> anyhow::Result<()> {
    info!("Fetching ONI index from {}", ONI_URL);
    let body = reqwest::get(ONI_URL)
        .await
        .context("Failed to fetch ONI index")?
        .text()
        .await
        .context("Failed to read ONI response body")?;

    let readings = parse_oni_text(&body).context("ONI response failed validation")?;
    info!("ONI fetch complete: {} monthly readings", readings.len());

    std::fs::write(oni_text, &body).with_context(|| format!("Failed to write {oni_text}"))?;
    Ok(())
}
