use crate::observation::{DepthReading, Observation};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Daily new snowfall derived from consecutive depth readings at one station.
///
/// The increment is a proxy for new snowfall, not a measurement: settling
/// and melt make the depth sensor noisy, so depth decreases are clamped to
/// zero rather than recorded as negative snowfall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySnowfall {
    pub station_id: String,
    pub date: NaiveDate,
    /// New snowfall in inches, always >= 0.
    pub increment: f64,
}

/// Derive daily snowfall increments from raw depth observations.
///
/// Observations are grouped by station and sorted by date within each
/// station; increments are never derived across stations. Missing readings
/// are skipped, and each station's first available reading produces no
/// output row (there is nothing to difference against).
///
/// Gaps in the date sequence are not interpolated: the increment is taken
/// against the immediately preceding available reading, which may span more
/// than 24 hours. A depth jump after a multi-day outage therefore registers
/// as a single-day event.
pub fn derive_snowfall(observations: &[Observation]) -> Vec<DailySnowfall> {
    let mut by_station: BTreeMap<&str, Vec<&Observation>> = BTreeMap::new();
    for obs in observations {
        by_station.entry(&obs.station_id).or_default().push(obs);
    }

    let mut snowfall = Vec::new();
    for (station_id, mut series) in by_station {
        series.sort_by_key(|obs| obs.date);
        let mut previous_depth: Option<f64> = None;
        for obs in series {
            let depth = match obs.value {
                DepthReading::Depth(d) => d,
                DepthReading::Missing => continue,
            };
            if let Some(prev) = previous_depth {
                let increment = (depth - prev).max(0.0);
                snowfall.push(DailySnowfall {
                    station_id: station_id.to_string(),
                    date: obs.date,
                    increment,
                });
            }
            previous_depth = Some(depth);
        }
    }
    snowfall
}
