use crate::aggregate::{MergedSeasonTotal, SeasonMonth};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wse_oni::phase::SeasonPhase;

/// Mean month total for one station, season month, and phase, across all
/// season-years sharing that phase. Feeds the phase/month profile chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseMonthProfile {
    pub station_id: String,
    pub month: SeasonMonth,
    pub phase: SeasonPhase,
    pub avg_snowfall: f64,
}

/// Per-station snowfall deviation of one phase from the Neutral baseline.
/// The baseline phase itself never appears as a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseComparison {
    pub station_id: String,
    pub phase: SeasonPhase,
    pub phase_avg_snowfall: f64,
    pub baseline_avg_snowfall: f64,
    pub pct_diff: f64,
}

/// Percentage-deviation table plus the stations omitted for having no
/// Neutral-phase baseline. An omitted station is reported here, which
/// keeps "no baseline" distinguishable from "baseline present but zero"
/// (the latter produces rows with an infinite or NaN pct_diff).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseDeviation {
    pub rows: Vec<PhaseComparison>,
    pub skipped_stations: Vec<String>,
}

/// Mean month total per (station, month, phase).
///
/// Only buckets that exist participate in each mean; absent months of a
/// season contribute nothing rather than an implicit zero.
pub fn phase_month_profile(merged: &[MergedSeasonTotal]) -> Vec<PhaseMonthProfile> {
    let mut sums: BTreeMap<(String, SeasonMonth, SeasonPhase), (f64, u32)> = BTreeMap::new();
    for row in merged {
        let entry = sums
            .entry((row.station_id.clone(), row.month, row.phase))
            .or_insert((0.0, 0));
        entry.0 += row.total_snowfall;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|((station_id, month, phase), (sum, count))| PhaseMonthProfile {
            station_id,
            month,
            phase,
            avg_snowfall: sum / count as f64,
        })
        .collect()
}

/// Per-station mean month total per phase, then percentage deviation of
/// every non-Neutral phase from the station's Neutral average.
///
/// A station with no Neutral-phase data has no defined baseline: it
/// produces no rows and is listed in `skipped_stations`. A Neutral
/// average of exactly zero is a present baseline; the division is
/// performed and the resulting infinity (or NaN) propagates explicitly
/// rather than being dropped.
pub fn phase_deviation(merged: &[MergedSeasonTotal]) -> PhaseDeviation {
    let mut sums: BTreeMap<(String, SeasonPhase), (f64, u32)> = BTreeMap::new();
    for row in merged {
        let entry = sums
            .entry((row.station_id.clone(), row.phase))
            .or_insert((0.0, 0));
        entry.0 += row.total_snowfall;
        entry.1 += 1;
    }

    let mut phase_means: BTreeMap<String, BTreeMap<SeasonPhase, f64>> = BTreeMap::new();
    for ((station_id, phase), (sum, count)) in sums {
        phase_means
            .entry(station_id)
            .or_default()
            .insert(phase, sum / count as f64);
    }

    let mut rows = Vec::new();
    let mut skipped_stations = Vec::new();
    for (station_id, means) in phase_means {
        let baseline = match means.get(&SeasonPhase::Neutral) {
            Some(&b) => b,
            None => {
                log::warn!(
                    "station {station_id}: no Neutral-phase seasons, omitting from deviation table"
                );
                skipped_stations.push(station_id);
                continue;
            }
        };
        for (phase, phase_avg) in means {
            if phase == SeasonPhase::Neutral {
                continue;
            }
            rows.push(PhaseComparison {
                station_id: station_id.clone(),
                phase,
                phase_avg_snowfall: phase_avg,
                baseline_avg_snowfall: baseline,
                pct_diff: (phase_avg - baseline) / baseline * 100.0,
            });
        }
    }

    PhaseDeviation {
        rows,
        skipped_stations,
    }
}

#[cfg(test)]
mod tests {
    use super::{phase_deviation, phase_month_profile};
    use crate::aggregate::{MergedSeasonTotal, SeasonMonth};
    use wse_oni::phase::SeasonPhase;

    fn merged(
        station: &str,
        season_year: i32,
        month: SeasonMonth,
        phase: SeasonPhase,
        total: f64,
    ) -> MergedSeasonTotal {
        MergedSeasonTotal {
            station_id: station.to_string(),
            season_year,
            month,
            phase,
            total_snowfall: total,
        }
    }

    #[test]
    fn test_profile_averages_across_same_phase_seasons() {
        // two La Nina Decembers at one station
        let rows = vec![
            merged("679", 2011, SeasonMonth::Dec, SeasonPhase::StrongLaNina, 60.0),
            merged("679", 2021, SeasonMonth::Dec, SeasonPhase::StrongLaNina, 40.0),
            merged("679", 2013, SeasonMonth::Dec, SeasonPhase::Neutral, 30.0),
        ];
        let profile = phase_month_profile(&rows);
        assert_eq!(profile.len(), 2);
        let la_nina = profile
            .iter()
            .find(|p| p.phase == SeasonPhase::StrongLaNina)
            .unwrap();
        assert!((la_nina.avg_snowfall - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_profile_groups_by_month() {
        let rows = vec![
            merged("679", 2011, SeasonMonth::Dec, SeasonPhase::Neutral, 30.0),
            merged("679", 2011, SeasonMonth::Jan, SeasonPhase::Neutral, 20.0),
        ];
        let profile = phase_month_profile(&rows);
        assert_eq!(profile.len(), 2);
        assert_eq!(profile[0].month, SeasonMonth::Dec);
        assert_eq!(profile[1].month, SeasonMonth::Jan);
    }

    #[test]
    fn test_deviation_relative_to_neutral() {
        let rows = vec![
            merged("679", 2011, SeasonMonth::Dec, SeasonPhase::StrongLaNina, 60.0),
            merged("679", 2013, SeasonMonth::Dec, SeasonPhase::Neutral, 40.0),
        ];
        let deviation = phase_deviation(&rows);
        assert!(deviation.skipped_stations.is_empty());
        assert_eq!(deviation.rows.len(), 1);
        let row = &deviation.rows[0];
        assert_eq!(row.phase, SeasonPhase::StrongLaNina);
        assert!((row.pct_diff - 50.0).abs() < f64::EPSILON);
        assert!((row.baseline_avg_snowfall - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_neutral_phase_itself_excluded_from_rows() {
        let rows = vec![
            merged("679", 2013, SeasonMonth::Dec, SeasonPhase::Neutral, 40.0),
            merged("679", 2011, SeasonMonth::Dec, SeasonPhase::WeakElNino, 20.0),
        ];
        let deviation = phase_deviation(&rows);
        assert!(deviation
            .rows
            .iter()
            .all(|r| r.phase != SeasonPhase::Neutral));
    }

    #[test]
    fn test_station_without_neutral_baseline_is_skipped() {
        let rows = vec![
            merged("418", 2011, SeasonMonth::Dec, SeasonPhase::StrongLaNina, 60.0),
            merged("679", 2013, SeasonMonth::Dec, SeasonPhase::Neutral, 40.0),
            merged("679", 2011, SeasonMonth::Dec, SeasonPhase::StrongLaNina, 60.0),
        ];
        let deviation = phase_deviation(&rows);
        assert_eq!(deviation.skipped_stations, vec!["418".to_string()]);
        assert!(deviation.rows.iter().all(|r| r.station_id == "679"));
    }

    #[test]
    fn test_zero_baseline_propagates_infinity() {
        let rows = vec![
            merged("679", 2013, SeasonMonth::Dec, SeasonPhase::Neutral, 0.0),
            merged("679", 2011, SeasonMonth::Dec, SeasonPhase::StrongLaNina, 60.0),
        ];
        let deviation = phase_deviation(&rows);
        // baseline exists, so the station is not skipped; the division
        // result is explicit, not dropped
        assert!(deviation.skipped_stations.is_empty());
        assert_eq!(deviation.rows.len(), 1);
        assert!(deviation.rows[0].pct_diff.is_infinite());
    }

    #[test]
    fn test_deviation_mean_is_per_month_bucket() {
        // phase mean is over month rows, not season sums: two Neutral
        // months of 30 and 10 average to 20
        let rows = vec![
            merged("679", 2013, SeasonMonth::Dec, SeasonPhase::Neutral, 30.0),
            merged("679", 2013, SeasonMonth::Jan, SeasonPhase::Neutral, 10.0),
            merged("679", 2011, SeasonMonth::Dec, SeasonPhase::WeakLaNina, 30.0),
        ];
        let deviation = phase_deviation(&rows);
        let row = &deviation.rows[0];
        assert!((row.baseline_avg_snowfall - 20.0).abs() < f64::EPSILON);
        assert!((row.pct_diff - 50.0).abs() < f64::EPSILON);
    }
}
