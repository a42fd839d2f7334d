use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wse_oni::phase::SeasonPhase;
use wse_snotel::snowfall::DailySnowfall;
use wse_utils::dates::season_year_for_date;

/// A month of the snow season, November through April.
///
/// The declaration order is the canonical presentation order; it is not a
/// numeric sort of calendar month numbers (Nov and Dec precede Jan).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SeasonMonth {
    Nov,
    Dec,
    Jan,
    Feb,
    Mar,
    Apr,
}

impl SeasonMonth {
    /// All season months in canonical order.
    pub const ALL: [SeasonMonth; 6] = [
        SeasonMonth::Nov,
        SeasonMonth::Dec,
        SeasonMonth::Jan,
        SeasonMonth::Feb,
        SeasonMonth::Mar,
        SeasonMonth::Apr,
    ];

    /// Map a calendar month number to a season month, if it is one.
    pub fn from_calendar_month(month: u32) -> Option<SeasonMonth> {
        match month {
            11 => Some(SeasonMonth::Nov),
            12 => Some(SeasonMonth::Dec),
            1 => Some(SeasonMonth::Jan),
            2 => Some(SeasonMonth::Feb),
            3 => Some(SeasonMonth::Mar),
            4 => Some(SeasonMonth::Apr),
            _ => None,
        }
    }

    /// Display label for charts and tables.
    pub fn label(&self) -> &'static str {
        match self {
            SeasonMonth::Nov => "Nov",
            SeasonMonth::Dec => "Dec",
            SeasonMonth::Jan => "Jan",
            SeasonMonth::Feb => "Feb",
            SeasonMonth::Mar => "Mar",
            SeasonMonth::Apr => "Apr",
        }
    }
}

/// Total derived snowfall for one station, season, and season month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonSnowTotal {
    pub station_id: String,
    pub season_year: i32,
    pub month: SeasonMonth,
    pub total_snowfall: f64,
}

/// A season snow total joined with the season's ENSO phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedSeasonTotal {
    pub station_id: String,
    pub season_year: i32,
    pub month: SeasonMonth,
    pub phase: SeasonPhase,
    pub total_snowfall: f64,
}

/// Sum daily snowfall into (station, season_year, month) buckets.
///
/// Only November through April contributes. A bucket with no source data
/// is absent from the output, never a zero row: downstream means must
/// average only over buckets that exist.
pub fn aggregate_season_totals(snowfall: &[DailySnowfall]) -> Vec<SeasonSnowTotal> {
    let mut buckets: BTreeMap<(String, i32, SeasonMonth), f64> = BTreeMap::new();
    for daily in snowfall {
        use chrono::Datelike;
        let month = match SeasonMonth::from_calendar_month(daily.date.month()) {
            Some(m) => m,
            None => continue,
        };
        let season_year = season_year_for_date(&daily.date);
        *buckets
            .entry((daily.station_id.clone(), season_year, month))
            .or_insert(0.0) += daily.increment;
    }
    buckets
        .into_iter()
        .map(|((station_id, season_year, month), total_snowfall)| SeasonSnowTotal {
            station_id,
            season_year,
            month,
            total_snowfall,
        })
        .collect()
}

/// Inner-join season totals with the season -> phase map.
///
/// Season-years present on only one side are dropped: partial-history
/// years at either end of the record are excluded rather than assigned a
/// default phase.
pub fn merge_with_phases(
    totals: &[SeasonSnowTotal],
    phases: &BTreeMap<i32, SeasonPhase>,
) -> Vec<MergedSeasonTotal> {
    totals
        .iter()
        .filter_map(|total| {
            phases.get(&total.season_year).map(|&phase| MergedSeasonTotal {
                station_id: total.station_id.clone(),
                season_year: total.season_year,
                month: total.month,
                phase,
                total_snowfall: total.total_snowfall,
            })
        })
        .collect()
}

/// Observed (min, max) season-year range of a totals table, for chart
/// titles. None when the table is empty.
pub fn season_year_range(totals: &[SeasonSnowTotal]) -> Option<(i32, i32)> {
    let min = totals.iter().map(|t| t.season_year).min()?;
    let max = totals.iter().map(|t| t.season_year).max()?;
    Some((min, max))
}
