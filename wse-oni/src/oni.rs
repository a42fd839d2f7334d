use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Magnitude at or above which an index value is a "not yet recorded"
/// sentinel (-99.9 in the PSL files) rather than a reading.
pub const SENTINEL_MAGNITUDE: f64 = 90.0;

/// Years outside this range mark a line as header/footer, not data.
pub const MIN_DATA_YEAR: i32 = 1900;
pub const MAX_DATA_YEAR: i32 = 2099;

/// Number of monthly columns in a data row.
pub const MONTHS_PER_ROW: usize = 12;

/// Errors that can occur when parsing the raw ONI text.
#[derive(Debug, PartialEq, Clone, Copy, Hash)]
pub enum OniParseError {
    /// The text contained zero parseable data rows. An empty result is
    /// never returned silently.
    NoDataRows,
}

impl std::fmt::Display for OniParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OniParseError::NoDataRows => write!(f, "ONI text contains no parseable data rows"),
        }
    }
}

impl std::error::Error for OniParseError {}

/// One monthly Oceanic Nino Index reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexReading {
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
    /// Three-month running-mean SST anomaly in degrees C.
    pub value: f64,
}

/// Parse the raw NOAA PSL ONI text into a clean monthly series.
///
/// The format is one row per year: a 4-digit year followed by 12 monthly
/// values, interleaved with header and footer lines (year ranges, sentinel
/// declarations, source citations) that are not data rows. Data rows are
/// selected by shape: a first token that parses as a year in
/// [`MIN_DATA_YEAR`]..=[`MAX_DATA_YEAR`] followed by exactly twelve value
/// tokens. Everything else is skipped without failing the parse.
///
/// Sentinel values (magnitude >= [`SENTINEL_MAGNITUDE`]) are dropped:
/// they mean "not yet recorded", not zero. The result is unique per
/// (year, month) and ordered by (year, month).
pub fn parse_oni_text(text: &str) -> Result<Vec<IndexReading>, OniParseError> {
    let mut readings: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    let mut data_rows = 0usize;

    for line in text.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != MONTHS_PER_ROW + 1 {
            continue;
        }
        let first = tokens[0];
        if first.len() != 4 {
            continue;
        }
        let year = match first.parse::<i32>() {
            Ok(y) if (MIN_DATA_YEAR..=MAX_DATA_YEAR).contains(&y) => y,
            _ => continue,
        };
        let values = tokens[1..]
            .iter()
            .map(|t| t.parse::<f64>())
            .collect::<Result<Vec<f64>, _>>();
        let values = match values {
            Ok(v) => v,
            Err(_) => continue,
        };
        data_rows += 1;
        for (i, value) in values.into_iter().enumerate() {
            if value.abs() >= SENTINEL_MAGNITUDE {
                continue;
            }
            let month = (i + 1) as u32;
            readings.insert((year, month), value);
        }
    }

    if data_rows == 0 {
        return Err(OniParseError::NoDataRows);
    }

    Ok(readings
        .into_iter()
        .map(|((year, month), value)| IndexReading { year, month, value })
        .collect())
}
