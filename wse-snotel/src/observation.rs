use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, collections::HashMap};

/// Date format used in the snow observation cache CSV: "YYYYMMDD"
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Expected number of columns in a cache CSV row: station_id, date, depth.
pub const CSV_ROW_LENGTH: usize = 3;

/// Errors that can occur when parsing cached snow observations.
#[derive(Debug, PartialEq, Clone, Copy, Hash)]
pub enum ObservationError {
    /// A row had the wrong column count, an unparseable date, or a
    /// depth field that was neither empty nor numeric.
    ObservationCollectionError,
}

impl std::fmt::Display for ObservationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObservationError::ObservationCollectionError => {
                write!(f, "snow observation cache contains malformed rows")
            }
        }
    }
}

impl std::error::Error for ObservationError {}

/// A snow depth reading for one station-day.
///
/// - `Missing`: the station reported nothing for that day, or the reported
///   depth was negative or non-finite. Missing readings are excluded from
///   snowfall derivation rather than zero-filled.
/// - `Depth(f64)`: measured snow depth in inches.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum DepthReading {
    Missing,
    Depth(f64),
}

/// A single daily snow-depth observation from a SNOTEL station.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub station_id: String,
    pub date: NaiveDate,
    pub value: DepthReading,
}

impl Observation {
    /// Parse the combined snow cache CSV (no headers) into Observations.
    ///
    /// Row format: `station_id,YYYYMMDD,depth` where depth may be blank
    /// for a day the station did not report.
    pub fn parse_cache_csv(body: &str) -> Result<Vec<Observation>, ObservationError> {
        let records = ReaderBuilder::new()
            .has_headers(false)
            .from_reader(body.as_bytes())
            .records()
            .collect::<Result<Vec<StringRecord>, _>>()
            .map_err(|_| ObservationError::ObservationCollectionError)?;
        records
            .into_iter()
            .map(Observation::try_from)
            .collect::<Result<Vec<Observation>, _>>()
            .map_err(|_| ObservationError::ObservationCollectionError)
    }

    /// Group a vector of observations by station_id.
    pub fn vector_to_hashmap(
        vec_observations: Vec<Observation>,
    ) -> HashMap<String, Vec<Observation>> {
        let mut result: HashMap<String, Vec<Observation>> = HashMap::new();
        for obs in vec_observations {
            result
                .entry(obs.station_id.clone())
                .or_default()
                .push(obs);
        }
        result
    }
}

impl TryFrom<StringRecord> for Observation {
    type Error = ();

    fn try_from(value: StringRecord) -> Result<Self, Self::Error> {
        if value.len() != CSV_ROW_LENGTH {
            return Err(());
        }
        let station_id = value.get(0).ok_or(())?.trim().to_string();
        if station_id.is_empty() {
            return Err(());
        }
        let date = NaiveDate::parse_from_str(value.get(1).ok_or(())?.trim(), DATE_FORMAT)
            .map_err(|_| ())?;
        let depth_field = value.get(2).ok_or(())?.trim();
        let reading = if depth_field.is_empty() {
            DepthReading::Missing
        } else {
            let depth = depth_field.parse::<f64>().map_err(|_| ())?;
            // negative depth is a sensor artifact, not a measurement
            if depth.is_finite() && depth >= 0.0 {
                DepthReading::Depth(depth)
            } else {
                DepthReading::Missing
            }
        };
        Ok(Observation {
            station_id,
            date,
            value: reading,
        })
    }
}

impl Ord for Observation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date.cmp(&other.date)
    }
}

impl Eq for Observation {}

impl PartialEq for Observation {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date && self.station_id == other.station_id
    }
}

impl PartialOrd for Observation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod test {
    use super::{DepthReading, Observation, ObservationError};

    const STR_RESULT: &str = r#"679,20211213,38.0
679,20211214,40.0
679,20211215,42.5
679,20211216,
791,20211214,31.0
791,20211215,-2.0
"#;

    #[test]
    fn test_parse_cache_csv() {
        let observations = Observation::parse_cache_csv(STR_RESULT).unwrap();
        assert_eq!(observations.len(), 6);
        assert_eq!(observations[0].value, DepthReading::Depth(38.0));
        assert_eq!(observations[0].station_id, "679");
    }

    #[test]
    fn test_blank_depth_is_missing() {
        let observations = Observation::parse_cache_csv(STR_RESULT).unwrap();
        assert_eq!(observations[3].value, DepthReading::Missing);
    }

    #[test]
    fn test_negative_depth_is_missing() {
        let observations = Observation::parse_cache_csv(STR_RESULT).unwrap();
        assert_eq!(observations[5].value, DepthReading::Missing);
    }

    #[test]
    fn test_non_numeric_depth_fails() {
        let body = "679,20211213,n/a\n";
        let result = Observation::parse_cache_csv(body);
        assert_eq!(
            result.unwrap_err(),
            ObservationError::ObservationCollectionError
        );
    }

    #[test]
    fn test_vector_to_hashmap_groups_by_station() {
        let observations = Observation::parse_cache_csv(STR_RESULT).unwrap();
        let grouped = Observation::vector_to_hashmap(observations);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped.get("679").unwrap().len(), 4);
        assert_eq!(grouped.get("791").unwrap().len(), 2);
    }
}
