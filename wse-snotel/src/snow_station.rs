use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};

/// Embedded CSV catalog of the Washington SNOTEL stations this toolkit
/// tracks. Fetched observation data and derived statistics cover exactly
/// these stations.
pub static STATIONS_CSV: &str = include_str!("../../fixtures/snotel_stations.csv");

/// Represents a Washington SNOTEL snow measurement station.
///
/// Holds metadata for the automated stations that report daily snow depth.
///
/// See: <https://wcc.sc.egov.usda.gov/nwcc/yearcount?network=sntl&state=WA>
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SnowStation {
    /// SNOTEL numeric station identifier (e.g., "679" for Paradise)
    pub station_id: String,
    /// Human-readable name of the station
    pub name: String,
    /// Elevation of the station in feet
    pub elevation: i32,
    /// County where the station is located
    pub county: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl SnowStation {
    /// The embedded Washington station catalog.
    pub fn station_catalog() -> Result<Vec<SnowStation>, std::io::Error> {
        SnowStation::parse_snow_station_csv(STATIONS_CSV)
    }

    /// Parse a CSV string of snow station data into a vector of SnowStations.
    ///
    /// Expected CSV columns: station_id, name, elevation, county, latitude, longitude
    pub fn parse_snow_station_csv(csv_object: &str) -> Result<Vec<SnowStation>, std::io::Error> {
        let mut station_list: Vec<SnowStation> = Vec::new();
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .from_reader(csv_object.as_bytes());
        for row in rdr.records() {
            let record = row?;
            let field = |idx: usize, name: &str| {
                record.get(idx).map(String::from).ok_or_else(|| {
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("{name} column missing"),
                    )
                })
            };
            let station_id = field(0, "station_id")?;
            let name = field(1, "name")?;
            let elevation = record
                .get(2)
                .unwrap_or("0")
                .trim()
                .parse::<i32>()
                .unwrap_or(0);
            let county = field(3, "county")?;
            let latitude = record
                .get(4)
                .unwrap_or("0.0")
                .trim()
                .parse::<f64>()
                .unwrap_or(0.0);
            let longitude = record
                .get(5)
                .unwrap_or("0.0")
                .trim()
                .parse::<f64>()
                .unwrap_or(0.0);
            let station = SnowStation {
                station_id,
                name,
                elevation,
                county,
                latitude,
                longitude,
            };
            station_list.push(station);
        }
        Ok(station_list)
    }
}

#[cfg(test)]
mod tests {
    use super::SnowStation;

    #[test]
    fn test_parse_snow_station_csv() {
        let csv_data = "\
station_id,name,elevation,county,latitude,longitude
679,Paradise,5120,Pierce,46.78,-121.75
791,Stevens Pass,3950,Chelan,47.74,-121.09
";
        let stations = SnowStation::parse_snow_station_csv(csv_data).unwrap();
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].station_id, "679");
        assert_eq!(stations[0].name, "Paradise");
        assert_eq!(stations[0].elevation, 5120);
        assert_eq!(stations[0].county, "Pierce");
        assert!((stations[0].latitude - 46.78).abs() < f64::EPSILON);
        assert!((stations[0].longitude - (-121.75)).abs() < f64::EPSILON);
        assert_eq!(stations[1].station_id, "791");
    }

    #[test]
    fn test_parse_empty_csv() {
        let csv_data = "station_id,name,elevation,county,latitude,longitude\n";
        let stations = SnowStation::parse_snow_station_csv(csv_data).unwrap();
        assert_eq!(stations.len(), 0);
    }

    #[test]
    fn test_embedded_catalog() {
        let stations = SnowStation::station_catalog().unwrap();
        assert!(!stations.is_empty());
        assert!(stations.iter().any(|s| s.name == "Paradise"));
    }
}
