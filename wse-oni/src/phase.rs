use crate::oni::IndexReading;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wse_utils::dates::season_year_for;

/// The five winter-core months used for phase classification: November
/// through March. April is part of the snow season but not of the core;
/// the phase label is decided before the season's back half occurs.
pub const WINTER_CORE_MONTHS: [u32; 5] = [11, 12, 1, 2, 3];

/// ENSO intensity phase of a snow season, ordered coolest to warmest.
///
/// The declaration order is the canonical total order; iterate
/// [`SeasonPhase::ALL`] for displays rather than sorting labels.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SeasonPhase {
    StrongLaNina,
    WeakLaNina,
    Neutral,
    WeakElNino,
    StrongElNino,
}

impl SeasonPhase {
    /// All phases in canonical order, coolest first.
    pub const ALL: [SeasonPhase; 5] = [
        SeasonPhase::StrongLaNina,
        SeasonPhase::WeakLaNina,
        SeasonPhase::Neutral,
        SeasonPhase::WeakElNino,
        SeasonPhase::StrongElNino,
    ];

    /// Classify a winter-core index average into a phase.
    ///
    /// Ordered decision list; each boundary belongs to the cooler side, so
    /// the five intervals partition the real line with no gap or overlap:
    /// `<= -1.5` strong La Nina, `(-1.5, -0.5]` weak La Nina,
    /// `(-0.5, 0.5)` neutral, `[0.5, 1.5)` weak El Nino, `>= 1.5` strong
    /// El Nino.
    pub fn classify(average: f64) -> SeasonPhase {
        if average <= -1.5 {
            SeasonPhase::StrongLaNina
        } else if average <= -0.5 {
            SeasonPhase::WeakLaNina
        } else if average < 0.5 {
            SeasonPhase::Neutral
        } else if average < 1.5 {
            SeasonPhase::WeakElNino
        } else {
            SeasonPhase::StrongElNino
        }
    }

    /// Display label for charts and tables.
    pub fn label(&self) -> &'static str {
        match self {
            SeasonPhase::StrongLaNina => "Strong La Nina",
            SeasonPhase::WeakLaNina => "Weak La Nina",
            SeasonPhase::Neutral => "Neutral",
            SeasonPhase::WeakElNino => "Weak El Nino",
            SeasonPhase::StrongElNino => "Strong El Nino",
        }
    }

    /// Fixed chart color for this phase. Kept as a lookup beside the
    /// enumeration so display concerns never leak into the ordering.
    pub fn color(&self) -> &'static str {
        match self {
            SeasonPhase::StrongLaNina => "#0D47A1",
            SeasonPhase::WeakLaNina => "#64B5F6",
            SeasonPhase::Neutral => "#9E9E9E",
            SeasonPhase::WeakElNino => "#FFB74D",
            SeasonPhase::StrongElNino => "#D32F2F",
        }
    }
}

/// Average the winter-core index readings of each snow season.
///
/// Each reading is assigned to a season year with the same rule the
/// snowfall side uses; only the five winter-core months participate.
/// A season with fewer than five core readings (the ends of the record)
/// still averages over what exists; a season with none is omitted.
pub fn winter_core_averages(readings: &[IndexReading]) -> BTreeMap<i32, f64> {
    let mut sums: BTreeMap<i32, (f64, u32)> = BTreeMap::new();
    for reading in readings {
        if !WINTER_CORE_MONTHS.contains(&reading.month) {
            continue;
        }
        let season_year = season_year_for(reading.year, reading.month);
        let entry = sums.entry(season_year).or_insert((0.0, 0));
        entry.0 += reading.value;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(season_year, (sum, count))| (season_year, sum / count as f64))
        .collect()
}

/// Classify each snow season in the index record into its ENSO phase.
pub fn classify_seasons(readings: &[IndexReading]) -> BTreeMap<i32, SeasonPhase> {
    winter_core_averages(readings)
        .into_iter()
        .map(|(season_year, average)| (season_year, SeasonPhase::classify(average)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{classify_seasons, winter_core_averages, SeasonPhase};
    use crate::oni::IndexReading;

    fn reading(year: i32, month: u32, value: f64) -> IndexReading {
        IndexReading { year, month, value }
    }

    #[test]
    fn test_boundaries_map_to_cooler_side() {
        assert_eq!(SeasonPhase::classify(-1.5), SeasonPhase::StrongLaNina);
        assert_eq!(SeasonPhase::classify(-0.5), SeasonPhase::WeakLaNina);
        assert_eq!(SeasonPhase::classify(0.5), SeasonPhase::WeakElNino);
        assert_eq!(SeasonPhase::classify(1.5), SeasonPhase::StrongElNino);
    }

    #[test]
    fn test_interval_interiors() {
        assert_eq!(SeasonPhase::classify(-2.3), SeasonPhase::StrongLaNina);
        assert_eq!(SeasonPhase::classify(-0.9), SeasonPhase::WeakLaNina);
        assert_eq!(SeasonPhase::classify(0.0), SeasonPhase::Neutral);
        assert_eq!(SeasonPhase::classify(0.49), SeasonPhase::Neutral);
        assert_eq!(SeasonPhase::classify(-0.49), SeasonPhase::Neutral);
        assert_eq!(SeasonPhase::classify(1.1), SeasonPhase::WeakElNino);
        assert_eq!(SeasonPhase::classify(2.4), SeasonPhase::StrongElNino);
    }

    #[test]
    fn test_every_value_maps_to_exactly_one_phase() {
        // sweep across the partition; classify must agree with the
        // documented intervals everywhere, each value matching exactly one
        for i in -60..=60 {
            let x = i as f64 / 20.0;
            let intervals = [
                x <= -1.5,
                -1.5 < x && x <= -0.5,
                -0.5 < x && x < 0.5,
                0.5 <= x && x < 1.5,
                x >= 1.5,
            ];
            assert_eq!(intervals.iter().filter(|&&m| m).count(), 1, "partition failed at {x}");
            let expected = SeasonPhase::ALL[intervals.iter().position(|&m| m).unwrap()];
            assert_eq!(SeasonPhase::classify(x), expected, "classify disagreed at {x}");
        }
    }

    #[test]
    fn test_winter_core_spans_calendar_boundary() {
        // Nov+Dec 2020 and Jan+Feb+Mar 2021 all belong to season 2021
        let readings = vec![
            reading(2020, 11, -1.0),
            reading(2020, 12, -1.2),
            reading(2021, 1, -1.4),
            reading(2021, 2, -1.6),
            reading(2021, 3, -1.8),
        ];
        let averages = winter_core_averages(&readings);
        assert_eq!(averages.len(), 1);
        assert!((averages[&2021] - (-1.4)).abs() < 1e-9);
    }

    #[test]
    fn test_april_is_not_winter_core() {
        let readings = vec![reading(2021, 4, 5.0), reading(2021, 3, -1.8)];
        let averages = winter_core_averages(&readings);
        assert!((averages[&2021] - (-1.8)).abs() < 1e-9);
    }

    #[test]
    fn test_partial_season_still_averages() {
        // record starts mid-season; only Feb and Mar exist
        let readings = vec![reading(2021, 2, 0.6), reading(2021, 3, 0.8)];
        let averages = winter_core_averages(&readings);
        assert!((averages[&2021] - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_season_with_no_core_readings_is_omitted() {
        let readings = vec![reading(2021, 7, 0.3)];
        let averages = winter_core_averages(&readings);
        assert!(averages.is_empty());
    }

    #[test]
    fn test_classify_seasons() {
        let readings = vec![
            reading(2020, 11, -1.7),
            reading(2020, 12, -1.9),
            reading(2021, 11, 0.1),
            reading(2021, 12, 0.2),
        ];
        let phases = classify_seasons(&readings);
        assert_eq!(phases[&2021], SeasonPhase::StrongLaNina);
        assert_eq!(phases[&2022], SeasonPhase::Neutral);
    }
}
