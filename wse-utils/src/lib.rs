//! Shared utility functions for WSE crates.

/// Date utility functions
pub mod dates {
    use chrono::{Datelike, NaiveDate};

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")?)
    }

    /// Parse a date string in "YYYYMMDD" format (compact cache format)
    pub fn parse_date_compact(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, "%Y%m%d")?)
    }

    /// Get the snow season year for a given calendar year and month.
    ///
    /// A snow season spans November through April and is named by the
    /// calendar year it ends in: November and December belong to the
    /// following year's season, every other month to its own year.
    /// e.g., Dec 2020 -> season 2021, Feb 2021 -> season 2021.
    ///
    /// This single rule is applied to both snowfall dates and index
    /// readings so that the two sides of the phase join always agree.
    pub fn season_year_for(year: i32, month: u32) -> i32 {
        if month >= 11 {
            year + 1
        } else {
            year
        }
    }

    /// Get the snow season year for a given date.
    pub fn season_year_for_date(date: &NaiveDate) -> i32 {
        season_year_for(date.year(), date.month())
    }

}
