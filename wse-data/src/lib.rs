//! Season-aligned snowfall aggregation and phase-comparative statistics.
//!
//! This crate turns derived daily snowfall and classified seasons into the
//! tables the chart apps consume: per-season month totals, phase/month
//! profile means, and percentage deviation from the Neutral baseline.

pub mod aggregate;
pub mod stats;

/// Fixed data-source citation carried into every chart caption.
pub const DATA_CITATION: &str =
    "Data: USDA NRCS SNOTEL; NOAA CPC Oceanic Nino Index (PSL)";
