//! Command implementations for the WSE CLI.
//!
//! Provides subcommands for fetching SNOTEL snow-depth and ONI index data
//! and for running the season/phase report pipeline over the cached
//! downloads.

use clap::Subcommand;

pub mod query;
pub mod report;

#[derive(Subcommand)]
pub enum Command {
    /// Fetch daily snow depth for every Washington catalog station
    SnowQuery {
        /// Output path for the combined snow observations CSV
        #[arg(short = 's', long)]
        snow_csv: String,
    },

    /// Fetch the raw Oceanic Nino Index text
    OniQuery {
        /// Output path for the raw ONI text
        #[arg(short = 'o', long)]
        oni_text: String,
    },

    /// Run the full pipeline over cached downloads and write report tables
    Report {
        /// Path to the cached snow observations CSV
        #[arg(short = 's', long)]
        snow_csv: String,

        /// Path to the cached raw ONI text
        #[arg(short = 'o', long)]
        oni_text: String,

        /// Directory for the three output tables
        #[arg(short = 'd', long)]
        out_dir: String,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::SnowQuery { snow_csv } => query::run_snow_query(&snow_csv).await,
        Command::OniQuery { oni_text } => query::run_oni_query(&oni_text).await,
        Command::Report {
            snow_csv,
            oni_text,
            out_dir,
        } => report::run_report(&snow_csv, &oni_text, &out_dir),
    }
}
