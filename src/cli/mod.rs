pub mod config;
pub mod export;
pub mod report;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use log::info;

use crate::error::Result;
use crate::models::Dimension;
use crate::session::Session;

#[derive(Parser)]
#[command(
    name = "creditlens",
    version,
    about = "Analyze tax credit utilization trends by year, state, sector and income bracket."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Repeatable filter flags. Values within one flag are OR-ed; different
/// flags are AND-ed.
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Keep only these years
    #[arg(long = "year")]
    pub years: Vec<String>,
    /// Keep only these states
    #[arg(long = "state")]
    pub states: Vec<String>,
    /// Keep only these credit types
    #[arg(long = "credit-type")]
    pub credit_types: Vec<String>,
    /// Keep only these sectors
    #[arg(long = "sector")]
    pub sectors: Vec<String>,
    /// Keep only these income brackets
    #[arg(long = "income-bracket")]
    pub income_brackets: Vec<String>,
}

impl FilterArgs {
    fn pairs(&self) -> Vec<(Dimension, &str)> {
        let dims = [
            (Dimension::Year, &self.years),
            (Dimension::State, &self.states),
            (Dimension::CreditType, &self.credit_types),
            (Dimension::Sector, &self.sectors),
            (Dimension::IncomeBracket, &self.income_brackets),
        ];
        dims.into_iter()
            .flat_map(|(d, vals)| vals.iter().map(move |v| (d, v.as_str())))
            .collect()
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Headline statistics for the filtered records.
    Summary {
        /// CSV file: Year, State, Tax_Credit_Type, Sector, Claimed_Amount, Claims_Count, Income_Bracket, Source
        file: PathBuf,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Totals grouped by one dimension.
    Breakdown {
        file: PathBuf,
        /// Dimension to group by
        #[arg(long, value_enum)]
        by: Dimension,
        /// Show only the first N groups
        #[arg(long)]
        top: Option<usize>,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Yearly trend, top credit types and states, sectors and income brackets.
    Trends {
        file: PathBuf,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// List the distinct values available for each filter.
    Values { file: PathBuf },
    /// Write the filtered records or a summary report to disk.
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },
    /// Show or update settings.
    Config {
        /// Default directory for exports
        #[arg(long = "export-dir")]
        export_dir: Option<String>,
        /// File name prefix for CSV exports
        #[arg(long = "csv-prefix")]
        csv_prefix: Option<String>,
        /// File name prefix for summary reports
        #[arg(long = "report-prefix")]
        report_prefix: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ExportCommands {
    /// Export the filtered records as CSV.
    Csv {
        file: PathBuf,
        /// Output file path (default: <export_dir>/<csv_prefix>_<date>.csv)
        #[arg(long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Export a plain-text summary report.
    Report {
        file: PathBuf,
        /// Output file path (default: <export_dir>/<report_prefix>_<date>.txt)
        #[arg(long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        filters: FilterArgs,
    },
}

/// Load `file` into a fresh session and apply the filter flags.
pub(crate) fn load_session(file: &Path, filters: &FilterArgs) -> Result<Session> {
    let mut session = Session::new();
    let skipped = session.load_file(file)?;
    if skipped > 0 {
        info!("{skipped} rows with missing columns were skipped");
    }
    for (dimension, value) in filters.pairs() {
        session.add_filter(dimension, value)?;
    }
    Ok(session)
}

/// `3 of 10 records (2 filters active)`
pub(crate) fn status_line(session: &Session) -> String {
    let active = session.selection().active_count();
    format!(
        "{} of {} records ({} filter{} active)",
        session.active().len(),
        session.records().len(),
        active,
        if active == 1 { "" } else { "s" }
    )
}
