//! Command-line interface of the `petrol` binary.

use clap::{Parser, Subcommand, ValueEnum};
use petrol_analytics::export::ExportFormat;
use petrol_analytics::FilterCriteria;
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

/// petrol: fuel spend analytics for a spreadsheet of fuel purchases.
///
/// Reads a CSV or workbook (xlsx, xls, ods) with date, station, price and
/// litres columns and reports spend figures, insights and a 30-day trend
/// forecast for the selected year, month and station.
#[derive(Debug, Parser, Clone)]
#[command(name = "petrol", version)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Record counts, date range and KPIs for the selection.
    Summary,
    /// Natural-language insights for the selection.
    Insights,
    /// Project daily spend past the last purchase.
    Forecast(ForecastArgs),
    /// Years, months and stations available for filtering.
    Options,
    /// Chart series for the selection.
    Charts,
    /// Write the selected rows to CSV or JSON.
    Export(ExportArgs),
}

/// Options shared by every subcommand.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// Spreadsheet to analyse. Overrides `data_file` from the config.
    #[arg(long, global = true, env = "PETROL_DATA_FILE")]
    file: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(long, global = true, env = "PETROL_CONFIG")]
    config: Option<PathBuf>,

    /// Only purchases in this year.
    #[arg(long, global = true)]
    year: Option<i32>,

    /// Only purchases in this month (full name in any case, e.g. "march", or "All Months").
    #[arg(long, global = true)]
    month: Option<String>,

    /// Only purchases at this station (or "All Stations").
    #[arg(long, global = true)]
    station: Option<String>,

    /// Currency symbol for amounts. Overrides `currency_symbol` from the config.
    #[arg(long, global = true, env = "PETROL_CURRENCY")]
    currency: Option<String>,

    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, global = true, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,
}

impl Common {
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn config(&self) -> Option<&Path> {
        self.config.as_deref()
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn json(&self) -> bool {
        self.json
    }

    /// The row selection given by `--year`, `--month` and `--station`
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            year: self.year,
            month: self.month.clone(),
            station: self.station.clone(),
        }
    }
}

/// Args for `petrol forecast`.
#[derive(Debug, Parser, Clone, Default)]
pub struct ForecastArgs {
    /// Days to project. Overrides `horizon_days` from the config.
    #[arg(long, env = "PETROL_HORIZON_DAYS")]
    horizon: Option<usize>,
}

impl ForecastArgs {
    pub fn horizon(&self) -> Option<usize> {
        self.horizon
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    #[default]
    Csv,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

/// Args for `petrol export`.
#[derive(Debug, Parser, Clone, Default)]
pub struct ExportArgs {
    /// Output encoding.
    #[arg(long, value_enum, default_value_t = FormatArg::Csv)]
    format: FormatArg,

    /// Output path. Defaults to `<export_dir>/<prefix>_<YYYYMMDD>.<ext>`.
    #[arg(long)]
    out: Option<PathBuf>,
}

impl ExportArgs {
    pub fn format(&self) -> ExportFormat {
        self.format.into()
    }

    pub fn out(&self) -> Option<&Path> {
        self.out.as_deref()
    }
}
