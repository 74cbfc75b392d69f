//! Subcommand implementations. Each returns an [`Out`] holding the text shown
//! to the user and the structure printed with `--json`.

use crate::args::{Common, ExportArgs, ForecastArgs};
use anyhow::{bail, Context, Result};
use petrol_analytics::charts::ChartData;
use petrol_analytics::export::{write_export, write_export_to};
use petrol_analytics::metrics::{DatasetSummary, Kpis};
use petrol_analytics::{Dashboard, DashboardConfig, FilterOptions, ForecastResult};
use serde::Serialize;
use std::fmt::{Debug, Write};
use std::path::PathBuf;
use tracing::debug;

/// The result of a command
#[derive(Debug, Clone)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Structured data for `--json` output.
    structure: T,
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn structure(&self) -> &T {
        &self.structure
    }

    /// The text to print: pretty JSON of the structure, or the message
    pub fn render(&self, json: bool) -> Result<String> {
        if json {
            Ok(serde_json::to_string_pretty(&self.structure)?)
        } else {
            Ok(self.message.clone())
        }
    }

    pub fn print(&self, json: bool) -> Result<()> {
        println!("{}", self.render(json)?);
        Ok(())
    }
}

/// Merge the config file (if any) with command-line and environment overrides
pub fn resolve_config(common: &Common) -> Result<DashboardConfig> {
    let mut config = match common.config() {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };

    if let Some(file) = common.file() {
        config.data_file = file.to_path_buf();
    }
    if let Some(currency) = common.currency() {
        config.currency_symbol = currency.to_string();
    }

    config.validate()?;
    debug!(?config, "Resolved dashboard config");
    Ok(config)
}

/// Open the dashboard, failing with the loader message when the source is unreadable
pub fn open(config: DashboardConfig) -> Result<Dashboard> {
    let dashboard = Dashboard::new(config);
    if let Some(message) = dashboard.load_message() {
        bail!("{message}");
    }
    Ok(dashboard)
}

fn money(currency: &str, amount: f64) -> String {
    format!("{currency}{amount:.2}")
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryOut {
    pub summary: DatasetSummary,
    pub kpis: Kpis,
}

pub fn summary(dashboard: &Dashboard, common: &Common) -> Result<Out<SummaryOut>> {
    let snapshot = dashboard.snapshot(&common.criteria());
    let currency = &dashboard.config().currency_symbol;
    let (summary, kpis) = (snapshot.summary, snapshot.kpis);

    let mut text = String::new();
    writeln!(text, "Records: {}", summary.total_records)?;
    match summary.date_range {
        Some((first, last)) => writeln!(text, "Date range: {first} to {last}")?,
        None => writeln!(text, "Date range: n/a")?,
    }
    writeln!(text, "Stations: {}", summary.unique_stations)?;
    writeln!(text)?;
    writeln!(text, "Total spent: {}", money(currency, kpis.total_spent))?;
    writeln!(text, "Total litres: {:.1}L", kpis.total_litres)?;
    writeln!(
        text,
        "Average price per litre: {}",
        money(currency, kpis.avg_price_per_litre)
    )?;
    writeln!(text, "Visits: {}", kpis.total_visits)?;
    writeln!(
        text,
        "Average spend per visit: {}",
        money(currency, kpis.avg_spend_per_visit)
    )?;
    writeln!(text, "Monthly spend: {}", money(currency, kpis.monthly_spend))?;
    writeln!(text, "Monthly visits: {:.1}", kpis.monthly_visits)?;
    write!(text, "Litres per visit: {:.1}L", kpis.volume_per_visit)?;

    Ok(Out::new(text, SummaryOut { summary, kpis }))
}

pub fn insights(dashboard: &Dashboard, common: &Common) -> Result<Out<Vec<String>>> {
    let insights = dashboard.snapshot(&common.criteria()).insights;
    let text = if insights.is_empty() {
        "No insights for this selection".to_string()
    } else {
        insights.join("\n")
    };
    Ok(Out::new(text, insights))
}

pub fn forecast(
    dashboard: &Dashboard,
    common: &Common,
    args: &ForecastArgs,
) -> Result<Out<ForecastResult>> {
    let horizon = args.horizon().unwrap_or(dashboard.config().horizon_days);
    if horizon == 0 {
        bail!("--horizon must be at least 1");
    }

    let filtered = dashboard.filtered(&common.criteria());
    let forecast = petrol_analytics::predict(&filtered, horizon);
    let currency = &dashboard.config().currency_symbol;

    if forecast.is_empty() {
        return Ok(Out::new(
            "Not enough dated purchases to forecast (need at least 3)",
            forecast,
        ));
    }

    let mut text = String::new();
    for point in forecast.points() {
        writeln!(text, "{}  {}", point.date, money(currency, point.predicted_price))?;
    }
    writeln!(text)?;
    writeln!(text, "Total expected: {}", money(currency, forecast.total()))?;
    if let Some(average) = forecast.daily_average() {
        writeln!(text, "Daily average: {}", money(currency, average))?;
    }
    if let Some(fit) = forecast.fit() {
        write!(text, "Trend: {}/day", money(currency, fit.slope))?;
        if let Some(r_squared) = fit.r_squared {
            write!(text, " (R² {r_squared:.2})")?;
        }
    }

    Ok(Out::new(text, forecast))
}

pub fn options(dashboard: &Dashboard, common: &Common) -> Result<Out<FilterOptions>> {
    let options = dashboard.options(common.criteria().year);

    let years: Vec<String> = options.years.iter().map(ToString::to_string).collect();
    let text = format!(
        "Years: {}\nMonths: {}\nStations: {}",
        years.join(", "),
        options.months.join(", "),
        options.stations.join(", ")
    );
    Ok(Out::new(text, options))
}

pub fn charts(dashboard: &Dashboard, common: &Common) -> Result<Out<ChartData>> {
    let charts = dashboard.snapshot(&common.criteria()).charts;
    let currency = &dashboard.config().currency_symbol;

    let mut text = String::new();
    writeln!(text, "Spend per station:")?;
    for station in &charts.station_comparison {
        writeln!(text, "  {}: {}", station.station, money(currency, station.total))?;
    }
    writeln!(text, "Spend per month:")?;
    for month in &charts.monthly_summary {
        writeln!(text, "  {}: {}", month.month_name, money(currency, month.total))?;
    }
    if let Some(average) = charts.price_analysis.average {
        writeln!(text, "Average price per litre: {}", money(currency, average))?;
    }
    write!(
        text,
        "Points: {} spend, {} price, {} consumption",
        charts.spending_trend.len(),
        charts.price_analysis.points.len(),
        charts.consumption.len()
    )?;

    Ok(Out::new(text, charts))
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportOut {
    pub path: PathBuf,
    pub rows: usize,
}

pub fn export(dashboard: &Dashboard, common: &Common, args: &ExportArgs) -> Result<Out<ExportOut>> {
    let filtered = dashboard.filtered(&common.criteria());
    let config = dashboard.config();

    let path = match args.out() {
        Some(out) => {
            write_export_to(&filtered, args.format(), out)
                .with_context(|| format!("Unable to write {}", out.display()))?;
            out.to_path_buf()
        }
        None => write_export(&filtered, args.format(), &config.export_dir, &config.export_prefix)
            .with_context(|| format!("Unable to write to {}", config.export_dir.display()))?,
    };

    let rows = filtered.len();
    Ok(Out::new(
        format!("Exported {} rows to {}", rows, path.display()),
        ExportOut { path, rows },
    ))
}
