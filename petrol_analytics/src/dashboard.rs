//! The per-interaction analytics pipeline: cached load, filter, aggregate,
//! forecast

use crate::cache::DataCache;
use crate::charts::ChartData;
use crate::config::DashboardConfig;
use crate::data::FuelTable;
use crate::filter::{FilterCriteria, FilterOptions};
use crate::forecast::predict;
use crate::insights::generate_insights;
use crate::metrics::{calculate_kpis, DatasetSummary, Kpis};
use crate::models::ForecastResult;
use serde::Serialize;
use tracing::debug;

/// Everything a presentation layer shows for one filter selection
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    /// Load failure message; the other fields are then empty
    pub message: Option<String>,
    pub criteria: FilterCriteria,
    #[serde(skip)]
    pub table: FuelTable,
    pub kpis: Kpis,
    pub insights: Vec<String>,
    pub forecast: ForecastResult,
    pub summary: DatasetSummary,
    pub charts: ChartData,
    pub options: FilterOptions,
}

/// Analytics over one configured source.
///
/// The source is read on first use and kept until [`Dashboard::reload`].
#[derive(Debug)]
pub struct Dashboard {
    config: DashboardConfig,
    cache: DataCache,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        let cache = DataCache::new(&config.data_file);
        Self { config, cache }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// The full, unfiltered table (empty when loading failed)
    pub fn table(&self) -> &FuelTable {
        &self.cache.get().table
    }

    /// Loader message when the source could not be read
    pub fn load_message(&self) -> Option<&str> {
        self.cache.get().message.as_deref()
    }

    /// Drop the cached table; the next query rereads the source
    pub fn reload(&mut self) {
        self.cache.invalidate();
    }

    /// Filter choices, with months limited to `year` when given
    pub fn options(&self, year: Option<i32>) -> FilterOptions {
        FilterOptions::for_year(self.table(), year)
    }

    /// Rows matching the criteria, or an empty table if filtering fails
    pub fn filtered(&self, criteria: &FilterCriteria) -> FuelTable {
        criteria.apply_or_empty(self.table())
    }

    /// Run the whole pipeline for one selection
    pub fn snapshot(&self, criteria: &FilterCriteria) -> DashboardSnapshot {
        let outcome = self.cache.get();
        let filtered = self.filtered(criteria);

        let insights = generate_insights(&filtered)
            .iter()
            .map(|insight| insight.render(&self.config.currency_symbol))
            .collect();

        debug!(
            rows = filtered.len(),
            horizon = self.config.horizon_days,
            "Computed dashboard snapshot"
        );

        DashboardSnapshot {
            message: outcome.message.clone(),
            criteria: criteria.clone(),
            kpis: calculate_kpis(&filtered),
            insights,
            forecast: predict(&filtered, self.config.horizon_days),
            summary: DatasetSummary::of(&filtered),
            charts: ChartData::from_table(&filtered),
            options: self.options(criteria.year),
            table: filtered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn dashboard(dir: &Path, csv: &str) -> Dashboard {
        let path = dir.join("spend.csv");
        fs::write(&path, csv).unwrap();
        Dashboard::new(DashboardConfig {
            data_file: path,
            currency_symbol: "$".to_string(),
            horizon_days: 7,
            ..DashboardConfig::default()
        })
    }

    #[test]
    fn test_snapshot_for_selection() {
        let dir = tempdir().unwrap();
        let dashboard = dashboard(
            dir.path(),
            "Date,Station,Price,Litres\n\
             2023-01-01,Shell,100,5\n\
             2023-01-11,Shell,150,7.5\n\
             2023-01-21,BP,200,10\n\
             2022-12-01,BP,90,4.5\n",
        );

        let snapshot = dashboard.snapshot(&FilterCriteria::new().year(2023));

        assert!(snapshot.message.is_none());
        assert_eq!(snapshot.table.len(), 3);
        assert_eq!(snapshot.kpis.total_visits, 3);
        assert_eq!(snapshot.forecast.len(), 7);
        assert_eq!(snapshot.summary.unique_stations, 2);
        assert_eq!(snapshot.insights[1], "Average Fuel Price: $20.00/L (±$0.00)");
        assert_eq!(snapshot.options.years, vec![2023, 2022]);
        assert_eq!(snapshot.options.months, vec!["All Months", "January"]);
    }

    #[test]
    fn test_filtered_matches_filter_data() {
        let dir = tempdir().unwrap();
        let dashboard = dashboard(
            dir.path(),
            "Date,Station,Price
             2023-01-01,Shell,100
             2023-02-11,Shell,150
             2023-01-21,BP,200
",
        );

        let filtered = dashboard.filtered(&FilterCriteria::new().month("january"));

        assert_eq!(filtered.defined_f64("price"), vec![100.0, 200.0]);
        assert_eq!(
            filtered,
            crate::filter::filter_data(dashboard.table(), None, Some("January"), None)
        );
    }

    #[test]
    fn test_missing_source_gives_empty_snapshot() {
        let dashboard = Dashboard::new(DashboardConfig {
            data_file: "nowhere/Spend.xlsx".into(),
            ..DashboardConfig::default()
        });

        let snapshot = dashboard.snapshot(&FilterCriteria::new());

        assert!(snapshot.message.unwrap().contains("nowhere/Spend.xlsx"));
        assert!(snapshot.table.is_empty());
        assert_eq!(snapshot.kpis, Kpis::default());
        assert!(snapshot.insights.is_empty());
        assert!(snapshot.forecast.is_empty());
    }

    #[test]
    fn test_reload_rereads_source() {
        let dir = tempdir().unwrap();
        let mut dashboard = dashboard(dir.path(), "date,price\n2023-01-01,10\n");
        assert_eq!(dashboard.table().len(), 1);

        fs::write(
            &dashboard.config().data_file,
            "date,price\n2023-01-01,10\n2023-01-02,20\n",
        )
        .unwrap();
        assert_eq!(dashboard.table().len(), 1);

        dashboard.reload();
        assert_eq!(dashboard.table().len(), 2);
    }
}
