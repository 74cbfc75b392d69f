//! Key performance indicators over a (filtered) fuel table

use crate::data::{columns, FuelTable};
use crate::dates::span_days;
use chrono::NaiveDate;
use petrol_math::mean;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Average month length used to turn a day span into months
pub const DAYS_PER_MONTH: f64 = 30.44;

/// Summary metrics for the KPI cards.
///
/// Every metric falls back to zero when its inputs are missing, so an empty
/// table yields `Kpis::default()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub total_spent: f64,
    pub total_litres: f64,
    pub avg_price_per_litre: f64,
    pub total_visits: usize,
    pub avg_spend_per_visit: f64,
    pub monthly_spend: f64,
    pub monthly_visits: f64,
    /// Litres bought per visit
    pub volume_per_visit: f64,
}

impl Kpis {
    /// Metrics keyed by name, for presentation layers that want a mapping
    pub fn as_map(&self) -> BTreeMap<&'static str, f64> {
        BTreeMap::from([
            ("total_spent", self.total_spent),
            ("total_litres", self.total_litres),
            ("avg_price_per_litre", self.avg_price_per_litre),
            ("total_visits", self.total_visits as f64),
            ("avg_spend_per_visit", self.avg_spend_per_visit),
            ("monthly_spend", self.monthly_spend),
            ("monthly_visits", self.monthly_visits),
            ("volume_per_visit", self.volume_per_visit),
        ])
    }
}

fn per(total: f64, count: f64) -> f64 {
    if count > 0.0 {
        total / count
    } else {
        0.0
    }
}

/// Elapsed months between the earliest and latest dated rows
pub fn months_span(table: &FuelTable) -> Option<f64> {
    span_days(&table.valid_dates()).map(|days| days as f64 / DAYS_PER_MONTH)
}

/// Calculate key performance indicators
pub fn calculate_kpis(table: &FuelTable) -> Kpis {
    if table.is_empty() {
        return Kpis::default();
    }

    let total_spent: f64 = table.defined_f64(columns::PRICE).iter().sum();
    let total_litres: f64 = table.defined_f64(columns::LITRES).iter().sum();
    let avg_price_per_litre = mean(&table.defined_f64(columns::LITER_PRICE)).unwrap_or(0.0);
    let total_visits = table.len();
    let visits = total_visits as f64;

    let months = months_span(table).unwrap_or(0.0);

    Kpis {
        total_spent,
        total_litres,
        avg_price_per_litre,
        total_visits,
        avg_spend_per_visit: per(total_spent, visits),
        monthly_spend: per(total_spent, months),
        monthly_visits: per(visits, months),
        volume_per_visit: per(total_litres, visits),
    }
}

/// Record counts for the data management view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub total_records: usize,
    /// Earliest and latest valid date
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub unique_stations: usize,
}

impl DatasetSummary {
    pub fn of(table: &FuelTable) -> Self {
        let dates = table.valid_dates();
        let date_range = dates.iter().min().zip(dates.iter().max()).map(|(a, b)| (*a, *b));

        let unique_stations = table
            .str_values(columns::STATION)
            .map(|stations| stations.into_iter().flatten().collect::<BTreeSet<_>>().len())
            .unwrap_or(0);

        Self {
            total_records: table.len(),
            date_range,
            unique_stations,
        }
    }
}
