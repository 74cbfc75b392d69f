//! Natural-language insights for the analytics view

use crate::data::{columns, FuelTable};
use crate::dates::span_days;
use petrol_math::Summary;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Currency symbol used when none is configured
pub const DEFAULT_CURRENCY: &str = "R";

/// A single computed insight, rendered to text by [`Insight::render`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Insight {
    /// Station with the highest summed spend and its share of the total
    PrimaryStation { station: String, share_pct: f64 },
    /// Mean price per litre, with its sample standard deviation when defined
    FuelPrice { mean: f64, std_dev: Option<f64> },
    /// Total and mean litres per visit
    Consumption { total_litres: f64, mean_litres: f64 },
    /// Visits per week over the dated span
    VisitFrequency { per_week: f64 },
}

impl Insight {
    pub fn render(&self, currency: &str) -> String {
        match self {
            Insight::PrimaryStation { station, share_pct } => {
                format!("Primary Station: {station} ({share_pct:.1}% of total spend)")
            }
            Insight::FuelPrice {
                mean,
                std_dev: Some(std_dev),
            } => format!("Average Fuel Price: {currency}{mean:.2}/L (±{currency}{std_dev:.2})"),
            Insight::FuelPrice { mean, std_dev: None } => {
                format!("Average Fuel Price: {currency}{mean:.2}/L")
            }
            Insight::Consumption {
                total_litres,
                mean_litres,
            } => format!(
                "Consumption: {total_litres:.0}L total, {mean_litres:.1}L average per visit"
            ),
            Insight::VisitFrequency { per_week } => {
                format!("Visit Frequency: {per_week:.1} times per week")
            }
        }
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(DEFAULT_CURRENCY))
    }
}

fn primary_station(table: &FuelTable) -> Option<Insight> {
    let stations = table.str_values(columns::STATION)?;
    let prices = table.f64_values(columns::PRICE)?;

    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for (station, price) in stations.into_iter().zip(prices) {
        if let Some(station) = station {
            *totals.entry(station).or_insert(0.0) += price.unwrap_or(0.0);
        }
    }

    let grand_total: f64 = totals.values().sum();
    // Ties go to the alphabetically first station.
    let (station, top) = totals
        .into_iter()
        .fold(None, |best: Option<(String, f64)>, (name, total)| match best {
            Some((_, best_total)) if best_total >= total => best,
            _ => Some((name, total)),
        })?;

    let share_pct = if grand_total != 0.0 {
        top / grand_total * 100.0
    } else {
        0.0
    };
    Some(Insight::PrimaryStation { station, share_pct })
}

fn fuel_price(table: &FuelTable) -> Option<Insight> {
    if !table.has_column(columns::LITER_PRICE) {
        return None;
    }
    let summary = Summary::of(&table.defined_f64(columns::LITER_PRICE));
    Some(Insight::FuelPrice {
        mean: summary.mean?,
        std_dev: summary.std_dev,
    })
}

fn consumption(table: &FuelTable) -> Option<Insight> {
    if !table.has_column(columns::LITRES) {
        return None;
    }
    let summary = Summary::of(&table.defined_f64(columns::LITRES));
    Some(Insight::Consumption {
        total_litres: summary.sum,
        mean_litres: summary.mean?,
    })
}

fn visit_frequency(table: &FuelTable) -> Option<Insight> {
    if !table.has_column(columns::DATE) || table.len() <= 1 {
        return None;
    }
    let days = span_days(&table.valid_dates()).unwrap_or(0);
    let per_week = if days > 0 {
        table.len() as f64 / (days as f64 / 7.0)
    } else {
        0.0
    };
    Some(Insight::VisitFrequency { per_week })
}

/// Compute the insights that the table's columns support, in display order:
/// primary station, fuel price, consumption, visit frequency.
pub fn generate_insights(table: &FuelTable) -> Vec<Insight> {
    if table.is_empty() {
        return Vec::new();
    }

    [
        primary_station(table),
        fuel_price(table),
        consumption(table),
        visit_frequency(table),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Insights rendered with the default currency symbol
pub fn get_insights(table: &FuelTable) -> Vec<String> {
    generate_insights(table)
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::DataLoader;
    use pretty_assertions::assert_eq;

    fn table() -> FuelTable {
        DataLoader::from_csv_str(
            "date,station,price,litres\n\
             2023-01-01,Shell,500,25\n\
             2023-01-08,BP,300,15\n\
             2023-01-15,Shell,200,10\n",
        )
        .unwrap()
    }

    #[test]
    fn test_insights_in_order() {
        let insights = get_insights(&table());

        assert_eq!(
            insights,
            vec![
                "Primary Station: Shell (70.0% of total spend)".to_string(),
                "Average Fuel Price: R20.00/L (±R0.00)".to_string(),
                "Consumption: 50L total, 16.7L average per visit".to_string(),
                "Visit Frequency: 1.5 times per week".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_table_has_no_insights() {
        assert!(get_insights(&table().cleared()).is_empty());
        assert!(get_insights(&FuelTable::empty()).is_empty());
    }

    #[test]
    fn test_insights_follow_available_columns() {
        let litres_only = DataLoader::from_csv_str("litres\n10\n30\n").unwrap();
        assert_eq!(
            generate_insights(&litres_only),
            vec![Insight::Consumption {
                total_litres: 40.0,
                mean_litres: 20.0
            }]
        );
    }

    #[test]
    fn test_same_day_visits_have_zero_frequency() {
        let table = DataLoader::from_csv_str("date,price\n2023-01-01,10\n2023-01-01,20\n").unwrap();
        assert_eq!(
            generate_insights(&table),
            vec![Insight::VisitFrequency { per_week: 0.0 }]
        );
    }

    #[test]
    fn test_station_ties_and_currency() {
        let insight = Insight::PrimaryStation {
            station: "BP".to_string(),
            share_pct: 50.0,
        };
        assert_eq!(insight.to_string(), "Primary Station: BP (50.0% of total spend)");

        let price = Insight::FuelPrice {
            mean: 21.456,
            std_dev: None,
        };
        assert_eq!(price.render("$"), "Average Fuel Price: $21.46/L");

        let tied = DataLoader::from_csv_str("station,price\nShell,10\nBP,10\n").unwrap();
        assert_eq!(
            primary_station(&tied),
            Some(Insight::PrimaryStation {
                station: "BP".to_string(),
                share_pct: 50.0
            })
        );
    }
}
