//! Chart-ready data series
//!
//! Each series is plain data for the presentation layer to draw. Rows without
//! a date are left out of date-keyed series, and a series is empty when the
//! table lacks the columns it needs.

use crate::data::{columns, FuelTable};
use chrono::NaiveDate;
use petrol_math::mean;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A dated value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatedValue {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationTotal {
    pub station: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub month_num: i32,
    pub month_name: String,
    pub total: f64,
}

/// Price per litre over time and its mean
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub points: Vec<DatedValue>,
    pub average: Option<f64>,
}

/// Every series the dashboard draws
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub spending_trend: Vec<DatedValue>,
    pub station_comparison: Vec<StationTotal>,
    pub price_analysis: PriceSeries,
    pub consumption: Vec<DatedValue>,
    pub monthly_summary: Vec<MonthlyTotal>,
}

impl ChartData {
    pub fn from_table(table: &FuelTable) -> Self {
        Self {
            spending_trend: spending_trend(table),
            station_comparison: station_comparison(table),
            price_analysis: price_analysis(table),
            consumption: consumption(table),
            monthly_summary: monthly_summary(table),
        }
    }
}

/// Dated values of a numeric column in row order
fn dated_values(table: &FuelTable, column: &str) -> Vec<DatedValue> {
    let (Some(dates), Some(values)) = (table.dates(), table.f64_values(column)) else {
        return Vec::new();
    };

    dates
        .into_iter()
        .zip(values)
        .filter_map(|(date, value)| {
            Some(DatedValue {
                date: date?,
                value: value?,
            })
        })
        .collect()
}

/// Spend per purchase, sorted by date
pub fn spending_trend(table: &FuelTable) -> Vec<DatedValue> {
    let mut points = dated_values(table, columns::PRICE);
    points.sort_by_key(|p| p.date);
    points
}

/// Total spend per station, smallest first
pub fn station_comparison(table: &FuelTable) -> Vec<StationTotal> {
    let (Some(stations), Some(prices)) = (
        table.str_values(columns::STATION),
        table.f64_values(columns::PRICE),
    ) else {
        return Vec::new();
    };

    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for (station, price) in stations.into_iter().zip(prices) {
        if let Some(station) = station {
            *totals.entry(station).or_insert(0.0) += price.unwrap_or(0.0);
        }
    }

    let mut totals: Vec<StationTotal> = totals
        .into_iter()
        .map(|(station, total)| StationTotal { station, total })
        .collect();
    totals.sort_by(|a, b| a.total.total_cmp(&b.total));
    totals
}

/// Price per litre in row order, plus its mean
pub fn price_analysis(table: &FuelTable) -> PriceSeries {
    let points = dated_values(table, columns::LITER_PRICE);
    if points.is_empty() {
        return PriceSeries::default();
    }
    let average = mean(&table.defined_f64(columns::LITER_PRICE));
    PriceSeries { points, average }
}

/// Litres per purchase in row order
pub fn consumption(table: &FuelTable) -> Vec<DatedValue> {
    dated_values(table, columns::LITRES)
}

/// Total spend per calendar month, in month order
pub fn monthly_summary(table: &FuelTable) -> Vec<MonthlyTotal> {
    let (Some(nums), Some(names), Some(prices)) = (
        table.i32_values(columns::MONTH_NUM),
        table.str_values(columns::MONTH_NAME),
        table.f64_values(columns::PRICE),
    ) else {
        return Vec::new();
    };

    let mut totals: BTreeMap<(i32, String), f64> = BTreeMap::new();
    for ((num, name), price) in nums.into_iter().zip(names).zip(prices) {
        if let (Some(num), Some(name)) = (num, name) {
            *totals.entry((num, name)).or_insert(0.0) += price.unwrap_or(0.0);
        }
    }

    totals
        .into_iter()
        .map(|((month_num, month_name), total)| MonthlyTotal {
            month_num,
            month_name,
            total,
        })
        .collect()
}
