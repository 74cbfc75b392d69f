//! Forecasting models for spend-over-time data

use crate::data::{columns, FuelTable};
use crate::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

pub mod linear_trend;

/// Dated spend observations, sorted ascending by date
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpendHistory {
    points: Vec<(NaiveDate, f64)>,
}

impl SpendHistory {
    /// Build from observations in any order; ties keep their input order
    pub fn new(mut points: Vec<(NaiveDate, f64)>) -> Self {
        points.retain(|(_, amount)| amount.is_finite());
        points.sort_by_key(|(date, _)| *date);
        Self { points }
    }

    /// Rows with both a date and a price, sorted by date
    pub fn from_table(table: &FuelTable) -> Self {
        let (Some(dates), Some(prices)) = (table.dates(), table.f64_values(columns::PRICE)) else {
            return Self::default();
        };

        let points = dates
            .into_iter()
            .zip(prices)
            .filter_map(|(date, price)| Some((date?, price?)))
            .collect();
        Self::new(points)
    }

    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|(date, _)| *date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|(date, _)| *date)
    }

    /// Whole days since the first observation, one per point
    pub fn elapsed_days(&self) -> Vec<f64> {
        let Some(start) = self.first_date() else {
            return Vec::new();
        };
        self.points
            .iter()
            .map(|(date, _)| (*date - start).num_days() as f64)
            .collect()
    }

    pub fn amounts(&self) -> Vec<f64> {
        self.points.iter().map(|(_, amount)| *amount).collect()
    }
}

/// One projected day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_price: f64,
}

/// Parameters of a fitted trend line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendFit {
    /// Spend change per day
    pub slope: f64,
    /// Fitted spend on the first observed day
    pub intercept: f64,
    /// `None` when the observed spend is constant
    pub r_squared: Option<f64>,
    pub observations: usize,
}

/// Forecast result: projected points in chronological order.
///
/// An empty result means no forecast is available, which is a normal state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    points: Vec<ForecastPoint>,
    fit: Option<TrendFit>,
}

impl ForecastResult {
    pub fn new(points: Vec<ForecastPoint>, fit: Option<TrendFit>) -> Self {
        Self { points, fit }
    }

    /// No forecast available
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get the forecasted values
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.predicted_price).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// The fitted trend behind the projection
    pub fn fit(&self) -> Option<&TrendFit> {
        self.fit.as_ref()
    }

    /// Total projected spend over the horizon
    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.predicted_price).sum()
    }

    /// Mean projected spend per day, `None` for an empty forecast
    pub fn daily_average(&self) -> Option<f64> {
        if self.points.is_empty() {
            None
        } else {
            Some(self.total() / self.points.len() as f64)
        }
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Project `horizon` days past the last observation
    fn forecast(&self, horizon: usize) -> Result<ForecastResult>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on spend history
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on spend history
    fn train(&self, history: &SpendHistory) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}
