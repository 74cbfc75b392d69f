//! Linear spend trend over elapsed days

use crate::dates::following_days;
use crate::error::{AnalyticsError, Result};
use crate::models::{
    ForecastModel, ForecastPoint, ForecastResult, SpendHistory, TrainedForecastModel, TrendFit,
};
use chrono::NaiveDate;
use petrol_math::LinearRegression;

/// Fewest dated spend observations a trend is fitted on
pub const MIN_HISTORY_POINTS: usize = 3;

/// Ordinary least squares trend of spend against days since the first purchase
#[derive(Debug, Clone)]
pub struct LinearTrend {
    /// Name of the model
    name: String,
    /// Minimum number of observations
    min_points: usize,
}

/// Trained linear trend
#[derive(Debug, Clone)]
pub struct TrainedLinearTrend {
    /// Name of the model
    name: String,
    /// Fitted spend-per-day line
    regression: LinearRegression,
    /// Elapsed days of the last observation
    last_day: i64,
    last_date: NaiveDate,
}

impl LinearTrend {
    pub fn new() -> Self {
        Self::with_min_points(MIN_HISTORY_POINTS)
    }

    /// A trend that requires at least `min_points` observations (never fewer than 2)
    pub fn with_min_points(min_points: usize) -> Self {
        Self {
            name: "Linear Trend (OLS on elapsed days)".to_string(),
            min_points: min_points.max(2),
        }
    }

    pub fn min_points(&self) -> usize {
        self.min_points
    }
}

impl Default for LinearTrend {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastModel for LinearTrend {
    type Trained = TrainedLinearTrend;

    fn train(&self, history: &SpendHistory) -> Result<Self::Trained> {
        if history.len() < self.min_points {
            return Err(AnalyticsError::ForecastingError(format!(
                "Insufficient data for a trend. Need at least {} dated purchases, have {}.",
                self.min_points,
                history.len()
            )));
        }

        let days = history.elapsed_days();
        let regression = LinearRegression::fit(&days, &history.amounts())?;

        let last_day = days.last().copied().unwrap_or_default() as i64;
        let last_date = history.last_date().ok_or_else(|| {
            AnalyticsError::ForecastingError("Spend history has no dates".to_string())
        })?;

        Ok(TrainedLinearTrend {
            name: self.name.clone(),
            regression,
            last_day,
            last_date,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedLinearTrend {
    pub fn fit(&self) -> TrendFit {
        TrendFit {
            slope: self.regression.slope(),
            intercept: self.regression.intercept(),
            r_squared: self.regression.r_squared().ok(),
            observations: self.regression.observations(),
        }
    }
}

impl TrainedForecastModel for TrainedLinearTrend {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        let dates = following_days(self.last_date, horizon);
        if dates.len() != horizon {
            return Err(AnalyticsError::ForecastingError(format!(
                "Horizon of {} days runs past the supported calendar",
                horizon
            )));
        }

        let days: Vec<f64> = (1..=horizon as i64)
            .map(|offset| (self.last_day + offset) as f64)
            .collect();

        let points = dates
            .into_iter()
            .zip(self.regression.predict_many(&days))
            .map(|(date, predicted)| ForecastPoint {
                date,
                // Spending cannot be negative.
                predicted_price: predicted.max(0.0),
            })
            .collect();

        Ok(ForecastResult::new(points, Some(self.fit())))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn history(points: &[(u32, f64)]) -> SpendHistory {
        SpendHistory::new(
            points
                .iter()
                .map(|(day, amount)| (ymd(2023, 1, 1 + day), *amount))
                .collect(),
        )
    }

    #[test]
    fn test_exact_trend_projection() {
        let trained = LinearTrend::new()
            .train(&history(&[(0, 100.0), (10, 150.0), (20, 200.0)]))
            .unwrap();

        let fit = trained.fit();
        assert_approx_eq!(fit.slope, 5.0);
        assert_approx_eq!(fit.intercept, 100.0);
        assert_eq!(fit.observations, 3);

        let forecast = trained.forecast(5).unwrap();
        assert_eq!(forecast.len(), 5);
        assert_eq!(forecast.dates()[0], ymd(2023, 1, 22));
        assert_approx_eq!(forecast.values()[0], 205.0);
        assert_approx_eq!(forecast.values()[4], 225.0);
    }

    #[test]
    fn test_negative_projection_is_clamped() {
        let trained = LinearTrend::new()
            .train(&history(&[(0, 300.0), (1, 200.0), (2, 100.0)]))
            .unwrap();

        let values = trained.forecast(4).unwrap().values();
        assert_approx_eq!(values[0], 0.0);
        assert!(values.iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn test_insufficient_history() {
        let result = LinearTrend::new().train(&history(&[(0, 100.0), (1, 120.0)]));
        assert!(matches!(result, Err(AnalyticsError::ForecastingError(_))));
    }

    #[test]
    fn test_same_day_history_projects_mean() {
        let trained = LinearTrend::new()
            .train(&history(&[(3, 90.0), (3, 110.0), (3, 100.0)]))
            .unwrap();

        let forecast = trained.forecast(2).unwrap();
        assert_eq!(forecast.dates(), vec![ymd(2023, 1, 5), ymd(2023, 1, 6)]);
        assert_approx_eq!(forecast.values()[1], 100.0);
    }

    #[test]
    fn test_min_points_floor() {
        assert_eq!(LinearTrend::with_min_points(0).min_points(), 2);
        assert_eq!(LinearTrend::default().min_points(), MIN_HISTORY_POINTS);
    }
}
