//! Spend forecasting at the dashboard boundary

use crate::data::{columns, FuelTable};
use crate::models::linear_trend::{LinearTrend, MIN_HISTORY_POINTS};
use crate::models::{ForecastModel, ForecastResult, SpendHistory, TrainedForecastModel};
use tracing::{debug, warn};

/// Days projected when no horizon is configured
pub const DEFAULT_HORIZON_DAYS: usize = 30;

/// Project spend `horizon_days` past the last dated purchase.
///
/// Returns an empty result when the table lacks dates or prices, or has fewer
/// than three rows with both. Fitting failures are logged and also yield an
/// empty result.
pub fn predict(table: &FuelTable, horizon_days: usize) -> ForecastResult {
    if table.is_empty() || !table.has_column(columns::DATE) || !table.has_column(columns::PRICE) {
        return ForecastResult::empty();
    }

    let history = SpendHistory::from_table(table);
    if history.len() < MIN_HISTORY_POINTS {
        debug!(
            observations = history.len(),
            required = MIN_HISTORY_POINTS,
            "Not enough dated purchases to forecast"
        );
        return ForecastResult::empty();
    }

    let model = LinearTrend::new();
    match model
        .train(&history)
        .and_then(|trained| trained.forecast(horizon_days))
    {
        Ok(forecast) => {
            debug!(
                model = model.name(),
                observations = history.len(),
                horizon = horizon_days,
                "Projected spend trend"
            );
            forecast
        }
        Err(err) => {
            warn!(error = %err, "Forecast unavailable");
            ForecastResult::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::DataLoader;
    use assert_approx_eq::assert_approx_eq;
    use chrono::{Duration, NaiveDate};

    fn table() -> FuelTable {
        DataLoader::from_csv_str(
            "date,price\n\
             2023-01-11,150\n\
             2023-01-01,100\n\
             ,999\n\
             2023-01-21,200\n",
        )
        .unwrap()
    }

    #[test]
    fn test_predict_shape() {
        let forecast = predict(&table(), DEFAULT_HORIZON_DAYS);
        let dates = forecast.dates();

        assert_eq!(forecast.len(), DEFAULT_HORIZON_DAYS);
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2023, 1, 22).unwrap());
        assert!(dates.windows(2).all(|w| w[1] - w[0] == Duration::days(1)));
        assert!(forecast.values().iter().all(|v| *v >= 0.0));
        assert_approx_eq!(forecast.values()[0], 205.0);
        assert_approx_eq!(forecast.fit().unwrap().slope, 5.0);
    }

    #[test]
    fn test_too_little_data_is_empty() {
        let two_rows =
            DataLoader::from_csv_str("date,price\n2023-01-01,1\n2023-01-02,2\n").unwrap();
        assert!(predict(&two_rows, 30).is_empty());

        let no_price =
            DataLoader::from_csv_str("date\n2023-01-01\n2023-01-02\n2023-01-03\n").unwrap();
        assert!(predict(&no_price, 30).is_empty());

        assert!(predict(&FuelTable::empty(), 30).is_empty());
    }

    #[test]
    fn test_zero_horizon() {
        assert!(predict(&table(), 0).is_empty());
    }
}
