//! Ordinary least squares trend fitting
//!
//! A single-feature closed-form fit of `y = slope * x + intercept` that
//! minimises the sum of squared residuals over the observed points.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Below this the predictor is treated as constant.
const VARIANCE_EPSILON: f64 = 1e-10;

/// Fitted single-feature linear regression
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    slope: f64,
    intercept: f64,
    observations: usize,
    ss_total: f64,
    ss_residual: f64,
}

impl LinearRegression {
    /// Fit the regression on paired observations.
    ///
    /// When every `x` is identical the system has no unique solution and the
    /// minimum-norm one is returned: a flat line through the mean of `y`.
    ///
    /// # Examples
    ///
    /// ```
    /// use petrol_math::LinearRegression;
    ///
    /// let fit = LinearRegression::fit(&[0.0, 10.0, 20.0], &[100.0, 150.0, 200.0]).unwrap();
    /// assert!((fit.slope() - 5.0).abs() < 1e-9);
    /// assert!((fit.predict(21.0) - 205.0).abs() < 1e-9);
    /// ```
    pub fn fit(xs: &[f64], ys: &[f64]) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(MathError::InvalidInput(format!(
                "Predictor and response lengths differ ({} vs {})",
                xs.len(),
                ys.len()
            )));
        }

        if xs.len() < 2 {
            return Err(MathError::InsufficientData(format!(
                "Need at least 2 points for linear regression, have {}",
                xs.len()
            )));
        }

        if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(
                "Regression inputs must be finite".to_string(),
            ));
        }

        let n = xs.len() as f64;
        let x_mean = xs.iter().sum::<f64>() / n;
        let y_mean = ys.iter().sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;

        for (&x, &y) in xs.iter().zip(ys.iter()) {
            numerator += (x - x_mean) * (y - y_mean);
            denominator += (x - x_mean) * (x - x_mean);
        }

        let slope = if denominator.abs() < VARIANCE_EPSILON {
            0.0
        } else {
            numerator / denominator
        };
        let intercept = y_mean - slope * x_mean;

        if !slope.is_finite() || !intercept.is_finite() {
            return Err(MathError::CalculationError(
                "Regression coefficients are not finite".to_string(),
            ));
        }

        let mut ss_total = 0.0;
        let mut ss_residual = 0.0;
        for (&x, &y) in xs.iter().zip(ys.iter()) {
            let y_pred = slope * x + intercept;
            ss_total += (y - y_mean).powi(2);
            ss_residual += (y - y_pred).powi(2);
        }

        Ok(Self {
            slope,
            intercept,
            observations: xs.len(),
            ss_total,
            ss_residual,
        })
    }

    /// Predict the response for a single predictor value
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Predict the response for each predictor value, in order
    pub fn predict_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.predict(x)).collect()
    }

    /// Change in the response per unit of the predictor
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Response at `x = 0`
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Number of points the line was fitted on
    pub fn observations(&self) -> usize {
        self.observations
    }

    /// Get the R-squared value (coefficient of determination)
    pub fn r_squared(&self) -> Result<f64> {
        if self.ss_total.abs() < VARIANCE_EPSILON {
            return Err(MathError::CalculationError(
                "Cannot calculate R-squared: total sum of squares is too small".to_string(),
            ));
        }

        Ok(1.0 - (self.ss_residual / self.ss_total))
    }
}
