//! Descriptive statistics over already-filtered observations
//!
//! Every function skips non-finite values, and returns `None` where the
//! statistic is undefined instead of producing NaN.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

fn finite(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}

/// Arithmetic mean, `None` for an empty input
pub fn mean(values: &[f64]) -> Option<f64> {
    let values = finite(values);
    if values.is_empty() {
        return None;
    }
    Some(values.iter().mean())
}

/// Sample standard deviation (n - 1 denominator), `None` below two values
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    let values = finite(values);
    if values.len() < 2 {
        return None;
    }
    Some(values.iter().std_dev())
}

/// One-pass summary of a numeric column
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
    /// Number of finite observations
    pub count: usize,
    /// Sum of the observations, zero when empty
    pub sum: f64,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Summary {
    /// Summarise the finite values of a slice
    pub fn of(values: &[f64]) -> Self {
        let values = finite(values);
        if values.is_empty() {
            return Self::default();
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self {
            count: values.len(),
            sum: values.iter().sum(),
            mean: mean(&values),
            std_dev: sample_std_dev(&values),
            min: Some(min),
            max: Some(max),
        }
    }
}
