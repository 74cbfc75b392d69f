//! # Petrol Math
//!
//! Numerical building blocks for fuel spend analytics.
//! This crate provides an ordinary least squares trend fit and the
//! descriptive statistics used by the KPI and insight calculations.

use thiserror::Error;

pub mod descriptive;
pub mod regression;

pub use descriptive::{mean, sample_std_dev, Summary};
pub use regression::LinearRegression;

/// Errors that can occur in numerical calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for numerical operations
pub type Result<T> = std::result::Result<T, MathError>;
