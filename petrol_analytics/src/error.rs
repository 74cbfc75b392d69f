//! Error types for the petrol_analytics crate

use petrol_math::MathError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the petrol_analytics crate
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// The source file extension is not a supported spreadsheet format
    #[error("Unsupported source format: {0}")]
    UnsupportedFormat(String),

    /// Error related to forecasting operations
    #[error("Forecasting error: {0}")]
    ForecastingError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from invalid or unreadable configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Error from mathematical operations
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error from reading a workbook
    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(String),

    /// Error from serializing exports
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, AnalyticsError>;

impl From<PolarsError> for AnalyticsError {
    fn from(err: PolarsError) -> Self {
        AnalyticsError::PolarsError(err.to_string())
    }
}

impl From<calamine::Error> for AnalyticsError {
    fn from(err: calamine::Error) -> Self {
        AnalyticsError::SpreadsheetError(err.to_string())
    }
}

impl From<serde_json::Error> for AnalyticsError {
    fn from(err: serde_json::Error) -> Self {
        AnalyticsError::SerializationError(err.to_string())
    }
}

impl From<toml::de::Error> for AnalyticsError {
    fn from(err: toml::de::Error) -> Self {
        AnalyticsError::Config(err.to_string())
    }
}
