//! # Petrol Analytics
//!
//! Fuel purchase analytics: load a spreadsheet of fuel purchases, filter it by
//! year, month and station, and compute the figures a spend dashboard shows.
//!
//! ## Features
//!
//! - CSV and workbook (xlsx, xls, ods) loading with header normalization
//! - Derived calendar columns and price per litre
//! - Year / month / station filtering with "All" sentinels
//! - KPIs, natural-language insights and chart series
//! - A linear trend forecast of daily spend
//! - CSV and JSON export
//!
//! ## Quick Start
//!
//! ```no_run
//! use petrol_analytics::filter::{filter_data, ALL_MONTHS, ALL_STATIONS};
//! use petrol_analytics::{calculate_kpis, get_insights, predict, DataLoader};
//!
//! // Load data; failures give an empty table and a message
//! let outcome = DataLoader::load("Spend.xlsx");
//! if let Some(message) = &outcome.message {
//!     eprintln!("{message}");
//! }
//!
//! // Narrow to one year
//! let table = filter_data(&outcome.table, Some(2023), Some(ALL_MONTHS), Some(ALL_STATIONS));
//!
//! let kpis = calculate_kpis(&table);
//! println!("Spent {:.2} over {} visits", kpis.total_spent, kpis.total_visits);
//!
//! for line in get_insights(&table) {
//!     println!("{line}");
//! }
//!
//! // Project the next 30 days
//! let forecast = predict(&table, 30);
//! println!("Expected spend: {:.2}", forecast.total());
//! ```

pub mod cache;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod dates;
pub mod error;
pub mod export;
pub mod filter;
pub mod forecast;
pub mod insights;
pub mod loader;
pub mod metrics;
pub mod models;

// Re-export commonly used types
pub use crate::cache::DataCache;
pub use crate::config::DashboardConfig;
pub use crate::dashboard::{Dashboard, DashboardSnapshot};
pub use crate::data::FuelTable;
pub use crate::error::{AnalyticsError, Result};
pub use crate::filter::{filter_data, FilterCriteria, FilterOptions};
pub use crate::forecast::predict;
pub use crate::insights::{generate_insights, get_insights, Insight};
pub use crate::loader::{DataLoader, LoadOutcome};
pub use crate::metrics::{calculate_kpis, DatasetSummary, Kpis};
pub use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
