//! # Petrol Dash
//!
//! Fuel spend analytics. This package re-exports the workspace libraries:
//!
//! - [`math`]: least-squares trend fitting and descriptive statistics
//! - [`analytics`]: loading, filtering, KPIs, insights, charts, export and
//!   the spend forecast
//!
//! ## Example
//!
//! ```
//! use petrol_dash_workspace::analytics::{calculate_kpis, predict, DataLoader};
//!
//! let table = DataLoader::from_csv_str(
//!     "Date,Station,Price,Litres\n\
//!      2023-01-01,Shell,100,5\n\
//!      2023-01-11,Shell,150,7.5\n\
//!      2023-01-21,BP,200,10\n",
//! )
//! .unwrap();
//!
//! let kpis = calculate_kpis(&table);
//! assert_eq!(kpis.total_visits, 3);
//! assert_eq!(kpis.avg_price_per_litre, 20.0);
//!
//! let forecast = predict(&table, 30);
//! assert_eq!(forecast.len(), 30);
//! assert!((forecast.values()[0] - 205.0).abs() < 1e-9);
//! ```

pub use petrol_analytics as analytics;
pub use petrol_math as math;
