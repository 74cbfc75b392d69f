//! The in-memory fuel transaction table

use crate::dates::{from_epoch_days, parse_date};
use crate::error::Result;
use chrono::NaiveDate;
use polars::prelude::*;

/// Normalized column names the analytics understand
pub mod columns {
    pub const DATE: &str = "date";
    pub const STATION: &str = "station";
    pub const PRICE: &str = "price";
    pub const LITRES: &str = "litres";
    pub const LITER_PRICE: &str = "liter_price";
    pub const COST_PER_LITRE: &str = "cost_per_litre";
    pub const YEAR: &str = "year";
    pub const MONTH_NAME: &str = "month_name";
    pub const MONTH_NUM: &str = "month_num";
    pub const QUARTER: &str = "quarter";
}

/// Fuel purchase table: one row per purchase.
///
/// Cloning is cheap (columns are reference counted) and every operation that
/// narrows or extends the table returns a new value.
#[derive(Debug, Clone, Default)]
pub struct FuelTable {
    /// Data frame holding the normalized columns
    df: DataFrame,
}

impl FuelTable {
    /// Wrap a data frame whose columns are already normalized
    pub fn new(df: DataFrame) -> Self {
        Self { df }
    }

    /// A table with no rows and no columns
    pub fn empty() -> Self {
        Self::default()
    }

    /// Get the DataFrame
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.df.height()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Column names in table order
    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        has_column(&self.df, name)
    }

    /// Column values as decimals. Non-numeric and non-finite cells are `None`;
    /// the outer `None` means the column is missing.
    pub fn f64_values(&self, name: &str) -> Option<Vec<Option<f64>>> {
        column_f64(&self.df, name).ok()
    }

    /// Column values as text
    pub fn str_values(&self, name: &str) -> Option<Vec<Option<String>>> {
        column_str(&self.df, name).ok()
    }

    /// Column values as integers
    pub fn i32_values(&self, name: &str) -> Option<Vec<Option<i32>>> {
        column_i32(&self.df, name).ok()
    }

    /// The date column, with unparseable cells as `None`
    pub fn dates(&self) -> Option<Vec<Option<NaiveDate>>> {
        let series = self.df.column(columns::DATE).ok()?;
        series_dates(series).ok()
    }

    /// Non-null dates in row order
    pub fn valid_dates(&self) -> Vec<NaiveDate> {
        self.dates()
            .map(|dates| dates.into_iter().flatten().collect())
            .unwrap_or_default()
    }

    /// Defined values of a numeric column in row order
    pub fn defined_f64(&self, name: &str) -> Vec<f64> {
        self.f64_values(name)
            .map(|values| values.into_iter().flatten().collect())
            .unwrap_or_default()
    }

    /// Keep the rows whose mask entry is `true`, preserving order
    pub fn retain(&self, mask: &[bool]) -> Result<Self> {
        let mask = BooleanChunked::from_slice("mask", mask);
        Ok(Self {
            df: self.df.filter(&mask)?,
        })
    }

    /// A table with the same columns and no rows
    pub fn cleared(&self) -> Self {
        Self {
            df: self.df.slice(0, 0),
        }
    }
}

impl PartialEq for FuelTable {
    fn eq(&self, other: &Self) -> bool {
        let names = self.column_names();
        names == other.column_names()
            && self.len() == other.len()
            && names
                .iter()
                .all(|name| self.str_values(name) == other.str_values(name))
    }
}

pub(crate) fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().contains(&name)
}

pub(crate) fn column_f64(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let series = df.column(name)?.cast(&DataType::Float64)?;
    let values = series
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect();
    Ok(values)
}

pub(crate) fn column_str(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let series = df.column(name)?.cast(&DataType::Utf8)?;
    let values = series
        .utf8()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}

pub(crate) fn column_i32(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<i32>>> {
    let series = df.column(name)?.cast(&DataType::Int32)?;
    let values = series.i32()?.into_iter().collect();
    Ok(values)
}

/// Read a column as calendar dates: native date columns are converted directly,
/// anything else is parsed cell by cell from its text form.
pub(crate) fn series_dates(series: &Series) -> PolarsResult<Vec<Option<NaiveDate>>> {
    match series.dtype() {
        DataType::Date | DataType::Datetime(_, _) => {
            let days = series.cast(&DataType::Date)?.cast(&DataType::Int32)?;
            let dates = days
                .i32()?
                .into_iter()
                .map(|d| d.and_then(from_epoch_days))
                .collect();
            Ok(dates)
        }
        _ => {
            let text = series.cast(&DataType::Utf8)?;
            let dates = text
                .utf8()?
                .into_iter()
                .map(|v| v.and_then(parse_date))
                .collect();
            Ok(dates)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FuelTable {
        let df = DataFrame::new(vec![
            Series::new("station", &["Shell", "BP", "Shell"]),
            Series::new("price", &[Some(100.0), None, Some(f64::INFINITY)]),
            Series::new("litres", &[40_i64, 20, 30]),
        ])
        .unwrap();
        FuelTable::new(df)
    }

    #[test]
    fn test_accessors() {
        let table = sample();

        assert_eq!(table.len(), 3);
        assert!(!table.is_empty());
        assert!(table.has_column("price"));
        assert!(!table.has_column("date"));
        assert_eq!(table.column_names(), vec!["station", "price", "litres"]);
        assert_eq!(table.f64_values("price"), Some(vec![Some(100.0), None, None]));
        assert_eq!(table.defined_f64("litres"), vec![40.0, 20.0, 30.0]);
        assert_eq!(table.f64_values("missing"), None);
        assert_eq!(
            table.str_values("station"),
            Some(vec![
                Some("Shell".to_string()),
                Some("BP".to_string()),
                Some("Shell".to_string())
            ])
        );
        assert!(table.dates().is_none());
        assert!(table.valid_dates().is_empty());
    }

    #[test]
    fn test_retain_preserves_order_and_source() {
        let table = sample();
        let kept = table.retain(&[true, false, true]).unwrap();

        assert_eq!(kept.len(), 2);
        assert_eq!(kept.defined_f64("litres"), vec![40.0, 30.0]);
        assert_eq!(table.len(), 3);
        assert_eq!(table, sample());
    }

    #[test]
    fn test_cleared_keeps_schema() {
        let cleared = sample().cleared();
        assert!(cleared.is_empty());
        assert_eq!(cleared.column_names(), sample().column_names());
    }

    #[test]
    fn test_text_dates_are_parsed() {
        let series = Series::new("date", &[Some("2023-01-05"), Some("garbage"), None]);
        let dates = series_dates(&series).unwrap();
        assert_eq!(
            dates,
            vec![Some(NaiveDate::from_ymd_opt(2023, 1, 5).unwrap()), None, None]
        );
    }
}
