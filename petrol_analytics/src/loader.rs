//! Spreadsheet loading and column normalization
//!
//! The loader turns a CSV file or the first sheet of a workbook into a
//! [`FuelTable`] with normalized headers and derived calendar / unit price
//! columns. [`DataLoader::load`] is the boundary used by the dashboard: it
//! never fails, and reports problems through [`LoadOutcome::message`].

use crate::data::{column_f64, columns, has_column, series_dates, FuelTable};
use crate::dates::{month_name, quarter, to_epoch_days};
use crate::error::{AnalyticsError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::Datelike;
use polars::prelude::*;
use std::collections::HashSet;
use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info, warn};

/// Result of loading a source at the dashboard boundary
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    /// Loaded table, empty when loading failed
    pub table: FuelTable,
    /// User-visible explanation when nothing could be loaded
    pub message: Option<String>,
}

impl LoadOutcome {
    fn loaded(table: FuelTable) -> Self {
        Self {
            table,
            message: None,
        }
    }

    fn failed(message: String) -> Self {
        Self {
            table: FuelTable::empty(),
            message: Some(message),
        }
    }

    /// True when the source was read successfully
    pub fn is_loaded(&self) -> bool {
        self.message.is_none()
    }
}

/// Data loader for fuel purchase spreadsheets
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a spreadsheet, degrading to an empty table with a message on failure
    pub fn load<P: AsRef<Path>>(path: P) -> LoadOutcome {
        let path = path.as_ref();
        match Self::from_path(path) {
            Ok(table) => {
                info!(
                    path = %path.display(),
                    rows = table.len(),
                    columns = table.column_names().len(),
                    "Loaded fuel transactions"
                );
                LoadOutcome::loaded(table)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Failed to load fuel transactions");
                LoadOutcome::failed(format!(
                    "Error loading data from {}: {}",
                    path.display(),
                    err
                ))
            }
        }
    }

    /// Load a spreadsheet, choosing the reader from the file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<FuelTable> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" | "txt" => Self::from_csv(path),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Self::from_excel(path),
            other => Err(AnalyticsError::UnsupportedFormat(format!(
                "'{}' (expected csv, xlsx, xls or ods)",
                other
            ))),
        }
    }

    /// Load transactions from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<FuelTable> {
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Self::from_dataframe(df)
    }

    /// Load transactions from CSV text held in memory
    pub fn from_csv_str(text: &str) -> Result<FuelTable> {
        let cursor = Cursor::new(text.as_bytes().to_vec());
        let df = CsvReader::new(cursor)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Self::from_dataframe(df)
    }

    /// Load transactions from the first sheet of a workbook (xlsx, xls, ods)
    pub fn from_excel<P: AsRef<Path>>(path: P) -> Result<FuelTable> {
        let mut workbook = open_workbook_auto(path.as_ref())?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| AnalyticsError::DataError("Workbook has no sheets".to_string()))??;

        let mut rows = range.rows();
        let header = rows
            .next()
            .ok_or_else(|| AnalyticsError::DataError("Worksheet is empty".to_string()))?;
        let body: Vec<&[Data]> = rows.collect();

        let series = header
            .iter()
            .enumerate()
            .map(|(idx, cell)| {
                let cells: Vec<Option<&Data>> = body.iter().map(|row| row.get(idx)).collect();
                cells_to_series(&header_name(idx, &cell.to_string()), &cells)
            })
            .collect::<Vec<_>>();

        let df = DataFrame::new(series)?;
        Self::from_dataframe(df)
    }

    /// Normalize an existing DataFrame and derive the computed columns
    pub fn from_dataframe(mut df: DataFrame) -> Result<FuelTable> {
        normalize_headers(&mut df)?;

        if has_column(&df, columns::DATE) {
            derive_calendar(&mut df)?;
        }

        coerce_columns(&mut df)?;

        if has_column(&df, columns::PRICE) && has_column(&df, columns::LITRES) {
            derive_unit_price(&mut df)?;
        }

        debug!(rows = df.height(), columns = df.width(), "Normalized fuel table");
        Ok(FuelTable::new(df))
    }
}

/// Trim, lower-case and underscore a raw header
pub fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Normalized header, or `column_<idx>` when the cell is blank
pub fn header_name(idx: usize, raw: &str) -> String {
    let name = normalize_header(raw);
    if name.is_empty() {
        format!("column_{idx}")
    } else {
        name
    }
}

fn normalize_headers(df: &mut DataFrame) -> Result<()> {
    let names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .enumerate()
        .map(|(idx, name)| header_name(idx, name))
        .collect();

    let mut seen = HashSet::new();
    if let Some(duplicate) = names.iter().find(|name| !seen.insert(name.as_str())) {
        return Err(AnalyticsError::DataError(format!(
            "Duplicate column '{}' after normalizing headers",
            duplicate
        )));
    }

    df.set_column_names(&names)?;
    Ok(())
}

fn derive_calendar(df: &mut DataFrame) -> Result<()> {
    let dates = series_dates(df.column(columns::DATE)?)?;

    let unparsed = dates.iter().filter(|d| d.is_none()).count();
    if unparsed > 0 {
        debug!(unparsed, "Date cells could not be parsed and were left empty");
    }

    let days: Vec<Option<i32>> = dates.iter().map(|d| d.map(to_epoch_days)).collect();
    let years: Vec<Option<i32>> = dates.iter().map(|d| d.map(|d| d.year())).collect();
    let month_names: Vec<Option<&str>> = dates
        .iter()
        .map(|d| d.and_then(|d| month_name(d.month())))
        .collect();
    let month_nums: Vec<Option<i32>> = dates.iter().map(|d| d.map(|d| d.month() as i32)).collect();
    let quarters: Vec<Option<i32>> = dates.iter().map(|d| d.map(|d| quarter(d) as i32)).collect();

    df.with_column(Series::new(columns::DATE, days).cast(&DataType::Date)?)?;
    df.with_column(Series::new(columns::YEAR, years))?;
    df.with_column(Series::new(columns::MONTH_NAME, month_names))?;
    df.with_column(Series::new(columns::MONTH_NUM, month_nums))?;
    df.with_column(Series::new(columns::QUARTER, quarters))?;
    Ok(())
}

fn coerce_columns(df: &mut DataFrame) -> Result<()> {
    for name in [columns::PRICE, columns::LITRES, columns::LITER_PRICE] {
        if has_column(df, name) {
            let numeric = df.column(name)?.cast(&DataType::Float64)?;
            df.with_column(numeric)?;
        }
    }

    if has_column(df, columns::STATION) {
        let text = df.column(columns::STATION)?.cast(&DataType::Utf8)?;
        df.with_column(text)?;
    }
    Ok(())
}

/// Price per litre, undefined when litres is zero or missing
pub fn unit_price(price: Option<f64>, litres: Option<f64>) -> Option<f64> {
    let (price, litres) = (price?, litres?);
    if litres == 0.0 {
        return None;
    }
    Some(price / litres).filter(|v| v.is_finite())
}

fn derive_unit_price(df: &mut DataFrame) -> Result<()> {
    let prices = column_f64(df, columns::PRICE)?;
    let litres = column_f64(df, columns::LITRES)?;

    let per_litre: Vec<Option<f64>> = prices
        .into_iter()
        .zip(litres)
        .map(|(p, l)| unit_price(p, l))
        .collect();

    let undefined = per_litre.iter().filter(|v| v.is_none()).count();
    if undefined > 0 {
        debug!(undefined, "Rows without a defined cost per litre");
    }

    if !has_column(df, columns::LITER_PRICE) {
        df.with_column(Series::new(columns::LITER_PRICE, per_litre.clone()))?;
    }
    df.with_column(Series::new(columns::COST_PER_LITRE, per_litre))?;
    Ok(())
}

/// Workbook columns become decimals when every filled cell is a number and
/// text otherwise; workbook dates are rendered as ISO date-times.
fn cells_to_series(name: &str, cells: &[Option<&Data>]) -> Series {
    let numeric = cells.iter().all(|cell| {
        matches!(
            cell,
            None | Some(Data::Empty) | Some(Data::Int(_)) | Some(Data::Float(_))
        )
    });

    if numeric {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|cell| match cell {
                Some(Data::Int(i)) => Some(*i as f64),
                Some(Data::Float(f)) => Some(*f),
                _ => None,
            })
            .collect();
        return Series::new(name, values);
    }

    let values: Vec<Option<String>> = cells
        .iter()
        .map(|cell| match cell {
            None | Some(Data::Empty) => None,
            Some(Data::DateTime(dt)) => dt
                .as_datetime()
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string()),
            Some(other) => Some(other.to_string()),
        })
        .collect();
    Series::new(name, values)
}
