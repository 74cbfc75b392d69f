//! CSV and JSON export of a (filtered) fuel table

use crate::data::{series_dates, FuelTable};
use crate::error::{AnalyticsError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// Prefix of generated export file names
pub const DEFAULT_EXPORT_PREFIX: &str = "petrol_data";

/// Supported export encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(AnalyticsError::InvalidParameter(format!(
                "Unknown export format '{}' (expected csv or json)",
                other
            ))),
        }
    }
}

/// Serialize every row and column as CSV with a header line
pub fn to_csv_string(table: &FuelTable) -> Result<String> {
    let mut df = table.dataframe().clone();
    let mut buf: Vec<u8> = Vec::new();
    CsvWriter::new(&mut buf).has_header(true).finish(&mut df)?;

    String::from_utf8(buf).map_err(|err| AnalyticsError::SerializationError(err.to_string()))
}

/// Serialize the table as a JSON array of records. Dates are ISO
/// `YYYY-MM-DD` strings and undefined cells are `null`.
pub fn to_json_string(table: &FuelTable) -> Result<String> {
    let df = table.dataframe();
    let names = table.column_names();

    let columns = names
        .iter()
        .map(|name| column_json(df.column(name)?))
        .collect::<Result<Vec<_>>>()?;

    let records: Vec<Value> = (0..table.len())
        .map(|row| {
            let record: Map<String, Value> = names
                .iter()
                .zip(&columns)
                .map(|(name, values)| (name.clone(), values[row].clone()))
                .collect();
            Value::Object(record)
        })
        .collect();

    Ok(serde_json::to_string_pretty(&records)?)
}

/// Serialize in the requested format
pub fn export_string(table: &FuelTable, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Csv => to_csv_string(table),
        ExportFormat::Json => to_json_string(table),
    }
}

fn column_json(series: &Series) -> Result<Vec<Value>> {
    let values = match series.dtype() {
        DataType::Date | DataType::Datetime(_, _) => series_dates(series)?
            .into_iter()
            .map(|d| {
                d.map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
                    .unwrap_or(Value::Null)
            })
            .collect(),
        DataType::Boolean => series
            .bool()?
            .into_iter()
            .map(|b| b.map(Value::Bool).unwrap_or(Value::Null))
            .collect(),
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32 => series
            .cast(&DataType::Int64)?
            .i64()?
            .into_iter()
            .map(|v| v.map(Value::from).unwrap_or(Value::Null))
            .collect(),
        DataType::Float32 | DataType::Float64 | DataType::UInt64 => series
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| v.and_then(Number::from_f64).map(Value::Number).unwrap_or(Value::Null))
            .collect(),
        _ => series
            .cast(&DataType::Utf8)?
            .utf8()?
            .into_iter()
            .map(|v| v.map(|s| Value::String(s.to_string())).unwrap_or(Value::Null))
            .collect(),
    };
    Ok(values)
}

/// `<prefix>_<YYYYMMDD>.<ext>` keyed on the earliest date, or
/// `<prefix>_export.<ext>` when the table has no dates
pub fn export_file_name(table: &FuelTable, prefix: &str, format: ExportFormat) -> String {
    let stamp = table
        .valid_dates()
        .into_iter()
        .min()
        .map(|d| d.format("%Y%m%d").to_string())
        .unwrap_or_else(|| "export".to_string());

    format!("{}_{}.{}", prefix, stamp, format.extension())
}

/// Write the table into `dir` under its default export name
pub fn write_export<P: AsRef<Path>>(
    table: &FuelTable,
    format: ExportFormat,
    dir: P,
    prefix: &str,
) -> Result<PathBuf> {
    let path = dir.as_ref().join(export_file_name(table, prefix, format));
    write_export_to(table, format, &path)?;
    Ok(path)
}

/// Write the table to an explicit path
pub fn write_export_to<P: AsRef<Path>>(
    table: &FuelTable,
    format: ExportFormat,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let contents = export_string(table, format)?;
    std::fs::write(path, contents)?;

    info!(path = %path.display(), rows = table.len(), %format, "Exported fuel table");
    Ok(())
}
