use chrono::NaiveDate;
use petrol_analytics::data::columns;
use petrol_analytics::{AnalyticsError, DataLoader};
use polars::prelude::DataType;
use pretty_assertions::assert_eq;
use rust_xlsxwriter::{Format, Workbook};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, NamedTempFile};

fn csv_file(lines: &[&str]) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file
}

#[test]
fn test_load_normalizes_and_derives_columns() {
    let file = csv_file(&[
        " Date ,Station,Price,Litres,Liter Price,Notes",
        "2023-01-05,Shell,500,25,20,full tank",
        "2023-02-10,BP,520,26,,",
    ]);

    let outcome = DataLoader::load(file.path());
    assert!(outcome.is_loaded());

    let table = outcome.table;
    assert_eq!(table.len(), 2);
    for name in [
        columns::DATE,
        columns::STATION,
        columns::PRICE,
        columns::LITRES,
        columns::LITER_PRICE,
        columns::COST_PER_LITRE,
        columns::YEAR,
        columns::MONTH_NAME,
        columns::MONTH_NUM,
        columns::QUARTER,
        "notes",
    ] {
        assert!(table.has_column(name), "missing column {name}");
    }

    assert_eq!(
        table.valid_dates(),
        vec![
            NaiveDate::from_ymd_opt(2023, 1, 5).unwrap(),
            NaiveDate::from_ymd_opt(2023, 2, 10).unwrap()
        ]
    );
    assert_eq!(table.i32_values(columns::QUARTER), Some(vec![Some(1), Some(1)]));
    assert_eq!(
        table.str_values(columns::MONTH_NAME),
        Some(vec![Some("January".to_string()), Some("February".to_string())])
    );
    // A supplied liter_price is kept as is
    assert_eq!(table.f64_values(columns::LITER_PRICE), Some(vec![Some(20.0), None]));
    assert_eq!(
        table.f64_values(columns::COST_PER_LITRE),
        Some(vec![Some(20.0), Some(20.0)])
    );
}

#[test]
fn test_unparseable_dates_become_empty() {
    let file = csv_file(&[
        "date,price,litres",
        "01/15/2023,100,5",
        "sometime,80,4",
        "2023-03-01 08:30:00,90,0",
    ]);

    let table = DataLoader::load(file.path()).table;

    assert_eq!(table.len(), 3);
    assert_eq!(
        table.dates(),
        Some(vec![
            NaiveDate::from_ymd_opt(2023, 1, 15),
            None,
            NaiveDate::from_ymd_opt(2023, 3, 1),
        ])
    );
    assert_eq!(table.i32_values(columns::YEAR), Some(vec![Some(2023), None, Some(2023)]));
    // Zero litres keeps the row with an undefined unit price
    assert_eq!(
        table.f64_values(columns::COST_PER_LITRE),
        Some(vec![Some(20.0), Some(20.0), None])
    );
}

// Excel serial day numbers for 2023-01-05 and 2023-02-10
const JAN_5_SERIAL: f64 = 44931.0;
const FEB_10_SERIAL: f64 = 44967.0;

// First sheet with padded headers, date-formatted cells, a blank date, a
// zero-litre row and two stray cells under blank headers
fn spend_workbook(dir: &Path) -> PathBuf {
    let path = dir.join("Spend.xlsx");
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let sheet = workbook.add_worksheet();
    for (col, header) in [" Date ", "Station", "Price", "Litres"].iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }

    sheet.write_number_with_format(1, 0, JAN_5_SERIAL, &date_format).unwrap();
    sheet.write_string(1, 1, "Shell").unwrap();
    sheet.write_number(1, 2, 500.0).unwrap();
    sheet.write_number(1, 3, 25.0).unwrap();
    sheet.write_string(1, 4, "full tank").unwrap();

    sheet.write_string(2, 1, "BP").unwrap();
    sheet.write_number(2, 2, 480.0).unwrap();
    sheet.write_number(2, 3, 24.0).unwrap();

    sheet.write_number_with_format(3, 0, FEB_10_SERIAL, &date_format).unwrap();
    sheet.write_string(3, 1, "Engen").unwrap();
    sheet.write_number(3, 2, 300.0).unwrap();
    sheet.write_number(3, 3, 0.0).unwrap();
    sheet.write_string(3, 5, "receipt lost").unwrap();

    workbook.save(&path).unwrap();
    path
}

#[test]
fn test_load_workbook() {
    let dir = tempdir().unwrap();
    let path = spend_workbook(dir.path());

    let outcome = DataLoader::load(&path);
    assert!(outcome.is_loaded(), "{:?}", outcome.message);

    let table = outcome.table;
    assert_eq!(table.len(), 3);
    assert_eq!(
        table.column_names(),
        vec![
            "date",
            "station",
            "price",
            "litres",
            "column_4",
            "column_5",
            "year",
            "month_name",
            "month_num",
            "quarter",
            "liter_price",
            "cost_per_litre",
        ]
    );

    assert_eq!(
        table.dates(),
        Some(vec![
            NaiveDate::from_ymd_opt(2023, 1, 5),
            None,
            NaiveDate::from_ymd_opt(2023, 2, 10),
        ])
    );
    assert_eq!(table.i32_values(columns::YEAR), Some(vec![Some(2023), None, Some(2023)]));
    assert_eq!(
        table.str_values(columns::MONTH_NAME),
        Some(vec![Some("January".to_string()), None, Some("February".to_string())])
    );
    assert_eq!(table.i32_values(columns::QUARTER), Some(vec![Some(1), None, Some(1)]));

    let price = table.dataframe().column(columns::PRICE).unwrap();
    assert_eq!(price.dtype(), &DataType::Float64);
    assert_eq!(table.defined_f64(columns::PRICE), vec![500.0, 480.0, 300.0]);
    assert_eq!(
        table.f64_values(columns::COST_PER_LITRE),
        Some(vec![Some(20.0), Some(20.0), None])
    );
    assert_eq!(
        table.str_values("column_5"),
        Some(vec![None, None, Some("receipt lost".to_string())])
    );
}

#[test]
fn test_missing_file_gives_message() {
    let outcome = DataLoader::load("no_such_dir/Spend.xlsx");

    assert!(!outcome.is_loaded());
    assert!(outcome.table.is_empty());
    let message = outcome.message.unwrap();
    assert!(message.starts_with("Error loading data from"));
    assert!(message.contains("Spend.xlsx"));
}

#[test]
fn test_unsupported_extension() {
    let file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    let result = DataLoader::from_path(file.path());
    assert!(matches!(result, Err(AnalyticsError::UnsupportedFormat(_))));
}

#[test]
fn test_corrupt_workbook_is_reported() {
    let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
    writeln!(file, "this is not a zip archive").unwrap();

    let outcome = DataLoader::load(file.path());
    assert!(outcome.table.is_empty());
    assert!(outcome.message.is_some());
}

#[test]
fn test_loading_twice_gives_equal_tables() {
    let file = csv_file(&["date,station,price,litres", "2023-01-05,Shell,500,25"]);

    let first = DataLoader::from_csv(file.path()).unwrap();
    let second = DataLoader::from_csv(file.path()).unwrap();
    assert_eq!(first, second);
}
