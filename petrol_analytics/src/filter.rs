//! Year / month / station filtering and the choices offered for each

use crate::data::{columns, FuelTable};
use crate::dates::{month_name, month_number};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Month selection meaning "no month restriction"
pub const ALL_MONTHS: &str = "All Months";
/// Station selection meaning "no station restriction"
pub const ALL_STATIONS: &str = "All Stations";

/// Conjunctive year / month / station selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub year: Option<i32>,
    pub month: Option<String>,
    pub station: Option<String>,
}

impl FilterCriteria {
    /// Criteria that keep every row
    pub fn new() -> Self {
        Self::default()
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn month(mut self, month: impl Into<String>) -> Self {
        self.month = Some(month.into());
        self
    }

    pub fn station(mut self, station: impl Into<String>) -> Self {
        self.station = Some(station.into());
        self
    }

    /// Month restriction, with the sentinel treated as none. Month names
    /// match in any case and are compared in their canonical form.
    fn month_restriction(&self) -> Option<&str> {
        self.month
            .as_deref()
            .filter(|m| *m != ALL_MONTHS)
            .map(|m| month_number(m).and_then(month_name).unwrap_or(m))
    }

    /// Station restriction, with the sentinel treated as none
    fn station_restriction(&self) -> Option<&str> {
        self.station.as_deref().filter(|s| *s != ALL_STATIONS)
    }

    /// True when no criterion restricts anything
    pub fn is_unrestricted(&self) -> bool {
        self.year.is_none()
            && self.month_restriction().is_none()
            && self.station_restriction().is_none()
    }

    /// Apply the criteria, returning a new table in source row order.
    ///
    /// A criterion whose column is missing is ignored, and rows with an empty
    /// cell in a restricted column never match.
    pub fn apply(&self, table: &FuelTable) -> Result<FuelTable> {
        let mut mask = vec![true; table.len()];

        if let (Some(year), Some(years)) = (self.year, table.i32_values(columns::YEAR)) {
            restrict(&mut mask, &years, |cell| *cell == Some(year));
        }

        if let (Some(month), Some(months)) =
            (self.month_restriction(), table.str_values(columns::MONTH_NAME))
        {
            restrict(&mut mask, &months, |cell| cell.as_deref() == Some(month));
        }

        if let (Some(station), Some(stations)) =
            (self.station_restriction(), table.str_values(columns::STATION))
        {
            restrict(&mut mask, &stations, |cell| cell.as_deref() == Some(station));
        }

        let filtered = table.retain(&mask)?;
        debug!(
            before = table.len(),
            after = filtered.len(),
            criteria = ?self,
            "Filtered fuel table"
        );
        Ok(filtered)
    }

    /// Apply the criteria, falling back to an empty table with the same
    /// columns should the frame operation fail
    pub fn apply_or_empty(&self, table: &FuelTable) -> FuelTable {
        self.apply(table).unwrap_or_else(|err| {
            warn!(error = %err, "Filtering failed, returning no rows");
            table.cleared()
        })
    }
}

fn restrict<T>(mask: &mut [bool], cells: &[T], matches: impl Fn(&T) -> bool) {
    for (keep, cell) in mask.iter_mut().zip(cells) {
        *keep = *keep && matches(cell);
    }
}

/// Filter a table by optional year, month and station.
///
/// Never fails: should the underlying frame operation error, the result is
/// an empty table with the same columns.
pub fn filter_data(
    table: &FuelTable,
    year: Option<i32>,
    month: Option<&str>,
    station: Option<&str>,
) -> FuelTable {
    let criteria = FilterCriteria {
        year,
        month: month.map(str::to_string),
        station: station.map(str::to_string),
    };

    criteria.apply_or_empty(table)
}

/// Choices a presentation layer offers for each filter dimension
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Distinct years, newest first
    pub years: Vec<i32>,
    /// [`ALL_MONTHS`] followed by month names in calendar order
    pub months: Vec<String>,
    /// [`ALL_STATIONS`] followed by station names sorted ascending
    pub stations: Vec<String>,
}

impl FilterOptions {
    /// Options over the whole table
    pub fn from_table(table: &FuelTable) -> Self {
        Self::for_year(table, None)
    }

    /// Options where the month list only covers `year` (when given).
    /// Stations always come from the whole table.
    pub fn for_year(table: &FuelTable, year: Option<i32>) -> Self {
        let years_col = table.i32_values(columns::YEAR);

        let years: BTreeSet<i32> = years_col
            .iter()
            .flatten()
            .flatten()
            .copied()
            .collect();

        let mut months: BTreeMap<i32, String> = BTreeMap::new();
        if let (Some(nums), Some(names)) = (
            table.i32_values(columns::MONTH_NUM),
            table.str_values(columns::MONTH_NAME),
        ) {
            for (idx, (num, name)) in nums.into_iter().zip(names).enumerate() {
                let in_year = match (year, &years_col) {
                    (Some(year), Some(col)) => col[idx] == Some(year),
                    _ => true,
                };
                if let (true, Some(num), Some(name)) = (in_year, num, name) {
                    months.entry(num).or_insert(name);
                }
            }
        }

        let stations: BTreeSet<String> = table
            .str_values(columns::STATION)
            .into_iter()
            .flatten()
            .flatten()
            .collect();

        Self {
            years: years.into_iter().rev().collect(),
            months: std::iter::once(ALL_MONTHS.to_string())
                .chain(months.into_values())
                .collect(),
            stations: std::iter::once(ALL_STATIONS.to_string())
                .chain(stations)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::DataLoader;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn table() -> FuelTable {
        DataLoader::from_csv_str(
            "Date,Station,Price,Litres\n\
             2023-01-05,Shell,500,25\n\
             2022-12-28,BP,450,22\n\
             2023-02-10,BP,520,26\n\
             not-a-date,Shell,480,24\n\
             2023-01-20,Engen,510,25.5\n",
        )
        .unwrap()
    }

    #[test]
    fn test_year_with_sentinels_keeps_year_rows_in_order() {
        let filtered = filter_data(&table(), Some(2023), Some(ALL_MONTHS), Some(ALL_STATIONS));
        assert_eq!(filtered.defined_f64("price"), vec![500.0, 520.0, 510.0]);
    }

    #[test]
    fn test_criteria_are_conjunctive() {
        let criteria = FilterCriteria::new().year(2023).month("January").station("Shell");
        let filtered = criteria.apply(&table()).unwrap();
        assert_eq!(filtered.defined_f64("price"), vec![500.0]);
    }

    #[rstest]
    #[case("January")]
    #[case("january")]
    #[case(" JANUARY ")]
    fn test_month_matches_in_any_case(#[case] month: &str) {
        let filtered = filter_data(&table(), Some(2023), Some(month), None);
        assert_eq!(filtered.defined_f64("price"), vec![500.0, 510.0]);
    }

    #[test]
    fn test_unknown_month_matches_nothing() {
        let filtered = filter_data(&table(), None, Some("Smarch"), None);
        assert!(filtered.is_empty());
        assert_eq!(filtered.column_names(), table().column_names());
    }

    #[test]
    fn test_apply_or_empty_matches_apply() {
        let source = table();
        let criteria = FilterCriteria::new().year(2022);

        let filtered = criteria.apply_or_empty(&source);
        assert_eq!(filtered, criteria.apply(&source).unwrap());
        assert_eq!(filtered.defined_f64("price"), vec![450.0]);
    }

    #[test]
    fn test_unrestricted_keeps_everything() {
        let source = table();
        let criteria = FilterCriteria::new().month(ALL_MONTHS).station(ALL_STATIONS);
        assert!(criteria.is_unrestricted());
        assert_eq!(criteria.apply(&source).unwrap(), source);
    }

    #[test]
    fn test_missing_column_is_ignored() {
        let source = DataLoader::from_csv_str("price,litres\n10,1\n20,2\n").unwrap();
        let filtered = filter_data(&source, Some(2023), Some("March"), Some("Shell"));
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_filter_is_idempotent_and_pure() {
        let source = table();
        let snapshot = source.clone();

        let once = filter_data(&source, Some(2023), None, Some("BP"));
        let twice = filter_data(&once, Some(2023), None, Some("BP"));

        assert_eq!(once, twice);
        assert_eq!(source, snapshot);
        assert_eq!(source.len(), 5);
    }

    #[test]
    fn test_filter_options() {
        let options = FilterOptions::from_table(&table());

        assert_eq!(options.years, vec![2023, 2022]);
        assert_eq!(options.months, vec!["All Months", "January", "February", "December"]);
        assert_eq!(options.stations, vec!["All Stations", "BP", "Engen", "Shell"]);

        let only_2022 = FilterOptions::for_year(&table(), Some(2022));
        assert_eq!(only_2022.months, vec!["All Months", "December"]);
    }
}
