//! Cleaned CSV snapshot loading.
//!
//! Reads the two files produced by the (external) cleaning stage:
//!   - the asylum flow table, one `FlowRecord` per row,
//!   - the population table, wide format with one column per year, pivoted
//!     here into long-format `PopulationRecord`s.
//!
//! Header validation happens before any row is touched: a missing required
//! column is fatal and surfaces as `AnalyticsError::MissingColumn` with no
//! partial output. Cell-level problems (a count that is not a number)
//! surface as `AnalyticsError::Parse`. Empty population cells are not
//! problems — they become `None` and are excluded downstream.

use std::io::Read;
use std::path::Path;

use crate::model::{AnalyticsError, FlowRecord, PopulationRecord};

/// Columns the cleaned asylum table must carry, in no particular order.
pub const REQUIRED_FLOW_COLUMNS: &[&str] = &[
    "country_of_origin_abbr",
    "country_of_origin_name",
    "country_of_asylum_abbr",
    "country_of_asylum_name",
    "region_of_asylum",
    "category",
    "year",
    "count",
];

/// Columns the cleaned population table must carry besides the year columns.
pub const REQUIRED_POPULATION_COLUMNS: &[&str] = &["Country Name", "Country Code"];

const FLOW_TABLE: &str = "asylum";
const POPULATION_TABLE: &str = "population";

// ---------------------------------------------------------------------------
// Flow table
// ---------------------------------------------------------------------------

/// Loads the cleaned asylum flow table from `path`.
pub fn load_flow_records<P: AsRef<Path>>(path: P) -> Result<Vec<FlowRecord>, AnalyticsError> {
    let reader = csv::Reader::from_path(path.as_ref())
        .map_err(|e| AnalyticsError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
    read_flow_records(reader)
}

/// Reads flow records from an already-open CSV reader. Split from the path
/// wrapper so tests can feed in-memory CSV text.
pub fn read_flow_records<R: Read>(
    mut reader: csv::Reader<R>,
) -> Result<Vec<FlowRecord>, AnalyticsError> {
    let headers = reader
        .headers()
        .map_err(|e| parse_error(FLOW_TABLE, &e))?
        .clone();
    for column in REQUIRED_FLOW_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(AnalyticsError::MissingColumn {
                table: FLOW_TABLE,
                column: (*column).to_string(),
            });
        }
    }

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: FlowRecord = row.map_err(|e| parse_error(FLOW_TABLE, &e))?;
        records.push(record);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Population table
// ---------------------------------------------------------------------------

/// Loads the cleaned population table from `path` and pivots it to long
/// format.
pub fn load_population_records<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<PopulationRecord>, AnalyticsError> {
    let reader = csv::Reader::from_path(path.as_ref())
        .map_err(|e| AnalyticsError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
    read_population_records(reader)
}

/// Reads and pivots population records from an already-open CSV reader.
///
/// Every header that parses as an integer is treated as a year column; the
/// `Country Name` column and any other non-year column are ignored for the
/// pivot. Empty cells become `population: None`.
pub fn read_population_records<R: Read>(
    mut reader: csv::Reader<R>,
) -> Result<Vec<PopulationRecord>, AnalyticsError> {
    let headers = reader
        .headers()
        .map_err(|e| parse_error(POPULATION_TABLE, &e))?
        .clone();
    for column in REQUIRED_POPULATION_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(AnalyticsError::MissingColumn {
                table: POPULATION_TABLE,
                column: (*column).to_string(),
            });
        }
    }

    let code_index = headers
        .iter()
        .position(|h| h == "Country Code")
        .unwrap_or_default();
    let year_columns: Vec<(usize, i32)> = headers
        .iter()
        .enumerate()
        .filter_map(|(index, header)| header.trim().parse::<i32>().ok().map(|year| (index, year)))
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| parse_error(POPULATION_TABLE, &e))?;
        let country_code = row.get(code_index).unwrap_or("").to_string();
        for &(index, year) in &year_columns {
            let cell = row.get(index).unwrap_or("").trim();
            let population = if cell.is_empty() {
                None
            } else {
                Some(cell.parse::<f64>().map_err(|e| AnalyticsError::Parse {
                    table: POPULATION_TABLE,
                    message: format!("{} year {}: {}", country_code, year, e),
                })?)
            };
            records.push(PopulationRecord { country_code: country_code.clone(), year, population });
        }
    }
    Ok(records)
}

fn parse_error(table: &'static str, err: &dyn std::fmt::Display) -> AnalyticsError {
    AnalyticsError::Parse { table, message: err.to_string() }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
