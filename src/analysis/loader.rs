//! Workout log loader
//!
//! Reads the CSV export, imputes missing numbers with column medians,
//! drops duplicate rows, parses dates and sorts chronologically.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{
    WorkoutRecord, COL_DATE, COL_EXERCISE_NAME, COL_NOTES, COL_REPS, COL_SETS, COL_WEIGHT,
    COL_WORKOUT_NAME, REQUIRED_COLUMNS,
};

/// Loader error types
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read workout log: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Required column '{column}' is missing")]
    Schema { column: String },

    #[error("Line {line}: cannot parse date '{value}'")]
    Parse { line: u64, value: String },

    #[error("Line {line}: column '{column}' has non-numeric value '{value}'")]
    InvalidNumber {
        line: u64,
        column: String,
        value: String,
    },
}

/// Result type for loader operations
pub type LoadResult<T> = Result<T, LoadError>;

/// Cell values treated as missing
const NULL_MARKERS: [&str; 10] = [
    "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "#N/A", "<NA>",
];

/// Date layouts accepted in the Date column
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Header positions of the required columns
struct ColumnIndex {
    date: usize,
    workout_name: usize,
    exercise_name: usize,
    weight: usize,
    reps: usize,
    sets: usize,
    notes: usize,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> LoadResult<Self> {
        let find = |column: &str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| LoadError::Schema {
                    column: column.to_string(),
                })
        };

        // Report the first missing column in declaration order
        for column in REQUIRED_COLUMNS {
            find(column)?;
        }

        Ok(Self {
            date: find(COL_DATE)?,
            workout_name: find(COL_WORKOUT_NAME)?,
            exercise_name: find(COL_EXERCISE_NAME)?,
            weight: find(COL_WEIGHT)?,
            reps: find(COL_REPS)?,
            sets: find(COL_SETS)?,
            notes: find(COL_NOTES)?,
        })
    }
}

/// A projected row before imputation and date parsing
#[derive(Debug, Clone)]
struct RawRow {
    line: u64,
    date: String,
    workout_name: String,
    exercise_name: String,
    weight: Option<f64>,
    reps: Option<f64>,
    sets: Option<f64>,
    notes: Option<String>,
}

/// Identity used for duplicate detection (all seven fields)
#[derive(Debug, PartialEq, Eq, Hash)]
struct RowKey {
    date: String,
    workout_name: String,
    exercise_name: String,
    weight: Option<u64>,
    reps: Option<u64>,
    sets: Option<u64>,
    notes: Option<String>,
}

impl RawRow {
    fn from_record(record: &StringRecord, columns: &ColumnIndex, line: u64) -> LoadResult<Self> {
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        Ok(Self {
            line,
            date: cell(columns.date).trim().to_string(),
            workout_name: text_cell(cell(columns.workout_name)).unwrap_or_default(),
            exercise_name: text_cell(cell(columns.exercise_name)).unwrap_or_default(),
            weight: number_cell(cell(columns.weight), COL_WEIGHT, line)?,
            reps: number_cell(cell(columns.reps), COL_REPS, line)?,
            sets: number_cell(cell(columns.sets), COL_SETS, line)?,
            notes: text_cell(cell(columns.notes)),
        })
    }

    fn key(&self) -> RowKey {
        RowKey {
            date: self.date.clone(),
            workout_name: self.workout_name.clone(),
            exercise_name: self.exercise_name.clone(),
            weight: float_key(self.weight),
            reps: float_key(self.reps),
            sets: float_key(self.sets),
            notes: self.notes.clone(),
        }
    }
}

fn is_missing(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || NULL_MARKERS.contains(&trimmed)
}

fn text_cell(value: &str) -> Option<String> {
    if is_missing(value) {
        None
    } else {
        Some(value.to_string())
    }
}

fn number_cell(value: &str, column: &str, line: u64) -> LoadResult<Option<f64>> {
    if is_missing(value) {
        return Ok(None);
    }
    value
        .trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|_| LoadError::InvalidNumber {
            line,
            column: column.to_string(),
            value: value.to_string(),
        })
}

/// Bit pattern for hashing; folds -0.0 into 0.0
fn float_key(value: Option<f64>) -> Option<u64> {
    value.map(|v| (v + 0.0).to_bits())
}

/// Median of the given values (mean of the two middle values for even counts)
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Parse a Date cell, discarding any time component
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Load and clean a workout log from a CSV file
pub fn load_records<P: AsRef<Path>>(path: P) -> LoadResult<Vec<WorkoutRecord>> {
    let path = path.as_ref();
    info!(path = %path.display(), "Loading workout log");
    let file = File::open(path)?;
    parse_records(file)
}

/// Load and clean a workout log from any CSV source
pub fn parse_records<R: Read>(reader: R) -> LoadResult<Vec<WorkoutRecord>> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let columns = ColumnIndex::resolve(&headers)?;

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        rows.push(RawRow::from_record(&record, &columns, line)?);
    }

    clean_rows(rows)
}

fn impute(rows: &mut [RawRow]) {
    let weights: Vec<f64> = rows.iter().filter_map(|r| r.weight).collect();
    let reps: Vec<f64> = rows.iter().filter_map(|r| r.reps).collect();
    let sets: Vec<f64> = rows.iter().filter_map(|r| r.sets).collect();

    let weight_median = median(&weights);
    let reps_median = median(&reps);
    let sets_median = median(&sets);

    for (column, value) in [
        (COL_WEIGHT, weight_median),
        (COL_REPS, reps_median),
        (COL_SETS, sets_median),
    ] {
        match value {
            Some(m) => debug!(column, median = m, "Imputing missing values with median"),
            None if !rows.is_empty() => {
                warn!(column, "Column has no values; missing cells left unimputed")
            }
            None => {}
        }
    }

    for row in rows.iter_mut() {
        row.weight = row.weight.or(weight_median);
        row.reps = row.reps.or(reps_median);
        row.sets = row.sets.or(sets_median);
    }
}

fn dedup(rows: Vec<RawRow>) -> Vec<RawRow> {
    let mut seen = HashSet::with_capacity(rows.len());
    rows.into_iter().filter(|row| seen.insert(row.key())).collect()
}

fn clean_rows(mut rows: Vec<RawRow>) -> LoadResult<Vec<WorkoutRecord>> {
    let total = rows.len();

    // Medians come from the full dataset, before any row is dropped
    impute(&mut rows);

    let rows = dedup(rows);
    let duplicates = total - rows.len();
    if duplicates > 0 {
        debug!(duplicates, "Removed duplicate rows");
    }

    let mut records = rows
        .into_iter()
        .map(|row| {
            let date = parse_date(&row.date).ok_or_else(|| LoadError::Parse {
                line: row.line,
                value: row.date.clone(),
            })?;
            Ok(WorkoutRecord {
                date,
                workout_name: row.workout_name,
                exercise_name: row.exercise_name,
                weight: row.weight,
                reps: row.reps,
                sets: row.sets,
                notes: row.notes,
            })
        })
        .collect::<LoadResult<Vec<_>>>()?;

    // Stable: same-day rows keep file order
    records.sort_by_key(|r| r.date);

    info!(rows = total, records = records.len(), duplicates, "Workout log loaded");
    Ok(records)
}
