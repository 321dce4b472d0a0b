use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use arrow::array::{
    Array, ArrayRef, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray,
    StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use super::model::{Dataset, Record, Year};

/// Columns every source table must provide.
pub const PLACENAME: &str = "Placename";
pub const YEAR: &str = "Year";
pub const WORD: &str = "Word";
pub const PMI: &str = "PMI";
pub const REQUIRED_COLUMNS: [&str; 4] = [PLACENAME, YEAR, WORD, PMI];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a PMI table could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("column '{column}' has unsupported type {found}")]
    ColumnType { column: &'static str, found: String },

    #[error("row {row}: invalid {column} value '{value}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("malformed CSV")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON")]
    Json(#[from] serde_json::Error),

    #[error("malformed parquet file")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("unreadable arrow batch")]
    Arrow(#[from] arrow::error::ArrowError),
}

type Result<T> = std::result::Result<T, LoadError>;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a PMI table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with `Placename`, `Year`, `Word`, `PMI` (extra columns ignored)
/// * `.json`    – `[{ "Placename": ..., "Year": ..., "Word": ..., "PMI": ... }, ...]`
/// * `.parquet` – string columns for names, integer or float columns for numbers
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };
    Ok(Dataset::from_records(records))
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Cell conversion shared by all formats
// ---------------------------------------------------------------------------

/// Years may arrive as floats (pandas promotes integer columns holding NaN),
/// but must be integral. NaN means missing.
fn year_from_f64(value: f64, row: usize) -> Result<Option<Year>> {
    if value.is_nan() {
        return Ok(None);
    }
    // `i64::MAX as f64` rounds up to 2^63, hence the exclusive upper bound.
    let in_range = value >= Year::MIN as f64 && value < Year::MAX as f64;
    if !in_range || value.fract() != 0.0 {
        return Err(LoadError::InvalidValue {
            row,
            column: YEAR,
            value: value.to_string(),
        });
    }
    Ok(Some(value as Year))
}

/// Parse a numeric text cell. Empty cells are missing.
fn parse_number(cell: &str, row: usize, column: &'static str) -> Result<Option<f64>> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse::<f64>()
        .map(Some)
        .map_err(|_| LoadError::InvalidValue {
            row,
            column,
            value: cell.to_string(),
        })
}

fn build_record(
    placename: Option<String>,
    year: Option<f64>,
    word: Option<String>,
    pmi: Option<f64>,
    row: usize,
) -> Result<Record> {
    let year = match year {
        Some(y) => year_from_f64(y, row)?,
        None => None,
    };
    Ok(Record::new(
        placename.unwrap_or_default(),
        year,
        word.unwrap_or_default(),
        pmi.unwrap_or(f64::NAN),
    ))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// One CSV line. Numbers stay text here so a bad cell can be reported with
/// its row and column.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Placename")]
    placename: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Word")]
    word: Option<String>,
    #[serde(rename = "PMI")]
    pmi: Option<String>,
}

/// CSV layout: header row with column names, one record per line.
/// Columns other than the required four are ignored.
fn load_csv(path: &Path) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(open(path)?);

    let headers = reader.headers()?;
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn(column));
        }
    }

    let mut records = Vec::new();
    for (row, result) in reader.deserialize::<CsvRow>().enumerate() {
        let cells = result?;
        let number = |cell: Option<&str>, column: &'static str| parse_number(cell.unwrap_or(""), row, column);

        records.push(build_record(
            cells.placename,
            number(cells.year.as_deref(), YEAR)?,
            cells.word,
            number(cells.pmi.as_deref(), PMI)?,
            row,
        )?);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Placename": "Boston", "Year": 2020, "Word": "river", "PMI": -2.5 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<Record>> {
    let rows: Vec<Map<String, JsonValue>> = serde_json::from_reader(BufReader::new(open(path)?))?;

    rows.iter()
        .enumerate()
        .map(|(row, obj)| {
            for column in REQUIRED_COLUMNS {
                if !obj.contains_key(column) {
                    return Err(LoadError::MissingColumn(column));
                }
            }
            build_record(
                json_text(obj, PLACENAME, row)?,
                json_number(obj, YEAR, row)?,
                json_text(obj, WORD, row)?,
                json_number(obj, PMI, row)?,
                row,
            )
        })
        .collect()
}

fn json_text(obj: &Map<String, JsonValue>, column: &'static str, row: usize) -> Result<Option<String>> {
    match obj.get(column) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        // Numeric-looking words survive a pandas round trip as numbers.
        Some(JsonValue::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(LoadError::InvalidValue {
            row,
            column,
            value: other.to_string(),
        }),
    }
}

fn json_number(obj: &Map<String, JsonValue>, column: &'static str, row: usize) -> Result<Option<f64>> {
    match obj.get(column) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Number(n)) => Ok(n.as_f64()),
        Some(other) => Err(LoadError::InvalidValue {
            row,
            column,
            value: other.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by pandas (`df.to_parquet()`) or polars.
///
/// Expected schema:
/// - `Placename`, `Word`: Utf8 or LargeUtf8
/// - `Year`, `PMI`: Int32, Int64, Float32 or Float64
/// - nulls allowed everywhere; other columns ignored
fn load_parquet(path: &Path) -> Result<Vec<Record>> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;

    // Checked against the file schema so files without row groups fail too.
    let schema = builder.schema().clone();
    let index = |name: &'static str| schema.index_of(name).map_err(|_| LoadError::MissingColumn(name));
    let place_idx = index(PLACENAME)?;
    let year_idx = index(YEAR)?;
    let word_idx = index(WORD)?;
    let pmi_idx = index(PMI)?;

    let reader = builder.build()?;
    let mut records = Vec::new();
    let mut offset = 0;

    for batch_result in reader {
        let batch = batch_result?;
        if offset == 0 && log::log_enabled!(log::Level::Debug) {
            let preview = batch.slice(0, batch.num_rows().min(5));
            if let Ok(table) = arrow::util::pretty::pretty_format_batches(&[preview]) {
                log::debug!("First rows of {}:\n{table}", path.display());
            }
        }

        let place_col = batch.column(place_idx);
        let year_col = batch.column(year_idx);
        let word_col = batch.column(word_idx);
        let pmi_col = batch.column(pmi_idx);

        for i in 0..batch.num_rows() {
            let row = offset + i;
            records.push(build_record(
                arrow_text(place_col, i, PLACENAME)?,
                arrow_number(year_col, i, YEAR)?,
                arrow_text(word_col, i, WORD)?,
                arrow_number(pmi_col, i, PMI)?,
                row,
            )?);
        }
        offset += batch.num_rows();
    }

    Ok(records)
}

// -- Arrow helpers --

fn unsupported(col: &ArrayRef, column: &'static str) -> LoadError {
    LoadError::ColumnType {
        column,
        found: format!("{:?}", col.data_type()),
    }
}

/// Read a string cell from a Utf8 or LargeUtf8 column.
fn arrow_text(col: &ArrayRef, row: usize, column: &'static str) -> Result<Option<String>> {
    let value = match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|a| (!a.is_null(row)).then(|| a.value(row).to_string())),
        DataType::LargeUtf8 => col
            .as_any()
            .downcast_ref::<LargeStringArray>()
            .map(|a| (!a.is_null(row)).then(|| a.value(row).to_string())),
        _ => None,
    };
    value.ok_or_else(|| unsupported(col, column))
}

/// Read a numeric cell from any integer or float column as `f64`.
fn arrow_number(col: &ArrayRef, row: usize, column: &'static str) -> Result<Option<f64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row) as f64),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row) as f64),
        DataType::Float32 => any.downcast_ref::<Float32Array>().map(|a| a.value(row) as f64),
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        _ => None,
    };
    value.map(Some).ok_or_else(|| unsupported(col, column))
}
