use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type, UInt64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, PredictionRecord, PredictionTable};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a predictions file could not be turned into a table.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),

    /// Any other read or parse failure, with the full context chain.
    #[error("{0}")]
    Parse(String),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a predictions table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` / no extension – comma-separated with a header row
/// * `.tsv` / `.tab` – tab-separated with a header row
/// * `.json` – `[{ "TransactionID": 1, "prediction": 0, ... }, ...]`
/// * `.parquet` – flat Parquet file with scalar columns
pub fn load_file(path: &Path) -> Result<PredictionTable, LoadError> {
    match std::fs::metadata(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }
        Err(e) => return Err(LoadError::Parse(format!("reading {}: {e}", path.display()))),
        Ok(_) => {}
    }

    let table = parse_file(path).map_err(|e| LoadError::Parse(format!("{e:#}")))?;

    log::info!(
        "Loaded {} predictions from {} (id column {:?}, prediction column {:?})",
        table.len(),
        path.display(),
        table.id_column_name(),
        table.prediction_column_name()
    );
    let non_binary = table
        .records()
        .iter()
        .filter(|r| table.prediction_of(r).is_non_binary_label())
        .count();
    if non_binary > 0 {
        log::warn!(
            "{non_binary} values in {:?} are neither 0 nor 1 and will be treated as legitimate",
            table.prediction_column_name()
        );
    }

    Ok(table)
}

fn parse_file(path: &Path) -> Result<PredictionTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "" | "csv" | "txt" => load_delimited(path, b','),
        "tsv" | "tab" => load_delimited(path, b'\t'),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("unsupported file extension: .{other}"),
    }
}

fn build_table(columns: Vec<String>, records: Vec<PredictionRecord>) -> Result<PredictionTable> {
    PredictionTable::new(columns, records).context("no columns to parse from file")
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Header row with column names, one record per line.  Every row must have
/// as many fields as the header.
fn load_delimited(path: &Path, delimiter: u8) -> Result<PredictionTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_path(path)
        .context("opening delimited file")?;

    let columns: Vec<String> = reader
        .headers()
        .context("reading header row")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("data row {}", row_no + 1))?;
        records.push(PredictionRecord::new(
            record.iter().map(CellValue::infer).collect(),
        ));
    }

    build_table(columns, records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
/// Columns appear in first-seen key order; absent keys read as null.
fn load_json(path: &Path) -> Result<PredictionTable> {
    let file = File::open(path).context("opening JSON file")?;
    let root: JsonValue =
        serde_json::from_reader(BufReader::new(file)).context("parsing JSON")?;

    let rows = root.as_array().context("expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }

    let records = rows
        .iter()
        .filter_map(|row| row.as_object())
        .map(|obj| {
            PredictionRecord::new(
                columns
                    .iter()
                    .map(|c| obj.get(c).map(json_to_cell).unwrap_or(CellValue::Null))
                    .collect(),
            )
        })
        .collect();

    build_table(columns, records)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet file, as written by both **Pandas**
/// (`df.to_parquet()`) and **Spark** (`df.write.parquet()`).
fn load_parquet(path: &Path) -> Result<PredictionTable> {
    let file = File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let arrays = batch
            .columns()
            .iter()
            .zip(&columns)
            .map(|(col, name)| normalize_column(name, col))
            .collect::<Result<Vec<_>>>()?;

        for row in 0..batch.num_rows() {
            let values = arrays
                .iter()
                .map(|col| extract_cell(col, row))
                .collect::<Result<Vec<_>>>()?;
            records.push(PredictionRecord::new(values));
        }
    }

    build_table(columns, records)
}

/// Reduce a column to one of Utf8, Int64, UInt64, Float64 or Boolean.
///
/// Narrow integers and floats are widened, other string layouts become Utf8
/// and dictionaries (pandas `category`) are decoded to their value type.
fn normalize_column(name: &str, col: &ArrayRef) -> Result<ArrayRef> {
    let target = match col.data_type() {
        DataType::Utf8
        | DataType::Int64
        | DataType::UInt64
        | DataType::Float64
        | DataType::Boolean => return Ok(Arc::clone(col)),
        DataType::Dictionary(_, value_type) => {
            let decoded = cast(col, value_type)
                .with_context(|| format!("decoding dictionary column {name:?}"))?;
            return normalize_column(name, &decoded);
        }
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32 => DataType::Int64,
        DataType::Float16 | DataType::Float32 => DataType::Float64,
        DataType::LargeUtf8 | DataType::Utf8View => DataType::Utf8,
        other => bail!("column {name:?} has unsupported type {other}"),
    };
    cast(col, &target).with_context(|| format!("converting column {name:?} to {target}"))
}

/// Extract a single cell from a normalized column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => col
            .as_string_opt::<i32>()
            .map(|a| CellValue::String(a.value(row).to_string())),
        DataType::Int64 => col
            .as_primitive_opt::<Int64Type>()
            .map(|a| CellValue::Integer(a.value(row))),
        // Values past i64::MAX cannot be ids; keep them numeric.
        DataType::UInt64 => col.as_primitive_opt::<UInt64Type>().map(|a| {
            let v = a.value(row);
            i64::try_from(v).map_or(CellValue::Float(v as f64), CellValue::Integer)
        }),
        DataType::Float64 => col
            .as_primitive_opt::<Float64Type>()
            .map(|a| CellValue::Float(a.value(row))),
        DataType::Boolean => col.as_boolean_opt().map(|a| CellValue::Bool(a.value(row))),
        _ => None,
    };
    value.with_context(|| format!("unexpected column type {}", col.data_type()))
}
