use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Dataset, FieldValue, Record};

/// Knobs shared by every loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Drop rows containing an empty/null cell (the `dropna` preprocessing
    /// the published dataset went through).
    pub drop_incomplete: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            drop_incomplete: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row = field names, one record per line
/// * `.json`    – `[{ "alcohol": 9.4, "quality": 5, ... }, ...]`
/// * `.parquet` – flat scalar columns
pub fn load_file(path: &Path, options: LoadOptions) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let (fields, records) = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening CSV {}", path.display()))?;
            read_csv(file)?
        }
        "json" => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading JSON {}", path.display()))?;
            parse_json(&text)?
        }
        "parquet" | "pq" => read_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    let dataset = finish(fields, records, options)?;
    log::info!(
        "Loaded {} records with fields {:?} from {}",
        dataset.len(),
        dataset.schema().fields(),
        path.display()
    );
    Ok(dataset)
}

/// Parse CSV text already in memory.
pub fn parse_csv(text: &str, options: LoadOptions) -> Result<Dataset> {
    let (fields, records) = read_csv(text.as_bytes())?;
    finish(fields, records, options)
}

fn finish(fields: Vec<String>, mut records: Vec<Record>, options: LoadOptions) -> Result<Dataset> {
    if options.drop_incomplete {
        let before = records.len();
        records.retain(|r| !r.has_null());
        let dropped = before - records.len();
        if dropped > 0 {
            log::warn!("Dropped {dropped} incomplete records");
        }
    }
    Dataset::new(fields, records).context("validating record schema")
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with field names.  Cells parse as numbers when
/// they can and are kept as text otherwise.
fn read_csv<R: std::io::Read>(input: R) -> Result<(Vec<String>, Vec<Record>)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        if row.len() != headers.len() {
            bail!(
                "CSV row {row_no}: expected {} cells, found {}",
                headers.len(),
                row.len()
            );
        }
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(name, cell)| (name.clone(), FieldValue::parse(cell)))
            .collect();
        records.push(record);
    }

    Ok((headers, records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "fixed acidity": 7.4, "alcohol": 9.4, "quality": 5 },
///   ...
/// ]
/// ```
fn parse_json(text: &str) -> Result<(Vec<String>, Vec<Record>)> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let rows = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut fields: Vec<String> = Vec::new();
    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        if i == 0 {
            fields = obj.keys().cloned().collect();
        }

        let record: Record = obj
            .iter()
            .map(|(key, val)| (key.clone(), json_to_value(val)))
            .collect();
        records.push(record);
    }

    Ok((fields, records))
}

fn json_to_value(val: &JsonValue) -> FieldValue {
    match val {
        JsonValue::String(s) => FieldValue::parse(s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                FieldValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                float_value(f)
            } else {
                FieldValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => FieldValue::Text(b.to_string()),
        JsonValue::Null => FieldValue::Null,
        other => FieldValue::Text(other.to_string()),
    }
}

/// NaN and infinities are kept as text, matching how CSV cells are typed.
fn float_value(v: f64) -> FieldValue {
    if v.is_finite() {
        FieldValue::Float(v)
    } else {
        FieldValue::Text(v.to_string())
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of flat scalar columns (as written by
/// `df.to_parquet()` or [`super::export::write_parquet`]).
fn read_parquet(path: &Path) -> Result<(Vec<String>, Vec<Record>)> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let fields: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        for row in 0..batch.num_rows() {
            let mut record = Record::new();
            for (col_idx, name) in fields.iter().enumerate() {
                let value = extract_value(batch.column(col_idx), row)
                    .with_context(|| format!("Row {row}: failed to read '{name}'"))?;
                record.insert(name.clone(), value);
            }
            records.push(record);
        }
    }

    Ok((fields, records))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_value(col: &Arc<dyn Array>, row: usize) -> Result<FieldValue> {
    if col.is_null(row) {
        return Ok(FieldValue::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            FieldValue::Text(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => FieldValue::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            FieldValue::Integer(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            FieldValue::Integer(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            float_value(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            float_value(arr.value(row))
        }
        DataType::Boolean => {
            let arr = col
                .as_any()
                .downcast_ref::<BooleanArray>()
                .context("expected BooleanArray")?;
            FieldValue::Text(arr.value(row).to_string())
        }
        other => bail!("Unsupported column type {other:?}"),
    };
    Ok(value)
}
