use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use super::model::{Dataset, FieldValue};

/// Write a dataset to a file.  Dispatch by extension (`.csv`, `.parquet`/`.pq`).
pub fn write_file(dataset: &Dataset, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => write_csv(dataset, path),
        "parquet" | "pq" => write_parquet(dataset, path),
        other => bail!("Unsupported output extension: .{other}"),
    }
}

/// Write a dataset as CSV with a header row in schema order.
pub fn write_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    let fields = dataset.schema().fields();
    writer.write_record(fields).context("writing CSV header")?;

    for (row, record) in dataset.records().iter().enumerate() {
        let cells = fields
            .iter()
            .map(|f| match record.get(f) {
                Ok(FieldValue::Null) => Ok(String::new()),
                // `{:?}` keeps the decimal point on whole floats ("9.0"), so
                // the loader types them as floats again.
                Ok(FieldValue::Float(v)) => Ok(format!("{v:?}")),
                Ok(value) => Ok(value.to_string()),
                Err(e) => Err(e),
            })
            .collect::<std::result::Result<Vec<String>, _>>()
            .with_context(|| format!("row {row}"))?;
        writer.write_record(&cells).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV writer")?;
    Ok(())
}

/// Write a dataset as a single-batch Parquet file.
pub fn write_parquet(dataset: &Dataset, path: &Path) -> Result<()> {
    let batch = to_record_batch(dataset)?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

/// Convert a dataset to an Arrow batch, one column per schema field.
///
/// Column type: `Int64` when every non-null cell is an integer, `Float64`
/// when every non-null cell is numeric, `Utf8` otherwise.
pub fn to_record_batch(dataset: &Dataset) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(dataset.schema().len());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(dataset.schema().len());

    for name in dataset.schema().fields() {
        let cells = dataset
            .records()
            .iter()
            .map(|r| r.get(name))
            .collect::<std::result::Result<Vec<&FieldValue>, _>>()?;

        let all_int = cells
            .iter()
            .all(|c| matches!(c, FieldValue::Integer(_) | FieldValue::Null));
        let all_num = cells.iter().all(|c| c.is_null() || c.as_f64().is_some());

        let (data_type, column): (DataType, ArrayRef) = if all_int {
            let values: Int64Array = cells
                .iter()
                .map(|c| match c {
                    FieldValue::Integer(i) => Some(*i),
                    _ => None,
                })
                .collect();
            (DataType::Int64, Arc::new(values))
        } else if all_num {
            let values: Float64Array = cells.iter().map(|c| c.as_f64()).collect();
            (DataType::Float64, Arc::new(values))
        } else {
            let values: StringArray = cells
                .iter()
                .map(|c| (!c.is_null()).then(|| c.to_string()))
                .collect();
            (DataType::Utf8, Arc::new(values))
        };

        fields.push(Field::new(name, data_type, true));
        columns.push(column);
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
        .context("assembling record batch")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{load_file, LoadOptions};
    use crate::data::model::Record;
    use crate::data::synthetic;

    #[test]
    fn test_batch_column_types() {
        let ds = synthetic::generate(5, 3).unwrap();
        let batch = to_record_batch(&ds).unwrap();
        let schema = batch.schema();
        assert_eq!(batch.num_rows(), 5);
        assert_eq!(schema.field_with_name("quality").unwrap().data_type(), &DataType::Int64);
        assert_eq!(schema.field_with_name("alcohol").unwrap().data_type(), &DataType::Float64);
        assert_eq!(schema.field_with_name("type").unwrap().data_type(), &DataType::Utf8);
    }

    #[test]
    fn test_parquet_file_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wine.parquet");
        let ds = synthetic::generate(20, 11).unwrap();

        write_file(&ds, &path).unwrap();
        let loaded = load_file(&path, LoadOptions::default()).unwrap();
        assert_eq!(loaded, ds);
    }

    #[test]
    fn test_csv_file_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wine.csv");
        let ds = synthetic::generate(20, 12).unwrap();

        write_file(&ds, &path).unwrap();
        let loaded = load_file(&path, LoadOptions::default()).unwrap();
        assert_eq!(loaded, ds);
    }

    #[test]
    fn test_csv_keeps_whole_floats_as_floats() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("whole.csv");
        let ds = Dataset::from_records(vec![
            Record::new().with("alcohol", 9.0).with("quality", 5),
            Record::new().with("alcohol", 1e-7).with("quality", 6),
        ])
        .unwrap();

        write_file(&ds, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("9.0,5"), "{text}");

        let loaded = load_file(&path, LoadOptions::default()).unwrap();
        assert_eq!(loaded, ds);
        assert_eq!(
            loaded.records()[0].get("alcohol").unwrap(),
            &FieldValue::Float(9.0)
        );
    }
}
