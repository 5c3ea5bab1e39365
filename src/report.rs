//! Rendering of derived tables for the terminal.
//!
//! Text output converts each table to an Arrow [`RecordBatch`] and uses
//! Arrow's pretty printer; JSON output serializes the same structures.

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::session::Snapshot;
use crate::stats::{
    CorrelationMatrix, GroupedAverages, Histogram, Overview, Projection, Summary, ValueCount,
};

/// A derived table that can be shown as an Arrow batch.
pub trait Table {
    fn to_batch(&self) -> Result<RecordBatch>;
}

/// Render any table in the requested format.
pub fn render<T: Table + Serialize + ?Sized>(table: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(table).context("serializing to JSON"),
        OutputFormat::Text => {
            let batch = table.to_batch()?;
            Ok(pretty_format_batches(&[batch])
                .context("formatting table")?
                .to_string())
        }
    }
}

/// Render a full snapshot, one titled section per table.
pub fn render_snapshot(snapshot: &Snapshot, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return serde_json::to_string_pretty(snapshot).context("serializing to JSON");
    }

    let mut out = String::new();
    writeln!(
        out,
        "Filter: quality {} / alcohol <= {}\n",
        snapshot.criteria.quality, snapshot.criteria.max_alcohol
    )?;

    section(&mut out, "Overview", snapshot.overview.as_ref(), format)?;
    section(&mut out, "Quality distribution", Some(&snapshot.quality_counts), format)?;
    section(&mut out, "Correlation matrix", snapshot.correlation.as_ref(), format)?;
    section(&mut out, "Averages by group", Some(&snapshot.averages), format)?;
    section(&mut out, "Histogram", snapshot.histogram.as_ref(), format)?;
    Ok(out)
}

fn section<T: Table + Serialize>(
    out: &mut String,
    title: &str,
    table: Option<&T>,
    format: OutputFormat,
) -> Result<()> {
    writeln!(out, "{title}")?;
    match table {
        Some(t) => writeln!(out, "{}\n", render(t, format)?)?,
        None => writeln!(out, "(not enough records)\n")?,
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Field summaries
// ---------------------------------------------------------------------------

/// Summaries of several fields over the same view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTable {
    pub rows: Vec<(String, Summary)>,
}

impl Table for SummaryTable {
    fn to_batch(&self) -> Result<RecordBatch> {
        let names: Vec<&str> = self.rows.iter().map(|(f, _)| f.as_str()).collect();
        build_batch(vec![
            ("field", text_column(names)),
            ("count", count_column(self.rows.iter().map(|(_, s)| s.count as u64))),
            ("mean", float_column(self.rows.iter().map(|(_, s)| s.mean))),
            ("min", float_column(self.rows.iter().map(|(_, s)| s.min))),
            ("max", float_column(self.rows.iter().map(|(_, s)| s.max))),
        ])
    }
}

// ---------------------------------------------------------------------------
// Engine outputs
// ---------------------------------------------------------------------------

impl Table for Overview {
    fn to_batch(&self) -> Result<RecordBatch> {
        build_batch(vec![
            ("total", count_column([self.total as u64])),
            ("avg quality", float_column([self.avg_quality])),
            ("avg alcohol", float_column([self.avg_alcohol])),
            ("quality range", text_column(vec![self.quality_range()])),
        ])
    }
}

impl Table for CorrelationMatrix {
    fn to_batch(&self) -> Result<RecordBatch> {
        let mut columns = vec![("field".to_string(), text_column(self.fields.clone()))];
        for (j, name) in self.fields.iter().enumerate() {
            columns.push((
                name.clone(),
                float_column(self.values.iter().map(|row| row[j])),
            ));
        }
        build_batch(columns)
    }
}

impl Table for GroupedAverages {
    fn to_batch(&self) -> Result<RecordBatch> {
        let keys: Vec<String> = self.rows.iter().map(|r| r.key.to_string()).collect();
        let mut columns = vec![
            (self.group_field.clone(), text_column(keys)),
            ("count".to_string(), count_column(self.rows.iter().map(|r| r.count as u64))),
        ];
        for (j, name) in self.value_fields.iter().enumerate() {
            columns.push((
                name.clone(),
                float_column(self.rows.iter().map(|r| r.means[j])),
            ));
        }
        build_batch(columns)
    }
}

impl Table for Histogram {
    fn to_batch(&self) -> Result<RecordBatch> {
        build_batch(vec![
            ("from", float_column(self.edges.iter().copied().take(self.counts.len()))),
            ("to", float_column(self.edges.iter().copied().skip(1))),
            ("count", count_column(self.counts.iter().map(|&c| c as u64))),
        ])
    }
}

impl Table for Vec<ValueCount> {
    fn to_batch(&self) -> Result<RecordBatch> {
        build_batch(vec![
            ("value", text_column(self.iter().map(|c| c.value.to_string()).collect())),
            ("count", count_column(self.iter().map(|c| c.count as u64))),
        ])
    }
}

impl Table for Projection {
    fn to_batch(&self) -> Result<RecordBatch> {
        build_batch(
            self.fields
                .iter()
                .zip(&self.columns)
                .map(|(name, col)| (name.clone(), float_column(col.iter().copied())))
                .collect(),
        )
    }
}

// -- Arrow helpers --

fn float_column(values: impl IntoIterator<Item = f64>) -> ArrayRef {
    Arc::new(Float64Array::from_iter_values(values))
}

fn count_column(values: impl IntoIterator<Item = u64>) -> ArrayRef {
    Arc::new(UInt64Array::from_iter_values(values))
}

fn text_column<S: AsRef<str>>(values: Vec<S>) -> ArrayRef {
    Arc::new(StringArray::from_iter_values(values))
}

fn build_batch<N: Into<String>>(columns: Vec<(N, ArrayRef)>) -> Result<RecordBatch> {
    let (fields, arrays): (Vec<Field>, Vec<ArrayRef>) = columns
        .into_iter()
        .map(|(name, array)| {
            let data_type: DataType = array.data_type().clone();
            (Field::new(name, data_type, false), array)
        })
        .unzip();
    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).context("assembling table")
}
