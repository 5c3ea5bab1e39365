use std::collections::BTreeMap;

use serde::Serialize;

use super::column;
use crate::data::model::{FieldValue, Record};
use crate::error::{Result, StatsError};

// ---------------------------------------------------------------------------
// Value counts (bar chart)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueCount {
    pub value: FieldValue,
    pub count: usize,
}

/// Occurrences of each distinct value of `field`, ascending by value.
pub fn value_counts<R: AsRef<Record>>(records: &[R], field: &str) -> Result<Vec<ValueCount>> {
    let mut counts: BTreeMap<FieldValue, usize> = BTreeMap::new();
    for record in records {
        let value = record.as_ref().get(field)?;
        *counts.entry(value.clone()).or_default() += 1;
    }
    Ok(counts
        .into_iter()
        .map(|(value, count)| ValueCount { value, count })
        .collect())
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Equal-width histogram. `edges` has one more entry than `counts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub field: String,
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Upper bound on histogram bins; counts and edges are allocated up front.
pub const MAX_BINS: usize = 10_000;

/// Bin `field` into `bins` equal-width bins spanning its observed range.
///
/// Bins are half-open `[lo, hi)` except the last, which also holds the
/// maximum. A constant column puts every record in the first bin.
///
/// `bins` must lie in `1..=MAX_BINS`.
pub fn histogram<R: AsRef<Record>>(records: &[R], field: &str, bins: usize) -> Result<Histogram> {
    if bins == 0 || bins > MAX_BINS {
        return Err(StatsError::InvalidBinCount {
            bins,
            max: MAX_BINS,
        });
    }
    if records.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    let values = column(records, field)?;

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / bins as f64;

    let edges = (0..=bins)
        .map(|i| if i == bins { max } else { min + width * i as f64 })
        .collect();

    let mut counts = vec![0usize; bins];
    for v in values {
        let idx = if width > 0.0 {
            (((v - min) / width) as usize).min(bins - 1)
        } else {
            0
        };
        counts[idx] += 1;
    }

    Ok(Histogram {
        field: field.to_string(),
        edges,
        counts,
    })
}

// ---------------------------------------------------------------------------
// Projections (scatter / 3D scatter)
// ---------------------------------------------------------------------------

/// Column-major numeric projection of several fields, one point per record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub fields: Vec<String>,
    pub columns: Vec<Vec<f64>>,
}

impl Projection {
    /// Number of points.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Point `i` as a row of coordinates.
    pub fn point(&self, i: usize) -> Option<Vec<f64>> {
        self.columns.iter().map(|c| c.get(i).copied()).collect()
    }
}

/// Project `records` onto `fields` (e.g. x, y and a colour channel).
pub fn project<R: AsRef<Record>>(records: &[R], fields: &[&str]) -> Result<Projection> {
    let columns = fields
        .iter()
        .map(|f| column(records, f))
        .collect::<Result<Vec<_>>>()?;
    Ok(Projection {
        fields: fields.iter().map(|f| f.to_string()).collect(),
        columns,
    })
}
