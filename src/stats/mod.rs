//! Aggregation engine.
//!
//! Pure functions over a slice of records. Every operation accepts the full
//! dataset (`&[Record]`) or a filtered view (`&[&Record]`) alike, performs no
//! logging and holds no state between calls.

pub mod correlation;
pub mod distribution;
pub mod grouped;
pub mod overview;
pub mod summary;

pub use correlation::{correlation, correlation_matrix, CorrelationMatrix};
pub use distribution::{
    histogram, project, value_counts, Histogram, Projection, ValueCount, MAX_BINS,
};
pub use grouped::{grouped_average, GroupRow, GroupedAverages};
pub use overview::{overview, Overview};
pub use summary::{summarize, Summary};

use crate::data::model::Record;
use crate::error::Result;

/// Numeric projection of one field across `records`.
pub fn column<R: AsRef<Record>>(records: &[R], field: &str) -> Result<Vec<f64>> {
    records.iter().map(|r| r.as_ref().number(field)).collect()
}

/// Arithmetic mean; `None` for an empty slice.
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatsError;

    #[test]
    fn test_column_projection() {
        let records = vec![
            Record::new().with("pH", 3.2),
            Record::new().with("pH", 3),
        ];
        assert_eq!(column(&records, "pH").unwrap(), vec![3.2, 3.0]);
        assert_eq!(
            column(&records, "alcohol"),
            Err(StatsError::MissingField("alcohol".into()))
        );
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
    }
}
