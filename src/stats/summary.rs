use serde::Serialize;

use super::column;
use crate::data::model::Record;
use crate::error::{Result, StatsError};

/// Count, mean and extrema of one field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Summarize `field` over `records`.
///
/// Fails with [`StatsError::EmptyInput`] when there are no records rather
/// than reporting `NaN`.
pub fn summarize<R: AsRef<Record>>(records: &[R], field: &str) -> Result<Summary> {
    if records.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    let values = column(records, field)?;
    Summary::of(&values).ok_or(StatsError::EmptyInput)
}

impl Summary {
    /// Summary of raw values; `None` when `values` is empty.
    pub fn of(values: &[f64]) -> Option<Self> {
        let mean = super::mean(values)?;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(Summary {
            count: values.len(),
            mean,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_quality() {
        let records = vec![
            Record::new().with("quality", 5),
            Record::new().with("quality", 7),
        ];
        let summary = summarize(&records, "quality").unwrap();
        assert_eq!(
            summary,
            Summary {
                count: 2,
                mean: 6.0,
                min: 5.0,
                max: 7.0,
            }
        );
    }

    #[test]
    fn test_summarize_empty() {
        let records: Vec<Record> = Vec::new();
        assert_eq!(summarize(&records, "quality"), Err(StatsError::EmptyInput));
    }

    #[test]
    fn test_summarize_unknown_field() {
        let records = vec![Record::new().with("quality", 5)];
        assert_eq!(
            summarize(&records, "alcohol"),
            Err(StatsError::MissingField("alcohol".into()))
        );
    }

    #[test]
    fn test_summarize_filtered_view() {
        let records = vec![
            Record::new().with("alcohol", 9.0),
            Record::new().with("alcohol", 12.5),
            Record::new().with("alcohol", 10.0),
        ];
        let view: Vec<&Record> = records.iter().skip(1).collect();
        let summary = summarize(&view, "alcohol").unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.mean, 11.25);
        assert_eq!(summary.min, 10.0);
        assert_eq!(summary.max, 12.5);
    }
}
