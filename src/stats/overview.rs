use serde::Serialize;

use super::summarize;
use crate::data::model::{Record, ALCOHOL_FIELD, QUALITY_FIELD};
use crate::error::Result;

/// Headline numbers for the current view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Overview {
    pub total: usize,
    pub avg_quality: f64,
    pub avg_alcohol: f64,
    pub min_quality: f64,
    pub max_quality: f64,
}

impl Overview {
    /// Quality span in the dashboard's `"min-max"` form.
    pub fn quality_range(&self) -> String {
        format!("{}-{}", self.min_quality, self.max_quality)
    }
}

/// Record count, mean quality and alcohol, and the quality span.
pub fn overview<R: AsRef<Record>>(records: &[R]) -> Result<Overview> {
    let quality = summarize(records, QUALITY_FIELD)?;
    let alcohol = summarize(records, ALCOHOL_FIELD)?;
    Ok(Overview {
        total: quality.count,
        avg_quality: quality.mean,
        avg_alcohol: alcohol.mean,
        min_quality: quality.min,
        max_quality: quality.max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatsError;

    #[test]
    fn test_overview() {
        let records = vec![
            Record::new().with("quality", 5).with("alcohol", 9.0),
            Record::new().with("quality", 8).with("alcohol", 12.0),
            Record::new().with("quality", 5).with("alcohol", 10.5),
        ];
        let o = overview(&records).unwrap();
        assert_eq!(o.total, 3);
        assert_eq!(o.avg_quality, 6.0);
        assert_eq!(o.avg_alcohol, 10.5);
        assert_eq!(o.quality_range(), "5-8");
    }

    #[test]
    fn test_overview_empty_view() {
        let view: Vec<&Record> = Vec::new();
        assert_eq!(overview(&view), Err(StatsError::EmptyInput));
    }
}
