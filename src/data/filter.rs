use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::model::{Record, ALCOHOL_FIELD, QUALITY_FIELD};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Quality buckets
// ---------------------------------------------------------------------------

/// Ordinal quality ranges offered by the dashboard's quality selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualityBucket {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "3-5")]
    Low,
    #[serde(rename = "6-7")]
    Medium,
    #[serde(rename = "8-9")]
    High,
}

impl QualityBucket {
    pub const ALL: [QualityBucket; 4] = [
        QualityBucket::All,
        QualityBucket::Low,
        QualityBucket::Medium,
        QualityBucket::High,
    ];

    /// Inclusive quality bounds, `None` for [`QualityBucket::All`].
    pub fn bounds(self) -> Option<(f64, f64)> {
        match self {
            QualityBucket::All => None,
            QualityBucket::Low => Some((3.0, 5.0)),
            QualityBucket::Medium => Some((6.0, 7.0)),
            QualityBucket::High => Some((8.0, 9.0)),
        }
    }

    pub fn contains(self, quality: f64) -> bool {
        match self.bounds() {
            Some((lo, hi)) => quality >= lo && quality <= hi,
            None => true,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QualityBucket::All => "all",
            QualityBucket::Low => "3-5",
            QualityBucket::Medium => "6-7",
            QualityBucket::High => "8-9",
        }
    }
}

impl fmt::Display for QualityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityBucket {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        QualityBucket::ALL
            .into_iter()
            .find(|b| b.as_str() == s.trim())
            .ok_or_else(|| format!("unknown quality bucket '{s}' (expected all, 3-5, 6-7 or 8-9)"))
    }
}

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// Quality bucket AND inclusive alcohol ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub quality: QualityBucket,

    /// Inclusive upper bound on alcohol content.
    #[serde(default = "default_max_alcohol")]
    pub max_alcohol: f64,
}

fn default_max_alcohol() -> f64 {
    f64::INFINITY
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            quality: QualityBucket::All,
            max_alcohol: default_max_alcohol(),
        }
    }
}

impl FilterCriteria {
    pub fn new(quality: QualityBucket, max_alcohol: f64) -> Self {
        Self {
            quality,
            max_alcohol,
        }
    }

    /// Whether a single record passes both predicates.
    pub fn matches(&self, record: &Record) -> Result<bool> {
        let quality = record.number(QUALITY_FIELD)?;
        let alcohol = record.number(ALCOHOL_FIELD)?;
        Ok(self.quality.contains(quality) && alcohol <= self.max_alcohol)
    }
}

/// Return the records that pass `criteria`, in their original order.
///
/// The input is never modified. An empty result is not an error; the
/// statistics operations report `EmptyInput` themselves.
pub fn filter<'a, R: AsRef<Record>>(
    records: &'a [R],
    criteria: &FilterCriteria,
) -> Result<Vec<&'a Record>> {
    let mut kept = Vec::new();
    for record in records {
        let record = record.as_ref();
        if criteria.matches(record)? {
            kept.push(record);
        }
    }
    Ok(kept)
}

/// Indices of the records that pass `criteria`.
pub fn filtered_indices<R: AsRef<Record>>(
    records: &[R],
    criteria: &FilterCriteria,
) -> Result<Vec<usize>> {
    let mut kept = Vec::new();
    for (i, record) in records.iter().enumerate() {
        if criteria.matches(record.as_ref())? {
            kept.push(i);
        }
    }
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatsError;

    fn wine(quality: i64, alcohol: f64) -> Record {
        Record::new().with("quality", quality).with("alcohol", alcohol)
    }

    #[test]
    fn test_bucket_and_alcohol_ceiling() {
        let records = vec![wine(8, 9.5), wine(6, 9.0)];
        let criteria = FilterCriteria::new(QualityBucket::High, 10.0);

        let kept = filter(&records, &criteria).unwrap();
        assert_eq!(kept, vec![&records[0]]);
    }

    #[test]
    fn test_alcohol_bound_is_inclusive() {
        let records = vec![wine(5, 10.0), wine(5, 10.1)];
        let criteria = FilterCriteria::new(QualityBucket::All, 10.0);
        assert_eq!(filtered_indices(&records, &criteria).unwrap(), vec![0]);
    }

    #[test]
    fn test_filter_preserves_order_and_is_idempotent() {
        let records = vec![
            wine(3, 12.0),
            wine(7, 8.5),
            wine(5, 9.1),
            wine(9, 14.0),
            wine(4, 11.0),
        ];
        let criteria = FilterCriteria::new(QualityBucket::Low, 11.5);

        let once = filter(&records, &criteria).unwrap();
        assert_eq!(once, vec![&records[2], &records[4]]);

        let twice = filter(&once, &criteria).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_everything_excluded_is_empty_not_error() {
        let records = vec![wine(6, 9.0)];
        let criteria = FilterCriteria::new(QualityBucket::High, 15.0);
        assert!(filter(&records, &criteria).unwrap().is_empty());
    }

    #[test]
    fn test_default_criteria_keep_everything() {
        let records = vec![wine(3, 8.0), wine(9, 14.9)];
        let kept = filter(&records, &FilterCriteria::default()).unwrap();
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_missing_alcohol_is_an_error() {
        let records = vec![Record::new().with("quality", 5)];
        assert_eq!(
            filter(&records, &FilterCriteria::default()),
            Err(StatsError::MissingField("alcohol".into()))
        );
    }

    #[test]
    fn test_bucket_parsing() {
        assert_eq!("8-9".parse::<QualityBucket>(), Ok(QualityBucket::High));
        assert_eq!("all".parse::<QualityBucket>(), Ok(QualityBucket::All));
        assert!("2-4".parse::<QualityBucket>().is_err());
        assert_eq!(QualityBucket::Medium.to_string(), "6-7");
    }
}
