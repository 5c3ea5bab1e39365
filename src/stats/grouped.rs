use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::model::{FieldValue, Record};
use crate::error::Result;

/// One observed group and the mean of every value field within it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRow {
    pub key: FieldValue,
    /// Number of records in the group.
    pub count: usize,
    /// Same order as [`GroupedAverages::value_fields`].
    pub means: Vec<f64>,
}

/// Group-average table: one row per distinct group value, ascending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedAverages {
    pub group_field: String,
    pub value_fields: Vec<String>,
    pub rows: Vec<GroupRow>,
}

impl GroupedAverages {
    /// Mean of `field` within the group keyed `key`, if both exist.
    pub fn mean(&self, key: &FieldValue, field: &str) -> Option<f64> {
        let col = self.value_fields.iter().position(|f| f == field)?;
        let row = self.rows.iter().find(|r| &r.key == key)?;
        row.means.get(col).copied()
    }
}

/// Partition `records` by `group_field` and average each of `value_fields`
/// within every partition.
///
/// Rows appear only for group values that occur in `records`, so no mean is
/// ever taken over an empty partition. An empty input yields an empty table.
pub fn grouped_average<R: AsRef<Record>>(
    records: &[R],
    group_field: &str,
    value_fields: &[&str],
) -> Result<GroupedAverages> {
    // key -> (count, per-field sums)
    let mut groups: BTreeMap<FieldValue, (usize, Vec<f64>)> = BTreeMap::new();

    for record in records {
        let record = record.as_ref();
        let key = record.get(group_field)?.clone();
        let values = value_fields
            .iter()
            .map(|f| record.number(f))
            .collect::<Result<Vec<f64>>>()?;

        let (count, sums) = groups
            .entry(key)
            .or_insert_with(|| (0, vec![0.0; value_fields.len()]));
        *count += 1;
        for (sum, v) in sums.iter_mut().zip(values) {
            *sum += v;
        }
    }

    let rows = groups
        .into_iter()
        .map(|(key, (count, sums))| GroupRow {
            key,
            count,
            means: sums.into_iter().map(|s| s / count as f64).collect(),
        })
        .collect();

    Ok(GroupedAverages {
        group_field: group_field.to_string(),
        value_fields: value_fields.iter().map(|f| f.to_string()).collect(),
        rows,
    })
}
