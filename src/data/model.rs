use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::error::{Result, StatsError};

/// Field holding the integer quality score (observed range 3–9).
pub const QUALITY_FIELD: &str = "quality";
/// Field holding the alcohol content in % vol.
pub const ALCOHOL_FIELD: &str = "alcohol";
/// Categorical wine type ("Red", "White", "Rosé").
pub const TYPE_FIELD: &str = "type";

/// The physicochemical properties of the wine-quality dataset, in the
/// column order of the published CSV.
pub const WINE_PROPERTIES: [&str; 12] = [
    "fixed acidity",
    "volatile acidity",
    "citric acid",
    "residual sugar",
    "chlorides",
    "free sulfur dioxide",
    "total sulfur dioxide",
    "density",
    "pH",
    "sulphates",
    "alcohol",
    "quality",
];

// ---------------------------------------------------------------------------
// FieldValue – a single cell of a record
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value.
/// Grouping keys live in a `BTreeMap`, so `FieldValue` must be `Ord`.
/// Equality, ordering and hashing all treat `-0.0` and `0.0` as one value.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Null,
}

// -- Manual Eq/Ord so FieldValue can key a BTreeMap --

/// Folds `-0.0` into `0.0`.
fn canonical(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for FieldValue {}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        use FieldValue::*;
        fn discriminant(v: &FieldValue) -> u8 {
            match v {
                Null => 0,
                Integer(_) | Float(_) => 1,
                Text(_) => 2,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => canonical(*a).total_cmp(&canonical(*b)),
            // Mixed numeric keys compare by value; ties put integers first
            // so the ordering stays consistent with `Eq`.
            (Integer(a), Float(b)) => (*a as f64).total_cmp(&canonical(*b)).then(Ordering::Less),
            (Float(a), Integer(b)) => canonical(*a).total_cmp(&(*b as f64)).then(Ordering::Greater),
            (Text(a), Text(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl std::hash::Hash for FieldValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            FieldValue::Integer(i) => i.hash(state),
            FieldValue::Float(f) => canonical(*f).to_bits().hash(state),
            FieldValue::Text(s) => s.hash(state),
            FieldValue::Null => {}
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Null => write!(f, "<null>"),
        }
    }
}

impl FieldValue {
    /// Interpret the value as an `f64`; text and null have no numeric value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(*v),
            FieldValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Type a raw text cell: empty → `Null`, then integer, then float,
    /// falling back to text.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return FieldValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return FieldValue::Integer(i);
        }
        match s.parse::<f64>() {
            Ok(f) if f.is_finite() => FieldValue::Float(f),
            _ => FieldValue::Text(s.to_string()),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Integer(v as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the dataset
// ---------------------------------------------------------------------------

/// One sampled wine: field name → value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Schema-checked lookup.
    pub fn get(&self, field: &str) -> Result<&FieldValue> {
        self.fields
            .get(field)
            .ok_or_else(|| StatsError::MissingField(field.to_string()))
    }

    /// Numeric lookup; text and null cells are an error, never `NaN`.
    pub fn number(&self, field: &str) -> Result<f64> {
        let value = self.get(field)?;
        value.as_f64().ok_or_else(|| StatsError::NonNumericField {
            field: field.to_string(),
            value: value.to_string(),
        })
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether any cell is `Null`.
    pub fn has_null(&self) -> bool {
        self.fields.values().any(FieldValue::is_null)
    }
}

impl AsRef<Record> for Record {
    fn as_ref(&self) -> &Record {
        self
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Ordered field names shared by every record of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schema {
    fields: Vec<String>,
}

impl Schema {
    pub fn new(fields: Vec<String>) -> Self {
        Schema { fields }
    }

    /// Field names in declaration order (CSV header order for loaded files).
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Fail with `MissingField` on the first name not in the schema.
    pub fn check(&self, fields: &[&str]) -> Result<()> {
        match fields.iter().find(|f| !self.contains(f)) {
            Some(missing) => Err(StatsError::MissingField(missing.to_string())),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// The full, immutable record set.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    schema: Schema,
    records: Vec<Record>,
}

impl Dataset {
    /// Build a dataset, rejecting any record whose field set differs from
    /// `fields`.
    pub fn new(fields: Vec<String>, records: Vec<Record>) -> Result<Self> {
        let expected: BTreeSet<&str> = fields.iter().map(String::as_str).collect();
        for (row, record) in records.iter().enumerate() {
            let found: BTreeSet<&str> = record.field_names().collect();
            if found != expected {
                return Err(StatsError::SchemaMismatch {
                    row,
                    expected: expected.iter().map(|s| s.to_string()).collect(),
                    found: found.iter().map(|s| s.to_string()).collect(),
                });
            }
        }
        Ok(Dataset {
            schema: Schema::new(fields),
            records,
        })
    }

    /// Build a dataset taking the schema from the first record.
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        let fields = records
            .first()
            .map(|r| r.field_names().map(str::to_string).collect())
            .unwrap_or_default();
        Self::new(fields, records)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell_types() {
        assert_eq!(FieldValue::parse("6"), FieldValue::Integer(6));
        assert_eq!(FieldValue::parse("9.5"), FieldValue::Float(9.5));
        assert_eq!(FieldValue::parse(" Red "), FieldValue::Text("Red".into()));
        assert_eq!(FieldValue::parse(""), FieldValue::Null);
        assert_eq!(FieldValue::parse("NaN"), FieldValue::Text("NaN".into()));
    }

    #[test]
    fn test_value_ordering() {
        let mut values = vec![
            FieldValue::from("White"),
            FieldValue::from(7),
            FieldValue::Null,
            FieldValue::from(5.5),
            FieldValue::from(3),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                FieldValue::Null,
                FieldValue::from(3),
                FieldValue::from(5.5),
                FieldValue::from(7),
                FieldValue::from("White"),
            ]
        );
        assert_ne!(
            FieldValue::from(6).cmp(&FieldValue::from(6.0)),
            std::cmp::Ordering::Equal
        );
    }

    #[test]
    fn test_signed_zero_is_one_value() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let neg = FieldValue::Float(-0.0);
        let pos = FieldValue::Float(0.0);
        assert_eq!(neg, pos);
        assert_eq!(neg.cmp(&pos), std::cmp::Ordering::Equal);

        let hash = |v: &FieldValue| {
            let mut h = DefaultHasher::new();
            v.hash(&mut h);
            h.finish()
        };
        assert_eq!(hash(&neg), hash(&pos));

        let nan = FieldValue::Float(f64::NAN);
        assert_eq!(nan, nan.clone());
        assert_eq!(nan.cmp(&nan.clone()), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_record_lookup() {
        let record = Record::new().with("quality", 6).with("type", "Red");
        assert_eq!(record.number("quality"), Ok(6.0));
        assert_eq!(
            record.number("pH"),
            Err(StatsError::MissingField("pH".into()))
        );
        assert!(matches!(
            record.number("type"),
            Err(StatsError::NonNumericField { .. })
        ));
    }

    #[test]
    fn test_dataset_rejects_schema_drift() {
        let records = vec![
            Record::new().with("quality", 5).with("alcohol", 9.0),
            Record::new().with("quality", 6),
        ];
        let err = Dataset::from_records(records).unwrap_err();
        assert!(matches!(err, StatsError::SchemaMismatch { row: 1, .. }));
    }

    #[test]
    fn test_dataset_keeps_declared_order() {
        let records = vec![Record::new().with("quality", 5).with("alcohol", 9.0)];
        let ds = Dataset::new(vec!["quality".into(), "alcohol".into()], records).unwrap();
        assert_eq!(ds.schema().fields(), ["quality", "alcohol"]);
        assert_eq!(ds.len(), 1);
        assert!(ds.schema().check(&["alcohol"]).is_ok());
        assert_eq!(
            ds.schema().check(&["alcohol", "sugar"]),
            Err(StatsError::MissingField("sugar".into()))
        );
    }
}
