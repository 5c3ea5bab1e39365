use thiserror::Error;

// ---------------------------------------------------------------------------
// StatsError – failures of the aggregation engine
// ---------------------------------------------------------------------------

/// Errors raised by the data model and the aggregation engine.
///
/// The engine never papers over these with a default value. The one
/// deliberate exception is a zero-variance correlation, which yields `0.0`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// An aggregate was requested over zero records.
    #[error("cannot aggregate over an empty set of records")]
    EmptyInput,

    /// Correlation inputs differ in length.
    #[error("sequence lengths differ: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    /// Correlation needs at least `required` points.
    #[error("need at least {required} data points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// The field is not part of the record's schema.
    #[error("unknown field '{0}'")]
    MissingField(String),

    /// A numeric projection hit a text or null cell.
    #[error("field '{field}' holds non-numeric value '{value}'")]
    NonNumericField { field: String, value: String },

    /// A record's field set differs from the dataset schema.
    #[error("record {row} does not match the dataset schema (expected {expected:?}, found {found:?})")]
    SchemaMismatch {
        row: usize,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// Correlation input contained NaN or an infinity.
    #[error("non-finite value {0} in numeric input")]
    NonFiniteValue(f64),

    /// A histogram needs between one and `MAX_BINS` bins.
    #[error("histogram bin count must be between 1 and {max}, got {bins}")]
    InvalidBinCount { bins: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, StatsError>;
