//! Pearson correlation and correlation matrices.
//!
//! ```text
//!            n·Σxy − Σx·Σy
//! r = ─────────────────────────────────────
//!     √((n·Σx² − (Σx)²) · (n·Σy² − (Σy)²))
//! ```
//!
//! Evaluated in the equivalent centred form `Σdx·dy / √(Σdx² · Σdy²)`,
//! which does not cancel catastrophically on large, tightly clustered values
//! such as density (~0.99). Each series is scaled by its largest magnitude
//! and the deviations by their largest magnitude before any product is
//! formed, so the sums stay in range for inputs near `1e±300`.

use serde::Serialize;

use super::column;
use crate::data::model::Record;
use crate::error::{Result, StatsError};

/// Pearson correlation coefficient of `x` and `y`, in `[-1, 1]`.
///
/// A constant sequence has no variance and yields `0.0`. That is a product
/// decision inherited from the dashboard, not a mathematical identity.
///
/// # Errors
///
/// * [`StatsError::LengthMismatch`] if the lengths differ.
/// * [`StatsError::InsufficientData`] if fewer than two points are given.
/// * [`StatsError::NonFiniteValue`] if either input holds NaN or an infinity.
pub fn correlation(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(StatsError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    let n = x.len();
    if n < 2 {
        return Err(StatsError::InsufficientData {
            required: 2,
            actual: n,
        });
    }
    if let Some(&bad) = x.iter().chain(y).find(|v| !v.is_finite()) {
        return Err(StatsError::NonFiniteValue(bad));
    }
    if is_constant(x) || is_constant(y) {
        return Ok(0.0);
    }

    let (Some(dx), Some(dy)) = (unit_deviations(x), unit_deviations(y)) else {
        return Ok(0.0);
    };

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in dx.iter().zip(&dy) {
        sxy += a * b;
        sxx += a * a;
        syy += b * b;
    }

    // Both sums are at least 1: the largest deviation is scaled to ±1.
    Ok((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Deviations from the mean, scaled so the largest has magnitude 1.
///
/// `None` when the deviations vanish after scaling.
fn unit_deviations(values: &[f64]) -> Option<Vec<f64>> {
    let scale = max_abs(values);
    if scale == 0.0 {
        return None;
    }
    let scaled: Vec<f64> = values.iter().map(|v| v / scale).collect();
    let mean = scaled.iter().sum::<f64>() / scaled.len() as f64;
    let mut deviations: Vec<f64> = scaled.iter().map(|v| v - mean).collect();
    let spread = max_abs(&deviations);
    if spread == 0.0 {
        return None;
    }
    for d in &mut deviations {
        *d /= spread;
    }
    Some(deviations)
}

fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |m: f64, v| m.max(v.abs()))
}

// ---------------------------------------------------------------------------
// CorrelationMatrix
// ---------------------------------------------------------------------------

/// Square, field-indexed table of pairwise correlations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    /// Row and column labels.
    pub fields: Vec<String>,
    /// `values[i][j]` = correlation of `fields[i]` with `fields[j]`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look a cell up by field names.
    pub fn get(&self, row: &str, col: &str) -> Result<f64> {
        let i = self.index_of(row)?;
        let j = self.index_of(col)?;
        Ok(self.values[i][j])
    }

    fn index_of(&self, field: &str) -> Result<usize> {
        self.fields
            .iter()
            .position(|f| f == field)
            .ok_or_else(|| StatsError::MissingField(field.to_string()))
    }
}

/// Correlate every ordered pair of `fields` over `records`.
///
/// Each cell is computed on its own; the symmetry of the result is a
/// property of [`correlation`], not something this function relies on.
pub fn correlation_matrix<R: AsRef<Record>>(
    records: &[R],
    fields: &[&str],
) -> Result<CorrelationMatrix> {
    let columns = fields
        .iter()
        .map(|f| column(records, f))
        .collect::<Result<Vec<_>>>()?;

    let mut values = Vec::with_capacity(fields.len());
    for x in &columns {
        let row = columns
            .iter()
            .map(|y| correlation(x, y))
            .collect::<Result<Vec<_>>>()?;
        values.push(row);
    }

    Ok(CorrelationMatrix {
        fields: fields.iter().map(|f| f.to_string()).collect(),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn test_perfect_positive() {
        let r = correlation(&[1.0, 2.0, 3.0, 4.0], &[2.0, 4.0, 6.0, 8.0]).unwrap();
        assert!(close(r, 1.0), "r = {r}");
    }

    #[test]
    fn test_perfect_negative() {
        let r = correlation(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap();
        assert!(close(r, -1.0), "r = {r}");
    }

    #[test]
    fn test_zero_variance_is_zero() {
        assert_eq!(correlation(&[5.0, 5.0, 5.0], &[1.0, 2.0, 3.0]), Ok(0.0));
        assert_eq!(correlation(&[1.0, 2.0, 3.0], &[0.1, 0.1, 0.1]), Ok(0.0));
    }

    #[test]
    fn test_self_correlation_is_one() {
        let x = [0.9978, 0.9968, 0.997, 0.998, 0.9964, 0.9946];
        let r = correlation(&x, &x).unwrap();
        assert!(close(r, 1.0), "r = {r}");
    }

    #[test]
    fn test_symmetric_and_bounded() {
        let x = [7.4, 7.8, 11.2, 6.7, 8.1, 5.6];
        let y = [9.4, 9.8, 9.8, 10.5, 9.2, 12.9];
        let xy = correlation(&x, &y).unwrap();
        let yx = correlation(&y, &x).unwrap();
        assert_eq!(xy, yx);
        assert!((-1.0..=1.0).contains(&xy));
    }

    #[test]
    fn test_length_mismatch() {
        assert_eq!(
            correlation(&[1.0, 2.0], &[1.0, 2.0, 3.0]),
            Err(StatsError::LengthMismatch { left: 2, right: 3 })
        );
    }

    #[test]
    fn test_insufficient_data() {
        assert_eq!(
            correlation(&[1.0], &[2.0]),
            Err(StatsError::InsufficientData {
                required: 2,
                actual: 1
            })
        );
        assert_eq!(
            correlation(&[], &[]),
            Err(StatsError::InsufficientData {
                required: 2,
                actual: 0
            })
        );
    }

    #[test]
    fn test_extreme_magnitudes_self_correlate() {
        for x in [[1e200, -1e200, 3e199], [1e-200, 2e-200, 3e-200]] {
            let r = correlation(&x, &x).unwrap();
            assert!(close(r, 1.0), "{x:?}: r = {r}");
            let neg: Vec<f64> = x.iter().map(|v| -v).collect();
            let r = correlation(&x, &neg).unwrap();
            assert!(close(r, -1.0), "{x:?}: r = {r}");
        }
    }

    #[test]
    fn test_extreme_magnitudes_match_rescaled() {
        let x = [1.0, 3.0, 2.0, 5.0];
        let y = [2.0, 1.0, 4.0, 3.0];
        let expected = correlation(&x, &y).unwrap();
        let big: Vec<f64> = x.iter().map(|v| v * 1e300).collect();
        let tiny: Vec<f64> = y.iter().map(|v| v * 1e-300).collect();
        let r = correlation(&big, &tiny).unwrap();
        assert!((r - expected).abs() < 1e-9, "{r} vs {expected}");
    }

    #[test]
    fn test_non_finite_input_is_error() {
        assert!(matches!(
            correlation(&[1.0, f64::NAN, 3.0], &[1.0, 2.0, 3.0]),
            Err(StatsError::NonFiniteValue(v)) if v.is_nan()
        ));
        assert_eq!(
            correlation(&[1.0, 2.0], &[f64::INFINITY, 0.0]),
            Err(StatsError::NonFiniteValue(f64::INFINITY))
        );
    }

    fn sample() -> Vec<Record> {
        [(9.4, 5, 3.51), (9.8, 5, 3.2), (11.0, 7, 3.16), (12.8, 8, 3.3), (10.5, 6, 3.51)]
            .into_iter()
            .map(|(alcohol, quality, ph)| {
                Record::new()
                    .with("alcohol", alcohol)
                    .with("quality", quality)
                    .with("pH", ph)
            })
            .collect()
    }

    #[test]
    fn test_matrix_shape_and_diagonal() {
        let records = sample();
        let fields = ["alcohol", "quality", "pH"];
        let m = correlation_matrix(&records, &fields).unwrap();

        assert_eq!(m.len(), 3);
        assert!(m.values.iter().all(|row| row.len() == 3));
        for i in 0..3 {
            assert!(close(m.values[i][i], 1.0));
            for j in 0..3 {
                assert_eq!(m.values[i][j], m.values[j][i]);
            }
        }
        assert!(m.get("alcohol", "quality").unwrap() > 0.9);
        assert_eq!(
            m.get("alcohol", "sugar"),
            Err(StatsError::MissingField("sugar".into()))
        );
    }

    #[test]
    fn test_matrix_needs_two_records() {
        let records = sample();
        let view: Vec<&Record> = records.iter().take(1).collect();
        assert!(matches!(
            correlation_matrix(&view, &["alcohol", "pH"]),
            Err(StatsError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_matrix_unknown_field() {
        let records = sample();
        assert_eq!(
            correlation_matrix(&records, &["alcohol", "density"]),
            Err(StatsError::MissingField("density".into()))
        );
    }
}
