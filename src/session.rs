use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::data::filter::{filtered_indices, FilterCriteria};
use crate::data::model::{Dataset, Record, QUALITY_FIELD};
use crate::error::StatsError;
use crate::stats::{
    correlation_matrix, grouped_average, histogram, overview, value_counts, CorrelationMatrix,
    GroupedAverages, Histogram, Overview, ValueCount,
};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Current dataset plus current filter criteria.
///
/// The only stateful piece of the crate; everything it derives comes from
/// the pure functions in [`crate::stats`].
#[derive(Debug, Default)]
pub struct Session {
    /// Loaded dataset (None until one is set).
    dataset: Option<Dataset>,

    /// Active filter criteria.
    criteria: FilterCriteria,

    /// Indices of records passing the current criteria (cached).
    visible_indices: Vec<usize>,
}

/// Every derived table for the current view.
///
/// Tables that need a non-empty view (or two records, for correlations)
/// are `None` when the view is too small.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub criteria: FilterCriteria,
    pub overview: Option<Overview>,
    pub quality_counts: Vec<ValueCount>,
    pub correlation: Option<CorrelationMatrix>,
    pub averages: GroupedAverages,
    pub histogram: Option<Histogram>,
}

impl Session {
    pub fn new(criteria: FilterCriteria) -> Self {
        Self {
            criteria,
            ..Self::default()
        }
    }

    /// Ingest a newly loaded dataset and filter it with the current criteria.
    pub fn set_dataset(&mut self, dataset: Dataset) -> Result<()> {
        self.visible_indices = filtered_indices(dataset.records(), &self.criteria)
            .context("filtering new dataset")?;
        log::info!(
            "Dataset of {} records set, {} visible",
            dataset.len(),
            self.visible_indices.len()
        );
        self.dataset = Some(dataset);
        Ok(())
    }

    /// Replace the criteria and recompute the view.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) -> Result<()> {
        self.criteria = criteria;
        self.refilter()
    }

    /// Recompute `visible_indices` after a criteria change.
    fn refilter(&mut self) -> Result<()> {
        if let Some(ds) = &self.dataset {
            self.visible_indices =
                filtered_indices(ds.records(), &self.criteria).context("applying filter")?;
            log::debug!(
                "Filter {} / alcohol <= {}: {} of {} records visible",
                self.criteria.quality,
                self.criteria.max_alcohol,
                self.visible_indices.len(),
                ds.len()
            );
        }
        Ok(())
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// The filtered view, in dataset order.
    pub fn visible_records(&self) -> Vec<&Record> {
        match &self.dataset {
            Some(ds) => self
                .visible_indices
                .iter()
                .map(|&i| &ds.records()[i])
                .collect(),
            None => Vec::new(),
        }
    }

    /// Compute every derived table for the current view.
    pub fn snapshot(&self, analysis: &AnalysisConfig) -> Result<Snapshot> {
        let view = self.visible_records();

        let correlation_fields: Vec<&str> =
            analysis.correlation_fields.iter().map(String::as_str).collect();
        let heatmap_fields: Vec<&str> =
            analysis.heatmap_fields.iter().map(String::as_str).collect();

        let snapshot = Snapshot {
            criteria: self.criteria,
            overview: too_small_as_none(overview(&view)).context("overview")?,
            quality_counts: value_counts(&view, QUALITY_FIELD).context("quality counts")?,
            correlation: too_small_as_none(correlation_matrix(&view, &correlation_fields))
                .context("correlation matrix")?,
            averages: grouped_average(&view, &analysis.group_field, &heatmap_fields)
                .context("grouped averages")?,
            histogram: too_small_as_none(histogram(
                &view,
                &analysis.histogram_field,
                analysis.histogram_bins,
            ))
            .context("histogram")?,
        };
        Ok(snapshot)
    }
}

/// Map "view too small" errors to `None`, keep every other error.
fn too_small_as_none<T>(result: crate::error::Result<T>) -> crate::error::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(StatsError::EmptyInput) | Err(StatsError::InsufficientData { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::QualityBucket;
    use crate::data::synthetic;

    fn small_dataset() -> Dataset {
        let records = vec![
            Record::new().with("quality", 8).with("alcohol", 9.5).with("pH", 3.1),
            Record::new().with("quality", 6).with("alcohol", 9.0).with("pH", 3.3),
            Record::new().with("quality", 5).with("alcohol", 11.0).with("pH", 3.5),
        ];
        Dataset::from_records(records).unwrap()
    }

    fn small_analysis() -> AnalysisConfig {
        AnalysisConfig {
            correlation_fields: vec!["alcohol".into(), "pH".into()],
            heatmap_fields: vec!["alcohol".into()],
            histogram_bins: 2,
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn test_criteria_change_refilters() {
        let mut session = Session::default();
        session.set_dataset(small_dataset()).unwrap();
        assert_eq!(session.visible_records().len(), 3);

        session
            .set_criteria(FilterCriteria::new(QualityBucket::High, 10.0))
            .unwrap();
        let view = session.visible_records();
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].number("quality").unwrap(), 8.0);

        session.set_criteria(FilterCriteria::default()).unwrap();
        assert_eq!(session.visible_records().len(), 3);
    }

    #[test]
    fn test_no_dataset_has_empty_view() {
        let mut session = Session::new(FilterCriteria::new(QualityBucket::Low, 12.0));
        session.set_criteria(FilterCriteria::default()).unwrap();
        assert!(session.visible_records().is_empty());
        assert!(session.dataset().is_none());
    }

    #[test]
    fn test_snapshot_of_single_record_view() {
        let mut session = Session::new(FilterCriteria::new(QualityBucket::High, 10.0));
        session.set_dataset(small_dataset()).unwrap();

        let snap = session.snapshot(&small_analysis()).unwrap();
        assert_eq!(snap.overview.unwrap().total, 1);
        assert!(snap.correlation.is_none());
        assert_eq!(snap.averages.rows.len(), 1);
        assert_eq!(snap.histogram.unwrap().total(), 1);
    }

    #[test]
    fn test_snapshot_of_empty_view() {
        let mut session = Session::new(FilterCriteria::new(QualityBucket::Low, 8.0));
        session.set_dataset(small_dataset()).unwrap();

        let snap = session.snapshot(&small_analysis()).unwrap();
        assert!(snap.overview.is_none());
        assert!(snap.quality_counts.is_empty());
        assert!(snap.averages.rows.is_empty());
        assert!(snap.histogram.is_none());
    }

    #[test]
    fn test_snapshot_propagates_unknown_fields() {
        let mut session = Session::default();
        session.set_dataset(small_dataset()).unwrap();

        let analysis = AnalysisConfig {
            correlation_fields: vec!["density".into()],
            ..small_analysis()
        };
        assert!(session.snapshot(&analysis).is_err());
    }

    #[test]
    fn test_snapshot_over_synthetic_data() {
        let mut session = Session::default();
        session
            .set_dataset(synthetic::generate(300, 5).unwrap())
            .unwrap();

        let snap = session.snapshot(&AnalysisConfig::default()).unwrap();
        let matrix = snap.correlation.unwrap();
        assert_eq!(matrix.len(), 6);
        assert_eq!(snap.averages.rows.len(), 7);
        assert_eq!(snap.histogram.unwrap().counts.len(), 20);
        let counted: usize = snap.quality_counts.iter().map(|c| c.count).sum();
        assert_eq!(counted, 300);
    }
}
