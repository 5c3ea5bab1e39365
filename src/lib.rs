//! Statistics over wine-quality records.
//!
//! * [`data`] – record model, loaders, synthetic generation, filtering, export
//! * [`stats`] – the aggregation engine: summaries, correlations, grouped
//!   averages, distributions
//! * [`session`] – current dataset + criteria, snapshots of every derived table
//! * [`report`] – text and JSON rendering of derived tables

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod report;
pub mod session;
pub mod stats;

pub use data::filter::{filter, FilterCriteria, QualityBucket};
pub use data::model::{Dataset, FieldValue, Record, Schema};
pub use error::StatsError;
