//! Command-line interface argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::data::filter::QualityBucket;

/// vinostat - statistics over wine-quality data
///
/// Loads a CSV, JSON or Parquet file (or generates synthetic records),
/// applies the quality/alcohol filter and prints the derived tables.
///
/// Examples:
///   vinostat --input winequality.csv
///   vinostat --input winequality.csv --quality 6-7 --max-alcohol 11.5 correlation
///   vinostat --synthetic 500 --format json grouped
///   vinostat --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Data file to load (.csv, .json, .parquet)
    #[arg(short, long, value_name = "FILE", conflicts_with = "synthetic")]
    pub input: Option<PathBuf>,

    /// Generate this many synthetic records instead of loading a file
    #[arg(long, value_name = "COUNT")]
    pub synthetic: Option<usize>,

    /// Seed for synthetic generation
    #[arg(long, env = "VINOSTAT_SEED")]
    pub seed: Option<u64>,

    /// Configuration file (defaults to ./vinostat.toml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Quality bucket: all, 3-5, 6-7 or 8-9
    #[arg(short, long, value_name = "BUCKET")]
    pub quality: Option<QualityBucket>,

    /// Inclusive alcohol ceiling (% vol)
    #[arg(long, value_name = "PERCENT")]
    pub max_alcohol: Option<f64>,

    /// Keep rows with empty cells instead of dropping them
    #[arg(long)]
    pub keep_incomplete: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Write a default vinostat.toml and exit
    #[arg(long)]
    pub init_config: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Which table to print. Defaults to the full report.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Everything below, computed over the filtered view
    Report,
    /// Record count, average quality and alcohol, quality range
    Overview,
    /// Count/mean/min/max per field
    Summary {
        /// Fields to summarize (defaults to the correlation fields)
        fields: Vec<String>,
    },
    /// Pearson correlation matrix
    Correlation {
        /// Fields of the matrix (defaults to the configured list)
        fields: Vec<String>,
    },
    /// Per-group averages
    Grouped {
        /// Grouping field
        #[arg(long)]
        by: Option<String>,
        /// Averaged fields (defaults to the configured heatmap fields)
        fields: Vec<String>,
    },
    /// Equal-width histogram of one field
    Histogram {
        /// Field to bin
        field: Option<String>,
        /// Number of bins (1 to 10000)
        #[arg(long)]
        bins: Option<usize>,
    },
    /// Occurrences of each distinct value
    Counts {
        /// Field to count (defaults to quality)
        field: Option<String>,
    },
    /// Numeric projection for 2D/3D scatter plots
    Scatter {
        /// Two or three fields: x, y and optionally z
        #[arg(num_args = 2..=3, required = true)]
        fields: Vec<String>,
    },
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text tables
    Text,
    /// Pretty-printed JSON
    Json,
}
