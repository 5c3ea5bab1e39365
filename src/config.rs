//! Configuration file handling.
//!
//! Settings come from `vinostat.toml` (or `--config <FILE>`); command-line
//! flags override them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::data::filter::FilterCriteria;
use crate::data::loader::LoadOptions;
use crate::data::model::QUALITY_FIELD;
use crate::data::synthetic::DEFAULT_SAMPLE_COUNT;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "vinostat.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where records come from.
    #[serde(default)]
    pub data: DataConfig,

    /// Initial filter criteria.
    #[serde(default)]
    pub filter: FilterCriteria,

    /// Which fields the derived tables cover.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Data source settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// CSV, JSON or Parquet file. Synthetic records are generated when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Number of synthetic records.
    #[serde(default = "default_synthetic_count")]
    pub synthetic_count: usize,

    /// Seed for the synthetic generator.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Drop rows with empty cells while loading.
    #[serde(default = "default_true")]
    pub drop_incomplete: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: None,
            synthetic_count: default_synthetic_count(),
            seed: default_seed(),
            drop_incomplete: true,
        }
    }
}

impl DataConfig {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            drop_incomplete: self.drop_incomplete,
        }
    }
}

fn default_synthetic_count() -> usize {
    DEFAULT_SAMPLE_COUNT
}

fn default_seed() -> u64 {
    42
}

fn default_true() -> bool {
    true
}

/// Field selection for the derived tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Fields of the correlation matrix.
    #[serde(default = "default_correlation_fields")]
    pub correlation_fields: Vec<String>,

    /// Field whose distinct values key the group-average table.
    #[serde(default = "default_group_field")]
    pub group_field: String,

    /// Columns of the group-average table.
    #[serde(default = "default_heatmap_fields")]
    pub heatmap_fields: Vec<String>,

    /// Field binned by the histogram.
    #[serde(default = "default_histogram_field")]
    pub histogram_field: String,

    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            correlation_fields: default_correlation_fields(),
            group_field: default_group_field(),
            heatmap_fields: default_heatmap_fields(),
            histogram_field: default_histogram_field(),
            histogram_bins: default_histogram_bins(),
        }
    }
}

fn default_correlation_fields() -> Vec<String> {
    [
        "fixed acidity",
        "volatile acidity",
        "citric acid",
        "alcohol",
        "pH",
        "quality",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_group_field() -> String {
    QUALITY_FIELD.to_string()
}

fn default_heatmap_fields() -> Vec<String> {
    [
        "fixed acidity",
        "volatile acidity",
        "citric acid",
        "residual sugar",
        "pH",
        "alcohol",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_histogram_field() -> String {
    "alcohol".to_string()
}

fn default_histogram_bins() -> usize {
    20
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only flags that were actually given override file settings.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref input) = args.input {
            self.data.path = Some(input.clone());
        }
        if let Some(count) = args.synthetic {
            self.data.path = None;
            self.data.synthetic_count = count;
        }
        if let Some(seed) = args.seed {
            self.data.seed = seed;
        }
        if args.keep_incomplete {
            self.data.drop_incomplete = false;
        }
        if let Some(quality) = args.quality {
            self.filter.quality = quality;
        }
        if let Some(max_alcohol) = args.max_alcohol {
            self.filter.max_alcohol = max_alcohol;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> Result<String> {
        toml::to_string_pretty(&Config::default()).context("serializing default config")
    }
}
