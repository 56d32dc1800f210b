//! Analysis Configuration
//!
//! File locations for the two source tables and the chart output directory.
//! Loaded from an optional JSON file; defaults point at the conventional
//! `data/` layout.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Paths used by a single analysis run
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Species metadata table (category, scientific_name, common_names, conservation_status)
    pub species_path: PathBuf,

    /// Weekly observation counts (scientific_name, park_name, observations)
    pub observations_path: PathBuf,

    /// Directory the rendered charts are written to
    pub output_dir: PathBuf,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            species_path: PathBuf::from("data/species_info.csv"),
            observations_path: PathBuf::from("data/observations.csv"),
            output_dir: PathBuf::from("target/charts"),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a JSON file
    ///
    /// Missing keys fall back to the defaults above.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        serde_json::from_str(&contents).with_context(|| "Failed to parse config JSON")
    }
}
