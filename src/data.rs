//! Data Loading and Management
//!
//! Reads the species metadata and observation tables from CSV using Polars.
//! Rows missing a required key column are dropped and counted rather than
//! silently discarded; a missing file is fatal.

use crate::config::AnalysisConfig;
use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;

/// Species metadata columns required on every row
const SPECIES_REQUIRED: &[&str] = &["scientific_name"];

/// Observation columns required on every row (join key, group key, count)
const OBSERVATIONS_REQUIRED: &[&str] = &["scientific_name", "park_name", "observations"];

/// Main data holder for the analysis
///
/// Both tables are loaded eagerly; the pipeline never re-reads the files.
pub struct ParkData {
    /// Species metadata (category, scientific_name, common_names, conservation_status)
    pub species: DataFrame,

    /// Weekly observation counts per park and species
    pub observations: DataFrame,

    /// Species rows dropped for missing a required column
    pub skipped_species_rows: usize,

    /// Observation rows dropped for missing a required column
    pub skipped_observation_rows: usize,
}

impl ParkData {
    /// Load both source tables
    pub fn load(config: &AnalysisConfig) -> Result<Self> {
        let species_raw = Self::read_csv(&config.species_path)?;
        let (species, skipped_species_rows) =
            Self::drop_malformed(&species_raw, SPECIES_REQUIRED)?;

        let observations_raw = Self::read_csv(&config.observations_path)?;
        let (observations, skipped_observation_rows) =
            Self::drop_malformed(&observations_raw, OBSERVATIONS_REQUIRED)?;

        if skipped_species_rows > 0 {
            tracing::warn!(
                skipped = skipped_species_rows,
                table = "species",
                "dropped rows missing a required column"
            );
        }
        if skipped_observation_rows > 0 {
            tracing::warn!(
                skipped = skipped_observation_rows,
                table = "observations",
                "dropped rows missing a required column"
            );
        }

        tracing::info!(
            species = species.height(),
            observations = observations.height(),
            "datasets loaded"
        );

        Ok(ParkData {
            species,
            observations,
            skipped_species_rows,
            skipped_observation_rows,
        })
    }

    /// Read one table from CSV with headers
    fn read_csv(path: &Path) -> Result<DataFrame> {
        CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .with_context(|| format!("Failed to create CSV reader: {:?}", path))?
            .finish()
            .with_context(|| format!("Failed to load table: {:?}", path))
    }

    /// Drop rows with a null in any required column, returning the kept frame
    /// and the number of rows removed
    fn drop_malformed(df: &DataFrame, required: &[&str]) -> Result<(DataFrame, usize)> {
        let mut kept = df.clone().lazy();
        for column in required {
            kept = kept.filter(col(*column).is_not_null());
        }
        let kept = kept
            .collect()
            .with_context(|| format!("Required columns missing from table: {:?}", required))?;

        let skipped = df.height() - kept.height();
        Ok((kept, skipped))
    }
}
