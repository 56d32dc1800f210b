//! Analysis Coordinator
//!
//! Runs the full pipeline in order: normalize, aggregate, test, join, sum.
//! Every intermediate result lands in `AnalysisReport` so the caller (binary
//! or test) can print, chart, or assert against it.

use crate::aggregate::{
    group_and_count_unique, pivot_to_dataframe, protection_pivot, sort_by_count,
    CategoryProtection,
};
use crate::config::AnalysisConfig;
use crate::data::ParkData;
use crate::join::{filter_sheep_species, join_observations, observations_by_park};
use crate::normalize::{
    normalize_conservation_status, split_common_names, warn_unknown_statuses, with_derived_flags,
};
use crate::stats::{chi2_contingency, Chi2Result, ContingencyTable};
use anyhow::Result;
use polars::prelude::DataFrame;
use rustc_hash::FxHashSet;

/// Protected / not-protected species counts for Mammals (row 0) vs Birds
/// (row 1), hand-entered from the published analysis
pub const MAMMAL_VS_BIRD: ContingencyTable = [[30, 146], [75, 413]];

/// Protected / not-protected species counts for Mammals (row 0) vs Reptiles
/// (row 1), hand-entered from the published analysis
pub const REPTILE_VS_MAMMAL: ContingencyTable = [[30, 146], [5, 73]];

/// Main analysis coordinator
pub struct BiodiversityAnalysis {
    config: AnalysisConfig,
    data: ParkData,
}

/// Every intermediate result of one pipeline run
pub struct AnalysisReport {
    /// Distinct species per conservation status, sorted by status label
    pub conservation_counts: DataFrame,

    /// Same aggregate re-ranked ascending by species count
    pub ranked_conservation_counts: DataFrame,

    /// Distinct species per (category, is_protected) combination
    pub category_protection_counts: DataFrame,

    /// Typed pivot of the aggregate above with percent_protected
    pub protection_pivot: Vec<CategoryProtection>,

    /// Chi-squared comparison of Mammal vs Bird protection rates
    pub mammal_vs_bird: Chi2Result,

    /// Chi-squared comparison of Mammal vs Reptile protection rates
    pub reptile_vs_mammal: Chi2Result,

    /// Mammal species whose common names mention sheep
    pub sheep_species: DataFrame,

    /// Observation rows joined against the sheep subset
    pub sheep_observations: DataFrame,

    /// Summed weekly sheep observations per park
    pub observations_by_park: DataFrame,
}

impl BiodiversityAnalysis {
    /// Load both tables and set up a run
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        let data = ParkData::load(&config)?;
        Ok(Self { config, data })
    }

    /// Configuration this analysis was created with
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Loaded source tables
    pub fn data(&self) -> &ParkData {
        &self.data
    }

    /// Execute the full pipeline
    pub fn run(&self) -> Result<AnalysisReport> {
        // Stage 1: normalize statuses, then derive the boolean flags
        let species = normalize_conservation_status(&self.data.species)?;
        warn_unknown_statuses(&species)?;
        let species = with_derived_flags(&species)?;

        // Stage 2: conservation-status aggregate, plus the count-ranked view
        let conservation_counts =
            group_and_count_unique(&species, &["conservation_status"], "scientific_name")?;
        let ranked_conservation_counts = sort_by_count(&conservation_counts)?;

        // Stage 3: category x protection aggregate and its typed pivot
        let category_protection_counts =
            group_and_count_unique(&species, &["category", "is_protected"], "scientific_name")?;
        let protection_pivot = protection_pivot(&category_protection_counts)?;

        // Stage 4: independence tests on the fixed comparison tables
        let mammal_vs_bird = chi2_contingency(&MAMMAL_VS_BIRD)?;
        let reptile_vs_mammal = chi2_contingency(&REPTILE_VS_MAMMAL)?;

        // Stage 5: sheep subset, observation join, per-park sums
        let sheep_species = filter_sheep_species(&species)?;
        let sheep_observations = join_observations(&self.data.observations, &sheep_species)?;
        let observations_by_park = observations_by_park(&sheep_observations)?;

        Ok(AnalysisReport {
            conservation_counts,
            ranked_conservation_counts,
            category_protection_counts,
            protection_pivot,
            mammal_vs_bird,
            reptile_vs_mammal,
            sheep_species,
            sheep_observations,
            observations_by_park,
        })
    }
}

impl AnalysisReport {
    /// Distinct common names across the sheep subset, sorted
    pub fn sheep_common_names(&self) -> Result<Vec<String>> {
        let cells = self.sheep_species.column("common_names")?.str()?;

        let mut distinct: FxHashSet<String> = FxHashSet::default();
        for cell in cells.into_iter().flatten() {
            for name in split_common_names(cell) {
                distinct.insert(name);
            }
        }

        let mut names: Vec<String> = distinct.into_iter().collect();
        names.sort();
        Ok(names)
    }

    /// Print every intermediate table to stdout
    pub fn print(&self) -> Result<()> {
        println!("Species per conservation status:");
        println!("{}", self.conservation_counts);

        println!("Ranked by species count:");
        println!("{}", self.ranked_conservation_counts);

        println!("Species per category and protection:");
        println!("{}", self.category_protection_counts);

        println!("Protection pivot:");
        println!("{}", pivot_to_dataframe(&self.protection_pivot)?);

        Self::print_chi2("Mammal vs Bird", &self.mammal_vs_bird);
        Self::print_chi2("Mammal vs Reptile", &self.reptile_vs_mammal);

        println!("Sheep species:");
        println!("{}", self.sheep_species);
        println!("Sheep common names: {}", self.sheep_common_names()?.join(", "));

        println!("Sheep observations per park:");
        println!("{}", self.observations_by_park);

        Ok(())
    }

    fn print_chi2(comparison: &str, result: &Chi2Result) {
        println!(
            "{}: chi2 = {:.4}, p = {:.4}, dof = {} ({})",
            comparison,
            result.statistic,
            result.p_value,
            result.degrees_of_freedom,
            if result.is_significant() {
                "significant at 5%"
            } else {
                "not significant at 5%"
            }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_tables_match_expectations() {
        // The published analysis: Mammal vs Bird is not significant,
        // Mammal vs Reptile is
        let mammal_vs_bird = chi2_contingency(&MAMMAL_VS_BIRD).unwrap();
        assert!(!mammal_vs_bird.is_significant());

        let reptile_vs_mammal = chi2_contingency(&REPTILE_VS_MAMMAL).unwrap();
        assert!(reptile_vs_mammal.is_significant());
    }
}
