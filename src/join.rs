//! Sheep-Species Filter and Observation Join
//!
//! Restricts the analysis to sheep species and joins their observation rows
//! on the natural key `scientific_name`. The species table does not enforce
//! name uniqueness, so the join can fan out: one joined row per matching
//! species row. Duplicate keys are surfaced as a warning, never absorbed.

use anyhow::Result;
use polars::prelude::*;
use rustc_hash::FxHashSet;

/// Filter species to Mammals whose common names mention sheep
///
/// Requires the derived `is_sheep` column; the substring match is
/// case-sensitive, so a Mammal without the exact marker is excluded.
pub fn filter_sheep_species(species: &DataFrame) -> Result<DataFrame> {
    let sheep = species
        .clone()
        .lazy()
        .filter(col("category").eq(lit("Mammal")).and(col("is_sheep")))
        .collect()?;

    Ok(sheep)
}

/// Inner join of observation rows against a species subset on `scientific_name`
///
/// Only observations whose scientific_name appears in the subset are kept.
/// A name occurring on multiple subset rows fans out to one joined row per
/// match; when that can happen a warning with the duplicate count is emitted.
pub fn join_observations(
    observations: &DataFrame,
    species_subset: &DataFrame,
) -> Result<DataFrame> {
    let names = species_subset.column("scientific_name")?.str()?;

    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut duplicates = 0usize;
    for name in names.into_iter().flatten() {
        if !seen.insert(name) {
            duplicates += 1;
        }
    }
    if duplicates > 0 {
        tracing::warn!(
            duplicates,
            "scientific_name is not unique in the species subset; join fans out"
        );
    }

    let joined = observations
        .clone()
        .lazy()
        .join(
            species_subset.clone().lazy(),
            [col("scientific_name")],
            [col("scientific_name")],
            JoinArgs::new(JoinType::Inner),
        )
        .collect()?;

    Ok(joined)
}

/// Sum observation counts per park
///
/// A plain sum over the joined rows (not a distinct count), sorted by park
/// name for stable display.
pub fn observations_by_park(joined: &DataFrame) -> Result<DataFrame> {
    let by_park = joined
        .clone()
        .lazy()
        .group_by([col("park_name")])
        .agg([col("observations")
            .sum()
            .cast(DataType::Int64)
            .alias("observations")])
        .sort_by_exprs([col("park_name")], Default::default())
        .collect()?;

    Ok(by_park)
}
