//! Conservation Status Normalization and Derived Flags
//!
//! The source table leaves `conservation_status` blank for species without a
//! recorded status. The sentinel `"No Intervention"` stands in for "no status"
//! inside the column's value domain; the `ConservationStatus` enum is the typed
//! view that keeps real statuses distinct from the sentinel.

use anyhow::Result;
use polars::prelude::*;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

/// Sentinel label for species with no recorded conservation status
pub const NO_INTERVENTION: &str = "No Intervention";

/// Substring matched against `common_names` to flag sheep species (case-sensitive)
pub const SHEEP_MARKER: &str = "Sheep";

/// A recorded conservation status
///
/// "No status" is represented as `None` at the type level, never as a variant;
/// the sentinel only exists in the display/column domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConservationStatus {
    SpeciesOfConcern,
    Threatened,
    Endangered,
    InRecovery,
}

impl ConservationStatus {
    /// All statuses the source vocabulary defines
    pub const ALL: [ConservationStatus; 4] = [
        ConservationStatus::SpeciesOfConcern,
        ConservationStatus::Threatened,
        ConservationStatus::Endangered,
        ConservationStatus::InRecovery,
    ];

    /// Parse a column label; the sentinel and unknown labels are `None`
    pub fn parse(label: &str) -> Option<ConservationStatus> {
        match label {
            "Species of Concern" => Some(ConservationStatus::SpeciesOfConcern),
            "Threatened" => Some(ConservationStatus::Threatened),
            "Endangered" => Some(ConservationStatus::Endangered),
            "In Recovery" => Some(ConservationStatus::InRecovery),
            _ => None,
        }
    }

    /// Display label as it appears in the source table
    pub fn label(&self) -> &'static str {
        match self {
            ConservationStatus::SpeciesOfConcern => "Species of Concern",
            ConservationStatus::Threatened => "Threatened",
            ConservationStatus::Endangered => "Endangered",
            ConservationStatus::InRecovery => "In Recovery",
        }
    }
}

/// Fill missing `conservation_status` values with the sentinel
///
/// Other columns are untouched. Idempotent: running it on an already
/// normalized frame is a no-op.
pub fn normalize_conservation_status(species: &DataFrame) -> Result<DataFrame> {
    let normalized = species
        .clone()
        .lazy()
        .with_columns([col("conservation_status").fill_null(lit(NO_INTERVENTION))])
        .collect()?;

    Ok(normalized)
}

/// Add the `is_protected` and `is_sheep` boolean columns
///
/// Non-destructive: every original column is retained. A species is protected
/// when its status is anything other than the sentinel; a species is a sheep
/// when `common_names` contains the literal substring `"Sheep"`.
pub fn with_derived_flags(species: &DataFrame) -> Result<DataFrame> {
    let flagged = species
        .clone()
        .lazy()
        .with_columns([
            col("conservation_status")
                .neq(lit(NO_INTERVENTION))
                .fill_null(lit(false))
                .alias("is_protected"),
            col("common_names")
                .str()
                .contains_literal(lit(SHEEP_MARKER))
                .fill_null(lit(false))
                .alias("is_sheep"),
        ])
        .collect()?;

    Ok(flagged)
}

/// Warn once per status label outside the known vocabulary
///
/// Call after normalization; the sentinel is expected and not reported.
pub fn warn_unknown_statuses(species: &DataFrame) -> Result<()> {
    let statuses = species.column("conservation_status")?.str()?;

    let mut unknown: FxHashSet<&str> = FxHashSet::default();
    for status in statuses.into_iter().flatten() {
        if status != NO_INTERVENTION && ConservationStatus::parse(status).is_none() {
            unknown.insert(status);
        }
    }

    for status in unknown {
        tracing::warn!(status, "conservation_status outside the known vocabulary");
    }

    Ok(())
}

/// Split a `common_names` cell into its individual names
///
/// Names are comma-separated in the source table; surrounding whitespace is
/// trimmed and empty segments are skipped.
pub fn split_common_names(raw: &str) -> SmallVec<[String; 4]> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}
