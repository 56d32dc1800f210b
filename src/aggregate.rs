//! Grouped Distinct-Count Aggregation and the Protection Pivot
//!
//! Long-form aggregates are plain DataFrames; the pivot is a typed
//! transformation with a fixed output schema because the column domain
//! (protected / not protected) is known ahead of time.

use anyhow::Result;
use polars::prelude::*;
use rustc_hash::FxHashMap;

/// Name of the count column produced by [`group_and_count_unique`]
pub const COUNT_COLUMN: &str = "n_unique";

/// One row of the protection pivot
///
/// `percent_protected` is 0 when both counts are zero; it never divides by zero.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryProtection {
    pub category: String,
    pub protected: u32,
    pub not_protected: u32,
    pub percent_protected: f64,
}

/// Count distinct `distinct_field` values per combination of `group_by` keys
///
/// Duplicate values within a group count once. Output is sorted ascending by
/// the group key(s); combinations with no matching records are absent, not
/// zero. The count lands in the [`COUNT_COLUMN`] column.
pub fn group_and_count_unique(
    df: &DataFrame,
    group_by: &[&str],
    distinct_field: &str,
) -> Result<DataFrame> {
    let keys: Vec<Expr> = group_by.iter().map(|name| col(*name)).collect();

    let grouped = df
        .clone()
        .lazy()
        .group_by(keys.clone())
        .agg([col(distinct_field)
            .n_unique()
            .cast(DataType::UInt32)
            .alias(COUNT_COLUMN)])
        .sort_by_exprs(keys, Default::default())
        .collect()?;

    Ok(grouped)
}

/// Re-sort an aggregate ascending by its count column
///
/// Used once, to rank conservation categories by species count.
pub fn sort_by_count(aggregate: &DataFrame) -> Result<DataFrame> {
    let sorted = aggregate
        .clone()
        .lazy()
        .sort_by_exprs([col(COUNT_COLUMN)], Default::default())
        .collect()?;

    Ok(sorted)
}

/// Reshape the (category, is_protected) aggregate into typed pivot rows
///
/// Absent category x flag cells are zero-filled. Rows come back sorted by
/// category for stable display.
pub fn protection_pivot(category_counts: &DataFrame) -> Result<Vec<CategoryProtection>> {
    let categories = category_counts.column("category")?.str()?;
    let flags = category_counts.column("is_protected")?.bool()?;
    let counts = category_counts.column(COUNT_COLUMN)?.u32()?;

    let mut cells: FxHashMap<String, (u32, u32)> = FxHashMap::default();
    for idx in 0..category_counts.height() {
        let (Some(category), Some(protected), Some(count)) =
            (categories.get(idx), flags.get(idx), counts.get(idx))
        else {
            continue;
        };

        let cell = cells.entry(category.to_string()).or_insert((0, 0));
        if protected {
            cell.0 = count;
        } else {
            cell.1 = count;
        }
    }

    let mut rows: Vec<CategoryProtection> = cells
        .into_iter()
        .map(|(category, (protected, not_protected))| CategoryProtection {
            category,
            protected,
            not_protected,
            percent_protected: percent_protected(protected, not_protected),
        })
        .collect();
    rows.sort_by(|a, b| a.category.cmp(&b.category));

    Ok(rows)
}

/// Render pivot rows back into a DataFrame for tabular display
pub fn pivot_to_dataframe(rows: &[CategoryProtection]) -> Result<DataFrame> {
    let categories: Vec<&str> = rows.iter().map(|r| r.category.as_str()).collect();
    let protected: Vec<u32> = rows.iter().map(|r| r.protected).collect();
    let not_protected: Vec<u32> = rows.iter().map(|r| r.not_protected).collect();
    let percents: Vec<f64> = rows.iter().map(|r| r.percent_protected).collect();

    let df = df!(
        "category" => categories,
        "protected" => protected,
        "not_protected" => not_protected,
        "percent_protected" => percents,
    )?;

    Ok(df)
}

fn percent_protected(protected: u32, not_protected: u32) -> f64 {
    let denominator = protected + not_protected;
    if denominator == 0 {
        return 0.0;
    }
    protected as f64 / denominator as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flagged_species() -> DataFrame {
        df!(
            "category" => ["Mammal", "Mammal", "Mammal", "Bird", "Bird"],
            // Duplicate scientific_name within the Mammal/protected group
            "scientific_name" => [
                "Ovis canadensis", "Ovis canadensis", "Canis lupus",
                "Haliaeetus leucocephalus", "Falco peregrinus",
            ],
            "is_protected" => [true, true, false, true, false],
        )
        .unwrap()
    }

    #[test]
    fn test_duplicates_count_once() {
        let counts =
            group_and_count_unique(&flagged_species(), &["category", "is_protected"], "scientific_name")
                .unwrap();

        // Bird/false, Bird/true, Mammal/false, Mammal/true
        assert_eq!(counts.height(), 4);

        let values = counts.column(COUNT_COLUMN).unwrap().u32().unwrap();
        for idx in 0..counts.height() {
            assert_eq!(values.get(idx), Some(1));
        }
    }

    #[test]
    fn test_counts_sum_to_overall_distinct_when_key_partitions() {
        let counts =
            group_and_count_unique(&flagged_species(), &["category"], "scientific_name").unwrap();

        let total: u32 = counts
            .column(COUNT_COLUMN)
            .unwrap()
            .u32()
            .unwrap()
            .into_iter()
            .flatten()
            .sum();

        // No scientific_name spans two categories, so groups partition the data
        assert_eq!(total as usize, 4);
    }

    #[test]
    fn test_empty_groups_are_absent() {
        let counts =
            group_and_count_unique(&flagged_species(), &["category"], "scientific_name").unwrap();

        let categories: Vec<&str> = counts
            .column("category")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(categories, ["Bird", "Mammal"]);
    }

    #[test]
    fn test_sort_by_count_ascending() {
        let df = df!(
            "conservation_status" => ["Endangered", "Species of Concern", "Threatened"],
            COUNT_COLUMN => [16u32, 161, 10],
        )
        .unwrap();

        let sorted = sort_by_count(&df).unwrap();
        let values: Vec<u32> = sorted
            .column(COUNT_COLUMN)
            .unwrap()
            .u32()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(values, [10, 16, 161]);
    }

    #[test]
    fn test_pivot_zero_fills_absent_cells() {
        // Birds only ever appear protected
        let counts = df!(
            "category" => ["Bird", "Mammal", "Mammal"],
            "is_protected" => [true, true, false],
            COUNT_COLUMN => [75u32, 30, 146],
        )
        .unwrap();

        let rows = protection_pivot(&counts).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].category, "Bird");
        assert_eq!(rows[0].protected, 75);
        assert_eq!(rows[0].not_protected, 0);
        assert_relative_eq!(rows[0].percent_protected, 100.0, epsilon = 1e-9);

        assert_eq!(rows[1].category, "Mammal");
        assert_relative_eq!(
            rows[1].percent_protected,
            30.0 / 176.0 * 100.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_percent_protected_bounds() {
        for (protected, not_protected) in [(0u32, 10u32), (10, 0), (3, 7), (1, 999)] {
            let percent = percent_protected(protected, not_protected);
            assert!((0.0..=100.0).contains(&percent));
        }
    }

    #[test]
    fn test_percent_protected_zero_denominator() {
        assert_relative_eq!(percent_protected(0, 0), 0.0);
    }

    #[test]
    fn test_pivot_to_dataframe_schema() {
        let rows = vec![CategoryProtection {
            category: "Mammal".to_string(),
            protected: 30,
            not_protected: 146,
            percent_protected: 30.0 / 176.0 * 100.0,
        }];

        let df = pivot_to_dataframe(&rows).unwrap();
        assert_eq!(df.height(), 1);
        for column in ["category", "protected", "not_protected", "percent_protected"] {
            assert!(df.column(column).is_ok());
        }
    }
}
