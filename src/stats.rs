//! Chi-Squared Test of Independence
//!
//! Pearson's test on a 2x2 contingency table of non-negative integer counts.
//! Only the 2x2 shape is supported (degrees of freedom is always 1), which is
//! exactly what the category comparisons need; this is not a general-purpose
//! statistics layer.

use thiserror::Error;

/// A 2x2 table of observed counts: rows are categories, columns are
/// protected / not-protected
pub type ContingencyTable = [[u64; 2]; 2];

/// Errors from the significance tester
#[derive(Debug, Error)]
pub enum StatsError {
    /// A zero row or column sum leaves the expected frequencies undefined
    #[error("degenerate contingency table: {axis} {index} sums to zero")]
    DegenerateTable { axis: &'static str, index: usize },
}

/// Result of a chi-squared test
#[derive(Debug, Clone)]
pub struct Chi2Result {
    /// Pearson statistic, sum of (observed - expected)^2 / expected
    pub statistic: f64,
    /// Upper-tail probability of the statistic under independence
    pub p_value: f64,
    /// (rows - 1) * (cols - 1); always 1 for a 2x2 table
    pub degrees_of_freedom: usize,
    /// Expected counts under independence
    pub expected: [[f64; 2]; 2],
}

impl Chi2Result {
    /// Conventional 5% significance check
    pub fn is_significant(&self) -> bool {
        self.p_value < 0.05
    }
}

/// Run Pearson's chi-squared test of independence on a 2x2 table
///
/// expected[i][j] = row_sum[i] * col_sum[j] / grand_total. No continuity
/// correction is applied. A table with a zero row or column sum is rejected
/// up front so the division can never produce NaN or Inf.
pub fn chi2_contingency(observed: &ContingencyTable) -> Result<Chi2Result, StatsError> {
    let row_sums = [
        observed[0][0] + observed[0][1],
        observed[1][0] + observed[1][1],
    ];
    let col_sums = [
        observed[0][0] + observed[1][0],
        observed[0][1] + observed[1][1],
    ];

    for (index, sum) in row_sums.iter().enumerate() {
        if *sum == 0 {
            return Err(StatsError::DegenerateTable { axis: "row", index });
        }
    }
    for (index, sum) in col_sums.iter().enumerate() {
        if *sum == 0 {
            return Err(StatsError::DegenerateTable { axis: "column", index });
        }
    }

    let grand_total = (row_sums[0] + row_sums[1]) as f64;

    let mut expected = [[0.0f64; 2]; 2];
    let mut statistic = 0.0f64;
    for i in 0..2 {
        for j in 0..2 {
            let e = row_sums[i] as f64 * col_sums[j] as f64 / grand_total;
            expected[i][j] = e;

            let delta = observed[i][j] as f64 - e;
            statistic += delta * delta / e;
        }
    }

    Ok(Chi2Result {
        statistic,
        p_value: chi2_survival_df1(statistic),
        degrees_of_freedom: 1,
        expected,
    })
}

/// Survival function of the chi-squared distribution with one degree of freedom
///
/// For one degree of freedom, P(X >= x) = erfc(sqrt(x / 2)).
fn chi2_survival_df1(statistic: f64) -> f64 {
    libm::erfc((statistic / 2.0).sqrt())
}
