// Pairwise significance analysis over a metric table
//
// Enumerates all 2-combinations of system columns in their input order and
// runs the paired t-test on each pair. Pure with respect to its inputs: no
// I/O, no mutation.

use crate::significance::config::SignificanceConfig;
use crate::significance::statistics::paired_ttest;
use crate::table::MetricTable;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Paired t-test result for one unordered pair of systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseResult {
    /// First system of the pair (earlier in column order)
    pub system_a: String,

    /// Second system of the pair
    pub system_b: String,

    /// t-statistic (positive when `system_a` scores higher)
    pub statistic: f64,

    /// Two-sided p-value in [0, 1]
    pub pvalue: f64,

    /// `pvalue < alpha`, exactly
    pub significant: bool,
}

/// All pairwise results for one metric, in combinatorial column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    /// Significance level the flags were derived from
    pub alpha: f64,

    /// One entry per unordered pair of distinct systems; the first axis
    /// varies slower, matching the input column order
    pub results: Vec<PairwiseResult>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// A table with fewer than two system columns yields an empty set;
    /// callers must special-case this when summarizing.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Results flagged significant, in enumeration order
    pub fn significant_pairs(&self) -> impl Iterator<Item = &PairwiseResult> {
        self.results.iter().filter(|r| r.significant)
    }
}

/// Analyze significance between all pairs of systems for one metric
///
/// # Arguments
/// * `table` - Item x system score matrix
/// * `config` - Significance level (validated before any test runs)
///
/// # Returns
/// One `PairwiseResult` per unordered pair of system columns. A table with
/// fewer than two systems returns an empty `ResultSet`, not an error. A
/// statistical failure on any pair aborts the analysis with an error
/// naming the pair.
///
/// # Example
/// ```
/// use significar::significance::{analyze, SignificanceConfig};
/// use significar::table::MetricTable;
/// use std::path::Path;
///
/// let table = MetricTable::from_csv_str(
///     "topic,bm25,dense\nq1,0.50,0.61\nq2,0.42,0.55\nq3,0.47,0.60\n",
///     Path::new("ndcg_10_table.csv"),
/// )
/// .unwrap();
///
/// let results = analyze(&table, &SignificanceConfig::default()).unwrap();
/// assert_eq!(results.len(), 1);
/// assert_eq!(results.results[0].system_a, "bm25");
/// assert_eq!(results.results[0].system_b, "dense");
/// ```
pub fn analyze(table: &MetricTable, config: &SignificanceConfig) -> Result<ResultSet> {
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let systems = table.systems();
    let mut results = Vec::new();

    for i in 0..systems.len() {
        for j in (i + 1)..systems.len() {
            let test = paired_ttest(table.scores(i), table.scores(j))
                .with_context(|| format!("comparing {} vs {}", systems[i], systems[j]))?;
            results.push(PairwiseResult {
                system_a: systems[i].clone(),
                system_b: systems[j].clone(),
                statistic: test.statistic,
                pvalue: test.pvalue,
                significant: test.pvalue < config.alpha,
            });
        }
    }

    Ok(ResultSet {
        alpha: config.alpha,
        results,
    })
}
