//! Per-system score distribution summaries
//!
//! Five-number summaries (plus the mean) of each system's per-item scores,
//! feeding the grouped boxplot in the HTML report. Quantiles use aprender's
//! `DescriptiveStats` (R-7 method); mean/min/max use trueno vectors.

use crate::table::MetricTable;
use anyhow::{Context, Result};
use aprender::stats::DescriptiveStats;
use serde::Serialize;
use trueno::Vector;

/// Five-number summary of one system's scores
#[derive(Debug, Clone, Serialize)]
pub struct SystemDistribution {
    pub system: String,
    pub min: f32,
    pub q1: f32,
    pub median: f32,
    pub q3: f32,
    pub max: f32,
    pub mean: f32,
}

/// Summarize every system column of a metric table, in column order
pub fn summarize(table: &MetricTable) -> Result<Vec<SystemDistribution>> {
    let mut distributions = Vec::with_capacity(table.system_count());

    for (index, system) in table.systems().iter().enumerate() {
        let scores: Vec<f32> = table.scores(index).iter().map(|&s| s as f32).collect();
        if scores.is_empty() {
            anyhow::bail!("system {} has no scores to summarize", system);
        }

        let vector = Vector::from_slice(&scores);
        let mean = vector
            .mean()
            .with_context(|| format!("failed to compute mean for {}", system))?;
        let min = vector
            .min()
            .with_context(|| format!("failed to compute min for {}", system))?;
        let max = vector
            .max()
            .with_context(|| format!("failed to compute max for {}", system))?;

        let stats = DescriptiveStats::new(&vector);
        let q1 = stats
            .quantile(0.25)
            .map_err(|e| anyhow::anyhow!("failed to compute lower quartile for {}: {}", system, e))?;
        let median = stats
            .quantile(0.5)
            .map_err(|e| anyhow::anyhow!("failed to compute median for {}: {}", system, e))?;
        let q3 = stats
            .quantile(0.75)
            .map_err(|e| anyhow::anyhow!("failed to compute upper quartile for {}: {}", system, e))?;

        distributions.push(SystemDistribution {
            system: system.clone(),
            min,
            q1,
            median,
            q3,
            max,
            mean,
        });
    }

    Ok(distributions)
}
