//! Combined summary workbook and console digest
//!
//! The summary CSV carries one labeled section per metric; the digest
//! separates significant from non-significant pairs, states explicitly
//! when a metric has no results, and warns (instead of crashing) when a
//! parsed results table lacks the significance indicator.

use crate::csv_output::{self, ResultRow};
use crate::significance::ResultSet;
use anyhow::{Context, Result};
use serde::Serialize;

/// Analyzed results for one metric
#[derive(Debug, Clone)]
pub struct MetricReport {
    pub metric: String,
    pub results: ResultSet,
}

/// Outcome of processing one metric in a batch
#[derive(Debug, Clone)]
pub enum MetricOutcome {
    Analyzed(MetricReport),
    Failed { metric: String, reason: String },
}

/// Combined summary CSV: one `# <metric>` section per analyzed metric
pub fn summary_to_csv(reports: &[&MetricReport]) -> String {
    let mut output = String::new();
    for (index, report) in reports.iter().enumerate() {
        if index > 0 {
            output.push('\n');
        }
        output.push_str(&format!("# {}\n", report.metric));
        output.push_str(&csv_output::results_to_csv(&report.results.results));
    }
    output
}

/// Digest one metric's rows
///
/// Three branches: no rows at all, rows without a significance indicator
/// (parsed from an external table), and the normal significant/not-
/// significant split.
pub fn digest_rows(metric: &str, rows: &[ResultRow], has_significance: bool) -> String {
    let mut out = format!("{}:\n", metric);

    if rows.is_empty() {
        out.push_str("  No results available for this metric.\n");
        return out;
    }
    if !has_significance {
        out.push_str("  ⚠️ Warning: 'Significant' column not found. Skipping analysis.\n");
        return out;
    }

    let significant: Vec<&ResultRow> = rows
        .iter()
        .filter(|row| row.significant == Some(true))
        .collect();
    if significant.is_empty() {
        out.push_str("  No significant differences found between any system pairs.\n");
    } else {
        out.push_str(&format!(
            "  Significant differences found in {} system pairs:\n",
            significant.len()
        ));
        for row in significant {
            out.push_str(&format!(
                "    {} vs {} (p-value: {:.4})\n",
                row.system_a, row.system_b, row.pvalue
            ));
        }
    }
    out
}

/// Digest one metric's in-memory result set
pub fn metric_digest(metric: &str, results: &ResultSet) -> String {
    let rows: Vec<ResultRow> = results.results.iter().map(ResultRow::from).collect();
    digest_rows(metric, &rows, true)
}

/// Full console digest for a batch, in processing order
pub fn run_digest(outcomes: &[MetricOutcome]) -> String {
    let banner = "=".repeat(50);
    let mut out = format!("{}\nSIGNIFICANCE TESTING SUMMARY\n{}\n", banner, banner);

    for outcome in outcomes {
        out.push('\n');
        match outcome {
            MetricOutcome::Analyzed(report) => {
                out.push_str(&metric_digest(&report.metric, &report.results));
            }
            MetricOutcome::Failed { metric, reason } => {
                out.push_str(&format!("{}:\n  Analysis failed: {}\n", metric, reason));
            }
        }
    }
    out
}

/// JSON digest of a batch (Json output format)
#[derive(Debug, Serialize)]
pub struct JsonRunSummary {
    pub alpha: f64,
    pub metrics: Vec<JsonMetricSummary>,
}

#[derive(Debug, Serialize)]
pub struct JsonMetricSummary {
    pub metric: String,
    pub pairs: usize,
    pub significant_pairs: Vec<JsonSignificantPair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JsonSignificantPair {
    pub system_1: String,
    pub system_2: String,
    pub pvalue: f64,
}

pub fn run_digest_json(outcomes: &[MetricOutcome], alpha: f64) -> Result<String> {
    let metrics = outcomes
        .iter()
        .map(|outcome| match outcome {
            MetricOutcome::Analyzed(report) => JsonMetricSummary {
                metric: report.metric.clone(),
                pairs: report.results.len(),
                significant_pairs: report
                    .results
                    .significant_pairs()
                    .map(|pair| JsonSignificantPair {
                        system_1: pair.system_a.clone(),
                        system_2: pair.system_b.clone(),
                        pvalue: pair.pvalue,
                    })
                    .collect(),
                error: None,
            },
            MetricOutcome::Failed { metric, reason } => JsonMetricSummary {
                metric: metric.clone(),
                pairs: 0,
                significant_pairs: Vec::new(),
                error: Some(reason.clone()),
            },
        })
        .collect();

    serde_json::to_string_pretty(&JsonRunSummary { alpha, metrics })
        .context("failed to serialize run summary")
}
