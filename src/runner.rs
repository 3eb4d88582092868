//! Batch orchestration for the significance-testing run
//!
//! Loads every metric table up front (a missing file halts the run before
//! anything is analyzed), then analyzes and renders each metric in order.
//! A malformed table or a statistical failure aborts only the affected
//! metric; the batch continues and the digest names the failure.

use crate::cli::OutputFormat;
use crate::csv_output;
use crate::distribution;
use crate::html_output::HtmlReport;
use crate::significance::{self, SignificanceConfig};
use crate::summary::{self, MetricOutcome, MetricReport};
use crate::table::{MetricTable, TableError};
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// File name of the combined summary workbook
pub const SUMMARY_FILENAME: &str = "significance_test_summary.csv";

/// One metric to analyze: a display name and the stem of its table file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSpec {
    pub name: String,
    pub table_stem: String,
}

impl MetricSpec {
    pub fn new(name: &str, table_stem: &str) -> Self {
        Self {
            name: name.to_string(),
            table_stem: table_stem.to_string(),
        }
    }

    /// Input table file name, e.g. `ndcg_10_table.csv`
    pub fn table_filename(&self) -> String {
        format!("{}_table.csv", self.table_stem)
    }

    /// Per-metric results file name, e.g. `significance_test_ndcg@10.csv`
    pub fn results_filename(&self) -> String {
        format!("significance_test_{}.csv", self.name.to_lowercase())
    }

    /// Per-metric boxplot file name, e.g. `significance_ndcg@10_boxplot.html`
    pub fn boxplot_filename(&self) -> String {
        format!("significance_{}_boxplot.html", self.name.to_lowercase())
    }
}

/// The standard retrieval-evaluation metric set
pub fn default_metrics() -> Vec<MetricSpec> {
    vec![
        MetricSpec::new("NDCG@10", "ndcg_10"),
        MetricSpec::new("MAP", "average_precision"),
        MetricSpec::new("MRR", "mean_reciprocal_rank"),
    ]
}

/// Configuration for one batch run
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Directory holding the metric tables and receiving all reports
    pub output_dir: PathBuf,
    pub significance: SignificanceConfig,
    pub metrics: Vec<MetricSpec>,
    pub format: OutputFormat,
}

/// Run the full batch: load, analyze, render, digest
pub fn run(config: &RunnerConfig) -> Result<()> {
    config
        .significance
        .validate()
        .map_err(|e| anyhow::anyhow!(e))?;
    if config.metrics.is_empty() {
        anyhow::bail!("no metrics configured");
    }

    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            config.output_dir.display()
        )
    })?;

    // Load every table before analyzing anything: a missing input halts
    // the run with nothing written.
    let mut loaded = Vec::with_capacity(config.metrics.len());
    for spec in &config.metrics {
        let path = config.output_dir.join(spec.table_filename());
        match MetricTable::from_csv_path(&path) {
            Ok(table) => loaded.push((spec, Ok(table))),
            Err(err @ TableError::MissingInput(_)) => return Err(err.into()),
            Err(err) => loaded.push((spec, Err(err))),
        }
    }

    let mut outcomes = Vec::with_capacity(loaded.len());
    for (spec, table_result) in loaded {
        let outcome = match table_result {
            Ok(table) => process_metric(config, spec, &table),
            Err(err) => Err(err.to_string()),
        };
        match outcome {
            Ok(report) => outcomes.push(MetricOutcome::Analyzed(report)),
            Err(reason) => {
                tracing::warn!(metric = %spec.name, %reason, "metric skipped");
                outcomes.push(MetricOutcome::Failed {
                    metric: spec.name.clone(),
                    reason,
                });
            }
        }
    }

    let reports: Vec<&MetricReport> = outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            MetricOutcome::Analyzed(report) => Some(report),
            MetricOutcome::Failed { .. } => None,
        })
        .collect();

    if !reports.is_empty() {
        let summary_path = config.output_dir.join(SUMMARY_FILENAME);
        fs::write(&summary_path, summary::summary_to_csv(&reports))
            .with_context(|| format!("failed to write {}", summary_path.display()))?;
        println!("\nSummary results saved to {}", summary_path.display());
    }

    match config.format {
        OutputFormat::Text => println!("\n{}", summary::run_digest(&outcomes)),
        OutputFormat::Json => println!(
            "{}",
            summary::run_digest_json(&outcomes, config.significance.alpha)?
        ),
    }

    Ok(())
}

/// Analyze and render one metric
///
/// Returns the failure reason as a plain string so the caller can record
/// it in the digest; filesystem failures are surfaced the same way.
fn process_metric(
    config: &RunnerConfig,
    spec: &MetricSpec,
    table: &MetricTable,
) -> std::result::Result<MetricReport, String> {
    println!("Performing significance testing for {}...", spec.name);

    let results =
        significance::analyze(table, &config.significance).map_err(|err| format!("{err:#}"))?;
    let distributions = distribution::summarize(table).map_err(|err| format!("{err:#}"))?;

    let results_path = config.output_dir.join(spec.results_filename());
    fs::write(&results_path, csv_output::results_to_csv(&results.results))
        .map_err(|err| format!("failed to write {}: {}", results_path.display(), err))?;
    println!("Results saved to {}", results_path.display());

    let boxplot_path = config.output_dir.join(spec.boxplot_filename());
    let report = HtmlReport::new(&spec.name, &distributions, &results);
    fs::write(&boxplot_path, report.to_html())
        .map_err(|err| format!("failed to write {}: {}", boxplot_path.display(), err))?;
    tracing::debug!(path = %boxplot_path.display(), "boxplot written");

    Ok(MetricReport {
        metric: spec.name.clone(),
        results,
    })
}
