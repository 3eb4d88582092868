//! CLI argument parsing for Significar

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the final console digest
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text digest (default)
    Text,
    /// JSON digest for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "significar")]
#[command(version)]
#[command(about = "Pairwise significance testing for retrieval evaluation metrics", long_about = None)]
pub struct Cli {
    /// Significance level (alpha) for the paired t-test, in (0, 1)
    #[arg(long = "alpha", value_name = "ALPHA", default_value = "0.05")]
    pub alpha: f64,

    /// Directory containing the metric tables and receiving all reports
    #[arg(
        short = 'o',
        long = "output-dir",
        value_name = "DIR",
        default_value = "output"
    )]
    pub output_dir: PathBuf,

    /// Metric table to analyze as NAME=STEM, where the input file is
    /// <output-dir>/<STEM>_table.csv (repeatable; replaces the default
    /// NDCG@10/MAP/MRR set)
    #[arg(short = 'm', long = "metric", value_name = "NAME=STEM")]
    pub metrics: Vec<String>,

    /// Console digest format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug logging to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["significar"]);
        assert_eq!(cli.alpha, 0.05);
        assert_eq!(cli.output_dir, PathBuf::from("output"));
        assert!(cli.metrics.is_empty());
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.debug);
    }

    #[test]
    fn test_cli_custom_alpha() {
        let cli = Cli::parse_from(["significar", "--alpha", "0.01"]);
        assert_eq!(cli.alpha, 0.01);
    }

    #[test]
    fn test_cli_output_dir() {
        let cli = Cli::parse_from(["significar", "-o", "/tmp/eval"]);
        assert_eq!(cli.output_dir, PathBuf::from("/tmp/eval"));
    }

    #[test]
    fn test_cli_repeated_metrics() {
        let cli = Cli::parse_from([
            "significar",
            "-m",
            "NDCG@10=ndcg_10",
            "-m",
            "MAP=average_precision",
        ]);
        assert_eq!(cli.metrics.len(), 2);
        assert_eq!(cli.metrics[0], "NDCG@10=ndcg_10");
        assert_eq!(cli.metrics[1], "MAP=average_precision");
    }

    #[test]
    fn test_cli_json_format() {
        let cli = Cli::parse_from(["significar", "--format", "json"]);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_debug_flag() {
        let cli = Cli::parse_from(["significar", "--debug"]);
        assert!(cli.debug);
    }
}
