use anyhow::Result;
use clap::Parser;
use significar::{cli::Cli, runner, significance::SignificanceConfig, table::TableError};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Parse repeated --metric NAME=STEM arguments
fn parse_metric_specs(raw: &[String]) -> Result<Vec<runner::MetricSpec>> {
    raw.iter()
        .map(|entry| match entry.split_once('=') {
            Some((name, stem)) if !name.trim().is_empty() && !stem.trim().is_empty() => {
                Ok(runner::MetricSpec::new(name.trim(), stem.trim()))
            }
            _ => anyhow::bail!("Invalid value for --metric: {:?} (expected NAME=STEM)", entry),
        })
        .collect()
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let significance = SignificanceConfig { alpha: args.alpha };
    if let Err(reason) = significance.validate() {
        anyhow::bail!("Invalid value for --alpha: {}", reason);
    }

    let metrics = if args.metrics.is_empty() {
        runner::default_metrics()
    } else {
        parse_metric_specs(&args.metrics)?
    };

    let config = runner::RunnerConfig {
        output_dir: args.output_dir,
        significance,
        metrics,
        format: args.format,
    };

    if let Err(err) = runner::run(&config) {
        // A missing table ends the batch gracefully with a pointer to the
        // evaluation step that produces the tables.
        if let Some(TableError::MissingInput(path)) = err.downcast_ref::<TableError>() {
            println!(
                "Error: Could not find required data files. Make sure you have run the evaluation metrics first."
            );
            println!("Missing file: {}", path.display());
            return Ok(());
        }
        return Err(err);
    }

    Ok(())
}
