//! Command-line surface of the `campaign-desk` binary.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::abtest::seed::sample_tests;
use crate::abtest::{
    calculate_required_sample_size, determine_winner, export_tests, format_metric_value,
    import_tests, stats::metric_value, MetricType,
};
use crate::backend::MockBackend;
use crate::config::Config;

#[derive(Debug, Parser)]
#[command(name = "campaign-desk", version, about = "Campaign A/B test tooling")]
pub struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Report the winner of every test in an exported JSON file
    Analyze {
        /// Exported A/B tests (`ab-tests-*.json`)
        file: PathBuf,
        /// Compare on this metric instead of each test's target metric
        #[arg(long)]
        metric: Option<MetricType>,
        /// Minimum confidence in percent (default from config)
        #[arg(long)]
        min_confidence: Option<f64>,
    },
    /// Visitors needed per variant to detect a relative lift
    SampleSize {
        /// Baseline conversion rate, e.g. 0.05
        #[arg(long)]
        baseline: f64,
        /// Minimum detectable effect in percent, e.g. 20
        #[arg(long)]
        mde: f64,
        #[arg(long)]
        confidence: Option<u32>,
        #[arg(long)]
        power: Option<u32>,
    },
    /// Write the sample tests as an export file
    Export {
        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => Config::load().context("loading default config")?,
        };
        Ok(config)
    }
}

/// Execute one command and return the text to print.
pub async fn run(cli: Cli) -> Result<String> {
    let config = cli.load_config()?;
    match cli.command {
        Commands::Analyze {
            file,
            metric,
            min_confidence,
        } => {
            let json = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let tests = import_tests(&json)
                .with_context(|| format!("parsing {}", file.display()))?;
            let min_confidence = min_confidence.unwrap_or(config.stats.min_confidence);
            info!(tests = tests.len(), min_confidence, "Analyzing export");

            let mut out = String::new();
            for test in &tests {
                let target = metric.unwrap_or(test.target_metric);
                let line = match test.metrics.as_deref() {
                    None => "no metrics yet".to_string(),
                    Some(metrics) => match determine_winner(metrics, target, min_confidence) {
                        Some(analysis) => {
                            let best = metrics
                                .iter()
                                .find(|m| m.variant_id == analysis.winner_id)
                                .map(|m| format_metric_value(metric_value(m, target).abs(), target))
                                .unwrap_or_default();
                            format!("winner {} ({}): {}", analysis.winner_id, best, analysis.reason)
                        }
                        None => format!("no significant winner on {}", target.display_name()),
                    },
                };
                out.push_str(&format!("{} [{}] {}\n", test.id, test.status, line));
            }
            Ok(out)
        }
        Commands::SampleSize {
            baseline,
            mde,
            confidence,
            power,
        } => {
            let confidence = confidence.unwrap_or(config.stats.default_confidence);
            let power = power.unwrap_or(config.stats.default_power);
            let size = calculate_required_sample_size(baseline, mde, confidence, power);
            Ok(format!(
                "{} visitors per variant ({}% confidence, {}% power)\n",
                size, confidence, power
            ))
        }
        Commands::Export { out } => {
            let backend = MockBackend::from_config(&config);
            let bundle = export_tests(&sample_tests(backend.now()), backend.now())
                .context("serializing tests")?;
            let path = bundle
                .write_to(&out)
                .with_context(|| format!("writing export to {}", out.display()))?;
            info!(path = %path.display(), "Export written");
            Ok(format!("{}\n", path.display()))
        }
    }
}
