//! Sift CLI binary.
//!
//! Provides command-line interface for forecast qualification.

mod integration;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use integration::pipeline::{load, load_policy, product_key};
use integration::synthetic::{self, SyntheticConfig};
use polars::prelude::DataFrame;
use sift::{GatePolicy, PolicyKind, Qualification, qualify};
use sift_output::{ExportFormat, Exporter, QualificationSummary, ReportBuilder};
use sift_panel::partition_by_product;
use sift_rules::criteria_for;
use sift_score::{
    BacktestConfig, BacktestScore, MovingAverageConfig, MovingAverageForecaster, WmapeVariant,
    add_lag_features, backtest, backtest_by_product, complete_feature_rows, lag_column,
    qualified_rows, split_train_test,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Sift: forecast qualification for product-day panels", long_about = None)]
#[command(version)]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Qualify every product-day of a panel
    Qualify {
        /// Panel CSV file
        panel: PathBuf,

        #[command(flatten)]
        policy: PolicyArgs,

        /// Summary format
        #[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
        format: SummaryFormat,

        /// Write per-row decisions to this file
        #[arg(long)]
        export: Option<PathBuf>,

        /// Format of the decision export (csv, json, pretty-json)
        #[arg(long, default_value = "csv")]
        export_format: ExportFormat,

        /// Write a JSON report to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Score a moving-average baseline on qualified rows
    Score {
        /// Panel CSV file
        panel: PathBuf,

        #[command(flatten)]
        policy: PolicyArgs,

        /// Moving-average window in rows
        #[arg(long, default_value = "28")]
        window: usize,

        /// Leading qualified rows per product held out of scoring
        #[arg(long, default_value = "60")]
        train_days: usize,

        /// Rows entering the WMAPE
        #[arg(long, value_enum, default_value_t = VariantArg::PositiveSalesOnly)]
        variant: VariantArg,

        /// Sales lags to check training readiness for
        #[arg(long, value_delimiter = ',')]
        lags: Vec<usize>,

        /// Write a JSON report to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// List the criteria of a policy
    Criteria {
        /// Policy (strict or clearance)
        #[arg(long, default_value = "strict")]
        policy: PolicyKind,

        /// Print the default policy as JSON
        #[arg(long)]
        show_config: bool,
    },

    /// Qualify a seeded synthetic panel
    Demo {
        /// Number of products
        #[arg(long, default_value = "20")]
        products: usize,

        /// Days per product
        #[arg(long, default_value = "120")]
        days: usize,

        /// RNG seed
        #[arg(long, default_value = "42")]
        seed: u64,

        #[command(flatten)]
        policy: PolicyArgs,

        /// Write the synthetic panel to this CSV file
        #[arg(long)]
        write: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct PolicyArgs {
    /// Policy (strict or clearance)
    #[arg(long, default_value = "strict")]
    policy: PolicyKind,

    /// Policy JSON file; overrides --policy
    #[arg(long)]
    config: Option<PathBuf>,

    /// Column holding the product key
    #[arg(long, default_value = "product_id")]
    product_column: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum SummaryFormat {
    Text,
    Markdown,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum VariantArg {
    PositiveSalesOnly,
    AllRows,
}

impl From<VariantArg> for WmapeVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::PositiveSalesOnly => Self::PositiveSalesOnly,
            VariantArg::AllRows => Self::AllRows,
        }
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    integration::logging::init(cli.log_json);

    match cli.command {
        Commands::Qualify {
            panel,
            policy,
            format,
            export,
            export_format,
            report,
        } => {
            let gate = load_policy(policy.policy, policy.config.as_deref())?;
            let frame = load(&panel, &policy.product_column)?;
            let key = product_key(&frame, &policy.product_column);
            let result = qualify(&frame, &gate, key)?;

            print_summary(&result.summary, format)?;
            if let Some(path) = export {
                export_decisions(&result, &path, export_format)?;
            }
            if let Some(path) = report {
                let title = panel.display().to_string();
                write_report(&title, &gate, &result.summary, None, &path)?;
            }
        }
        Commands::Score {
            panel,
            policy,
            window,
            train_days,
            variant,
            lags,
            report,
        } => {
            let gate = load_policy(policy.policy, policy.config.as_deref())?;
            let frame = load(&panel, &policy.product_column)?;
            let key = product_key(&frame, &policy.product_column);
            let result = qualify(&frame, &gate, key)?;
            println!("{}", result.summary);

            let forecaster =
                MovingAverageForecaster::with_config(MovingAverageConfig { window });
            let config = BacktestConfig {
                train_days,
                variant: variant.into(),
            };
            let score = match key {
                Some(key) => backtest_by_product(&result.frame, key, &forecaster, &config)?,
                None => backtest(&result.frame, &forecaster, &config)?,
            };
            print_score(&score);

            if !lags.is_empty() {
                let ready = lag_ready_rows(&result.frame, key, &lags, train_days)?;
                println!("  Training rows with complete lags {:?}: {}", lags, ready);
            }
            if let Some(path) = report {
                let title = panel.display().to_string();
                write_report(&title, &gate, &result.summary, Some(&score), &path)?;
            }
        }
        Commands::Criteria {
            policy,
            show_config,
        } => {
            println!("\nCriteria for {}:", policy);
            println!("{}", "-".repeat(72));
            for info in criteria_for(policy) {
                println!("  {:<24} {}", info.column, info.description);
            }
            if show_config {
                println!("\n{}", GatePolicy::with_defaults(policy).to_json_string()?);
            }
        }
        Commands::Demo {
            products,
            days,
            seed,
            policy,
            write,
        } => {
            let gate = load_policy(policy.policy, policy.config.as_deref())?;
            let config = SyntheticConfig {
                products,
                days,
                seed,
                product_column: policy.product_column.clone(),
                ..Default::default()
            };
            let frame = synthetic::panel(&config)?;
            info!(products, days, seed, "generated synthetic panel");
            if let Some(path) = write {
                synthetic::write_csv(&config, &path)?;
                println!("Wrote synthetic panel to {}", path.display());
            }

            let result = qualify(&frame, &gate, Some(&policy.product_column))?;
            print_summary(&result.summary, SummaryFormat::Text)?;
        }
    }

    Ok(())
}

fn print_summary(
    summary: &QualificationSummary,
    format: SummaryFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        SummaryFormat::Text => {
            println!("{}", summary.to_ascii_table());
            if let Some(worst) = summary.most_restrictive() {
                println!(
                    "Most restrictive: {} ({} rows failed)",
                    worst.label, worst.failed
                );
            }
        }
        SummaryFormat::Markdown => println!("{}", summary.to_markdown()),
        SummaryFormat::Json => {
            println!("{}", summary.export_to_string(ExportFormat::PrettyJson)?);
        }
    }
    Ok(())
}

fn print_score(score: &BacktestScore) {
    println!("\nBaseline Score ({}, {}):", score.forecaster, score.variant);
    println!("  Products scored:   {}", score.products);
    println!("  Products skipped:  {}", score.skipped_products);
    println!("  Train rows:        {}", score.train_rows);
    println!("  Test rows:         {}", score.test_rows);
    match score.wmape {
        Some(wmape) => println!("  WMAPE:             {:.4}", wmape),
        None => println!("  WMAPE:             n/a (nothing to score)"),
    }
}

fn export_decisions(
    result: &Qualification,
    path: &Path,
    format: ExportFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let decisions = result.decisions()?;
    decisions.export_to_file(path, format)?;
    println!("Exported {} decisions to {}", decisions.len(), path.display());
    Ok(())
}

fn write_report(
    title: &str,
    policy: &GatePolicy,
    summary: &QualificationSummary,
    score: Option<&BacktestScore>,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = ReportBuilder::new()
        .title(title)
        .policy(policy.kind())
        .section("policy", policy)?
        .section("summary", summary)?;
    if let Some(score) = score {
        builder = builder.section("score", score)?;
    }
    builder.build().write_to_file(path)?;
    println!("Wrote report to {}", path.display());
    Ok(())
}

/// Training rows that keep every requested lag after the train/test split.
fn lag_ready_rows(
    frame: &DataFrame,
    key: Option<&str>,
    lags: &[usize],
    train_days: usize,
) -> Result<usize, Box<dyn std::error::Error>> {
    let shards = match key {
        Some(key) => partition_by_product(frame, key)?,
        None => vec![frame.clone()],
    };
    let features: Vec<String> = lags.iter().map(|&lag| lag_column(lag)).collect();

    let mut ready = 0;
    for shard in &shards {
        let qualified = qualified_rows(shard)?;
        let featured = add_lag_features(&qualified, lags)?;
        let (train, _) = split_train_test(&featured, train_days.min(featured.height()))?;
        ready += complete_feature_rows(&train, &features)?.height();
    }
    Ok(ready)
}
