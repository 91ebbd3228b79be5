mod config;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use newton_guards::{builtin_cases, find_case, Case, ReportSet};
use prometheus::Registry;
use prometheus_bridge::{encode, exceeds_status_budget, ObservatoryMetrics};
use ssum_core::StatusLevel;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::ObservatoryConfig;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "ssum-observatory",
    about = "Run guarded Newton iterations and show their structural channels"
)]
struct Cli {
    /// Built-in case to run: all, newton-root, near-singular or multiple-root.
    #[arg(long, default_value = "all")]
    case: String,

    /// TOML file with custom `[[case]]` tables; replaces the built-in cases.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Print Prometheus metrics for the runs after the report.
    #[arg(long)]
    metrics: bool,

    /// Exit with status 2 when any run is worse than this level.
    #[arg(long)]
    fail_on: Option<StatusLevel>,

    /// Evaluate the runs of each case on separate threads.
    #[arg(long)]
    parallel: bool,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry.with(fmt::layer().with_writer(std::io::stderr)).init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

fn select_cases(cli: &Cli) -> Result<Vec<Case>> {
    if let Some(path) = &cli.config {
        let config = ObservatoryConfig::load(path)?;
        return Ok(config.cases);
    }
    if cli.case == "all" {
        return Ok(builtin_cases());
    }
    let case = find_case(&cli.case).with_context(|| {
        let known: Vec<String> = builtin_cases().into_iter().map(|c| c.name).collect();
        format!("unknown case {:?}; known: all, {}", cli.case, known.join(", "))
    })?;
    Ok(vec![case])
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let cases = select_cases(&cli)?;
    let mut all = ReportSet::new();

    for case in &cases {
        info!(case = %case.name, runs = case.runs.len(), "running case");
        let reports = if cli.parallel {
            case.run_parallel()
        } else {
            case.run()
        };
        if let OutputFormat::Table = cli.format {
            println!("{}", render::table(case, &reports));
        }
        all = all.merge(reports);
    }

    if let OutputFormat::Json = cli.format {
        println!("{}", render::json(&all).context("serialize report")?);
    }

    let registry = Registry::new();
    let metrics = ObservatoryMetrics::new(&registry).context("register metrics")?;
    metrics.observe_set(&all);
    let budget = cli.fail_on.unwrap_or(StatusLevel::Bad);
    let over_budget = exceeds_status_budget(&metrics, &all, budget);

    if cli.metrics {
        print!("{}", encode(&registry).context("encode metrics")?);
    }

    info!(status = %all.status(), "observatory finished");
    if cli.fail_on.is_some() && over_budget {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}
