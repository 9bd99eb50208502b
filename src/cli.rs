//! CLI definition and dispatch.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::adapters::cached_data_adapter::CachedDataAdapter;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::report_adapter;
use crate::domain::analyzer::analyze;
use crate::domain::backtest::{BacktestConfig, run_backtest};
use crate::domain::config_validation::{load_backtest_config, load_report_format, validate_config};
use crate::domain::divergence::DivergenceHint;
use crate::domain::error::SignalError;
use crate::domain::indicator::{calculate_indicator_series, calculate_indicators};
use crate::domain::ohlcv::{Bar, validate_bars};
use crate::domain::quote::Quote;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::{AnalysisReport, ReportFormat};

#[derive(Parser, Debug)]
#[command(
    name = "stocksignal",
    about = "Technical indicators, trade signals and backtests for daily bars"
)]
pub struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Directory holding <SYMBOL>.csv files
    #[arg(short, long)]
    pub data_dir: PathBuf,
    #[arg(short, long)]
    pub symbol: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score the latest bar and print the signal
    Analyze {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// text or json; overrides [report] format
        #[arg(short, long)]
        format: Option<ReportFormat>,
        /// Also replay the history through the backtest
        #[arg(long)]
        backtest: bool,
        /// JSON divergence hint to fold into the timing score
        #[arg(long)]
        divergence: Option<PathBuf>,
    },
    /// Replay the history through the backtest simulator
    Backtest {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        format: Option<ReportFormat>,
    },
    /// Print every indicator series as JSON
    Series {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Install the stderr log subscriber. Without `RUST_LOG` the crate logs at
/// info, or debug when `verbose` is set.
pub fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("stocksignal={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

pub fn run(cli: Cli) -> ExitCode {
    let mut out = io::stdout().lock();
    match execute(cli.command, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Run one command, writing its report to `out`.
pub fn execute(command: Command, out: &mut dyn Write) -> Result<(), SignalError> {
    match command {
        Command::Analyze {
            source,
            config,
            format,
            backtest,
            divergence,
        } => run_analyze(
            &source,
            config.as_deref(),
            format,
            backtest,
            divergence.as_deref(),
            out,
        ),
        Command::Backtest {
            source,
            config,
            format,
        } => run_backtest_command(&source, config.as_deref(), format, out),
        Command::Series { source } => run_series(&source, out),
        Command::Validate { config } => run_validate(&config, out),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub backtest: BacktestConfig,
    pub format: ReportFormat,
}

/// Resolve settings from an optional config file. A `--format` flag wins
/// over `[report] format`.
pub fn load_settings(
    config_path: Option<&Path>,
    format_override: Option<ReportFormat>,
) -> Result<Settings, SignalError> {
    let Some(path) = config_path else {
        return Ok(Settings {
            backtest: BacktestConfig::default(),
            format: format_override.unwrap_or_default(),
        });
    };

    info!(path = %path.display(), "loading config");
    let adapter = FileConfigAdapter::from_file(path)?;
    validate_config(&adapter)?;

    let format = match format_override {
        Some(format) => format,
        None => load_report_format(&adapter)?,
    };
    Ok(Settings {
        backtest: load_backtest_config(&adapter)?,
        format,
    })
}

fn open_source(args: &SourceArgs) -> CachedDataAdapter<CsvAdapter> {
    CachedDataAdapter::new(CsvAdapter::new(args.data_dir.clone()))
}

fn load_bars(source: &dyn DataPort, symbol: &str) -> Result<Vec<Bar>, SignalError> {
    let bars = source.fetch_bars(symbol)?;
    validate_bars(&bars)?;
    info!(symbol, bars = bars.len(), "loaded history");
    Ok(bars)
}

fn read_divergence(path: &Path) -> Result<DivergenceHint, SignalError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn run_analyze(
    source_args: &SourceArgs,
    config_path: Option<&Path>,
    format: Option<ReportFormat>,
    with_backtest: bool,
    divergence_path: Option<&Path>,
    out: &mut dyn Write,
) -> Result<(), SignalError> {
    let settings = load_settings(config_path, format)?;
    let symbol = source_args.symbol.as_str();
    let source = open_source(source_args);

    let bars = load_bars(&source, symbol)?;
    let quote = Quote::from_bars(&bars)?;
    let mut indicators = calculate_indicators(&bars)?;
    if let Some(path) = divergence_path {
        indicators = indicators.with_divergence(read_divergence(path)?);
    }

    let analysis = analyze(&quote, &indicators);
    info!(
        symbol,
        signal = %analysis.signal,
        score = analysis.score,
        "analysis complete"
    );

    let reporter = report_adapter(settings.format);
    reporter.write_analysis(
        &AnalysisReport {
            symbol,
            quote: &quote,
            indicators: &indicators,
            analysis: &analysis,
        },
        out,
    )?;

    if with_backtest {
        let bars = load_bars(&source, symbol)?;
        let result = run_backtest(&bars, &settings.backtest)?;
        info!(symbol, trades = result.stats.total_trades, "backtest complete");
        if settings.format == ReportFormat::Text {
            writeln!(out)?;
        }
        reporter.write_backtest(symbol, &result, out)?;
    }

    Ok(())
}

fn run_backtest_command(
    source_args: &SourceArgs,
    config_path: Option<&Path>,
    format: Option<ReportFormat>,
    out: &mut dyn Write,
) -> Result<(), SignalError> {
    let settings = load_settings(config_path, format)?;
    let symbol = source_args.symbol.as_str();

    let bars = load_bars(&open_source(source_args), symbol)?;
    info!(
        symbol,
        stop_loss_pct = settings.backtest.stop_loss_pct,
        take_profit_pct = settings.backtest.take_profit_pct,
        max_hold_days = settings.backtest.max_hold_days,
        "running backtest"
    );
    let result = run_backtest(&bars, &settings.backtest)?;
    info!(symbol, trades = result.stats.total_trades, "backtest complete");

    report_adapter(settings.format).write_backtest(symbol, &result, out)?;
    Ok(())
}

fn run_series(source_args: &SourceArgs, out: &mut dyn Write) -> Result<(), SignalError> {
    let symbol = source_args.symbol.as_str();
    let bars = load_bars(&open_source(source_args), symbol)?;
    let series = calculate_indicator_series(&bars)?;

    serde_json::to_writer_pretty(&mut *out, &series)?;
    writeln!(out)?;
    Ok(())
}

fn run_validate(config_path: &Path, out: &mut dyn Write) -> Result<(), SignalError> {
    let settings = load_settings(Some(config_path), None)?;
    writeln!(out, "Configuration valid: {}", config_path.display())?;
    writeln!(
        out,
        "  backtest: stop_loss_pct={} take_profit_pct={} max_hold_days={}",
        settings.backtest.stop_loss_pct,
        settings.backtest.take_profit_pct,
        settings.backtest.max_hold_days
    )?;
    writeln!(out, "  report: format={}", settings.format)?;
    Ok(())
}
