//! CLI definition and dispatch.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report::TextReportAdapter;
use crate::domain::config_validation::{parse_date, validate_scan_config, validate_signal_config};
use crate::domain::error::SignalError;
use crate::domain::params::SignalParams;
use crate::domain::scan::{scan_universe, ScanConfig, ScanResult, SkipReason};
use crate::domain::universe::{load_universe, Universe};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "signalscan", about = "Daily buy/sell signal scanner")]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Csv,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan the universe and report signals
    Scan {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
        /// Only scan this asset group
        #[arg(long)]
        group: Option<String>,
        /// Only scan this symbol
        #[arg(long, conflicts_with = "group")]
        code: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data range for symbol(s)
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    init_logging(cli.verbose);

    match cli.command {
        Command::Scan {
            config,
            output,
            format,
            group,
            code,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config, group.as_deref(), code.as_deref())
            } else {
                run_scan(
                    &config,
                    output.as_deref(),
                    format,
                    group.as_deref(),
                    code.as_deref(),
                )
            }
        }
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Info { config, code } => run_info(&config, code.as_deref()),
    }
}

/// Logs go to stderr; stdout carries only the report.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("signalscan=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("signalscan=info"))
    };
    // A subscriber may already be installed when run() is called twice in one process.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn fail(err: &SignalError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    tracing::debug!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path).map_err(|e| fail(&e))
}

pub fn build_scan_config(config: &dyn ConfigPort) -> Result<ScanConfig, SignalError> {
    Ok(ScanConfig {
        start_date: parse_date(config, "start_date")?,
        end_date: parse_date(config, "end_date")?,
        parallel: config.get_bool("scan", "parallel", true),
        fail_fast: config.get_bool("scan", "fail_fast", false),
    })
}

pub fn build_params(config: &dyn ConfigPort) -> SignalParams {
    let d = SignalParams::default();
    SignalParams {
        ema_short_period: config.get_period("signals", "ema_short_period", d.ema_short_period),
        ema_long_period: config.get_period("signals", "ema_long_period", d.ema_long_period),
        rsi_window: config.get_period("signals", "rsi_window", d.rsi_window),
        atr_window: config.get_period("signals", "atr_window", d.atr_window),
        macd_fast: config.get_period("signals", "macd_fast", d.macd_fast),
        macd_slow: config.get_period("signals", "macd_slow", d.macd_slow),
        macd_signal: config.get_period("signals", "macd_signal", d.macd_signal),
        rsi_buy_bot: config.get_double("signals", "rsi_buy_bot", d.rsi_buy_bot),
        rsi_buy_top: config.get_double("signals", "rsi_buy_top", d.rsi_buy_top),
        atr_multiplier: config.get_double("signals", "atr_multiplier", d.atr_multiplier),
        trailing_atr_multiplier: config.get_double(
            "signals",
            "trailing_atr_multiplier",
            d.trailing_atr_multiplier,
        ),
        max_holding_days: config.get_int("signals", "max_holding_days", d.max_holding_days),
    }
}

pub fn data_dir(config: &dyn ConfigPort) -> Result<PathBuf, SignalError> {
    config
        .get_string("scan", "data_dir")
        .map(|dir| PathBuf::from(dir.trim()))
        .filter(|dir| !dir.as_os_str().is_empty())
        .ok_or_else(|| SignalError::ConfigMissing {
            section: "scan".into(),
            key: "data_dir".into(),
        })
}

/// `--code` wins over `--group`, which narrows the configured universe.
pub fn resolve_universe(
    config: &dyn ConfigPort,
    group: Option<&str>,
    code: Option<&str>,
) -> Result<Universe, SignalError> {
    if let Some(code) = code {
        return Ok(Universe::single(code));
    }
    let universe = load_universe(config)?;
    match group {
        Some(name) => Ok(universe.only_group(name)?),
        None => Ok(universe),
    }
}

/// Exit status for a finished scan: 0 unless every instrument was skipped or
/// failed, or `fail_fast` is set and anything failed.
pub fn scan_exit_status(result: &ScanResult, fail_fast: bool) -> u8 {
    if let Some(first) = result.failed.first() {
        if fail_fast || result.outcomes.is_empty() {
            return first.error.exit_code();
        }
    }
    if result.outcomes.is_empty() && !result.skipped.is_empty() {
        let code = &result.skipped[0].code;
        let err = match result.skipped[0].reason {
            SkipReason::NoData => SignalError::NoData { code: code.clone() },
            SkipReason::InsufficientHistory { bars, minimum } => {
                SignalError::InsufficientHistory {
                    code: code.clone(),
                    bars,
                    minimum,
                }
            }
        };
        return err.exit_code();
    }
    0
}

/// Validate the config, then scan its universe from the CSV data directory.
pub fn scan_from_config(
    config: &dyn ConfigPort,
    group: Option<&str>,
    code: Option<&str>,
) -> Result<(ScanConfig, ScanResult), SignalError> {
    validate_scan_config(config)?;
    validate_signal_config(config)?;
    let scan_config = build_scan_config(config)?;
    let params = build_params(config);
    let universe = resolve_universe(config, group, code)?;
    let data_port = CsvAdapter::new(data_dir(config)?);

    let result = scan_universe(&data_port, &universe, &scan_config, &params);
    Ok((scan_config, result))
}

/// Every check `validate` runs; returns the configured universe.
pub fn check_config(config: &dyn ConfigPort) -> Result<Universe, SignalError> {
    validate_scan_config(config)?;
    validate_signal_config(config)?;
    load_universe(config)
}

fn run_scan(
    config_path: &Path,
    output_path: Option<&Path>,
    format: ReportFormat,
    group: Option<&str>,
    code: Option<&str>,
) -> ExitCode {
    tracing::info!(path = %config_path.display(), "loading config");
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(exit) => return exit,
    };

    let (scan_config, result) = match scan_from_config(&adapter, group, code) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    for skip in &result.skipped {
        match skip.reason {
            SkipReason::NoData => eprintln!("{}: no data found", skip.code),
            SkipReason::InsufficientHistory { bars, minimum } => eprintln!(
                "{}: insufficient history ({} bars, need {})",
                skip.code, bars, minimum
            ),
        }
    }
    for failed in &result.failed {
        eprintln!("error: {}: {}", failed.code, failed.error);
    }

    let reporter: Box<dyn ReportPort> = match format {
        ReportFormat::Text => Box::new(TextReportAdapter),
        ReportFormat::Csv => Box::new(CsvReportAdapter),
    };
    if let Err(e) = reporter.write(&result, output_path) {
        return fail(&e);
    }
    if let Some(path) = output_path {
        tracing::info!(path = %path.display(), signals = result.events.len(), "report written");
    }

    ExitCode::from(scan_exit_status(&result, scan_config.fail_fast))
}

pub fn run_dry_run(config_path: &Path, group: Option<&str>, code: Option<&str>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(exit) => return exit,
    };

    if let Err(e) = validate_scan_config(&adapter).and_then(|()| validate_signal_config(&adapter)) {
        return fail(&e);
    }
    let scan_config = match build_scan_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    let universe = match resolve_universe(&adapter, group, code) {
        Ok(u) => u,
        Err(e) => return fail(&e),
    };
    let params = build_params(&adapter);

    eprintln!(
        "\nScan window: {} to {}",
        scan_config.start_date, scan_config.end_date
    );
    eprintln!(
        "  parallel: {}, fail_fast: {}",
        scan_config.parallel, scan_config.fail_fast
    );

    eprintln!("\nSignal parameters:");
    eprintln!(
        "  EMA {}/{}, RSI {} in [{}, {}], MACD {}/{}/{}",
        params.ema_short_period,
        params.ema_long_period,
        params.rsi_window,
        params.rsi_buy_bot,
        params.rsi_buy_top,
        params.macd_fast,
        params.macd_slow,
        params.macd_signal,
    );
    eprintln!(
        "  ATR {} x{} stop, x{} trail, max hold {} days",
        params.atr_window,
        params.atr_multiplier,
        params.trailing_atr_multiplier,
        params.max_holding_days,
    );
    eprintln!("  minimum history: {} bars", params.min_history());

    let indicators: Vec<String> = params.indicators().iter().map(ToString::to_string).collect();
    eprintln!("\nIndicators to compute:");
    eprintln!("  {}", indicators.join(", "));

    eprintln!("\nUniverse ({} symbols):", universe.count());
    for group in &universe.groups {
        eprintln!("  {}: {}", group.name, group.codes.join(", "));
    }

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(exit) => return exit,
    };

    match check_config(&adapter) {
        Ok(universe) => {
            eprintln!(
                "Configuration is valid ({} groups, {} symbols).",
                universe.groups.len(),
                universe.count()
            );
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn run_list_symbols(config_path: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(exit) => return exit,
    };
    let dir = match data_dir(&config) {
        Ok(d) => d,
        Err(e) => return fail(&e),
    };

    let symbols = match CsvAdapter::new(dir.clone()).list_symbols() {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    if symbols.is_empty() {
        eprintln!("No symbols found in {}", dir.display());
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}

fn run_info(config_path: &Path, code: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(exit) => return exit,
    };
    let dir = match data_dir(&config) {
        Ok(d) => d,
        Err(e) => return fail(&e),
    };
    let universe = match resolve_universe(&config, None, code) {
        Ok(u) => u,
        Err(e) => return fail(&e),
    };

    let adapter = CsvAdapter::new(dir);
    for (_, c) in universe.instruments() {
        match adapter.get_data_range(c) {
            Ok(Some((first, last, count))) => {
                println!("{}: {} bars, {} to {}", c, count, first, last);
            }
            Ok(None) => eprintln!("{}: no data found", c),
            Err(e) => eprintln!("error querying {}: {}", c, e),
        }
    }
    ExitCode::SUCCESS
}
