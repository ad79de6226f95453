//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_chart_adapter::SvgChartAdapter;
use crate::domain::backtest::{self as backtest_engine, BacktestConfig};
use crate::domain::config_validation::{
    DEFAULT_INITIAL_CAPITAL, DEFAULT_LONG_WINDOW, DEFAULT_SHORT_WINDOW, parse_date,
    validate_backtest_config,
};
use crate::domain::error::CrossoverError;
use crate::domain::portfolio::DEFAULT_TRADE_SIZE;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_OUTPUT_DIR: &str = "report";

#[derive(Parser, Debug)]
#[command(name = "crossover", about = "Moving average crossover backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
        #[arg(long)]
        short_window: Option<usize>,
        #[arg(long)]
        long_window: Option<usize>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// List tickers available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the data range for a ticker
    Info {
        #[arg(long)]
        ticker: Option<String>,
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            ticker,
            short_window,
            long_window,
            output,
            dry_run,
        } => {
            let overrides = Overrides {
                ticker,
                short_window,
                long_window,
            };
            if dry_run {
                run_dry_run(&config, &overrides)
            } else {
                run_backtest(&config, &overrides, output.as_deref())
            }
        }
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Info { ticker, config } => run_info(ticker.as_deref(), &config),
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub ticker: Option<String>,
    pub short_window: Option<usize>,
    pub long_window: Option<usize>,
}

impl Overrides {
    pub fn apply(&self, adapter: &mut FileConfigAdapter) {
        if let Some(ticker) = &self.ticker {
            adapter.set("backtest", "ticker", ticker);
        }
        if let Some(short) = self.short_window {
            adapter.set("strategy", "short_window", &short.to_string());
        }
        if let Some(long) = self.long_window {
            adapter.set("strategy", "long_window", &long.to_string());
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn load_validated_config(
    config_path: &Path,
    overrides: &Overrides,
) -> Result<(FileConfigAdapter, BacktestConfig), ExitCode> {
    eprintln!("Loading config from {}", config_path.display());
    let mut adapter = load_config(config_path)?;
    overrides.apply(&mut adapter);

    let bt_config = validate_backtest_config(&adapter)
        .and_then(|()| build_backtest_config(&adapter))
        .map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        })?;
    Ok((adapter, bt_config))
}

fn run_backtest(config_path: &Path, overrides: &Overrides, output: Option<&Path>) -> ExitCode {
    let (adapter, bt_config) = match load_validated_config(config_path, overrides) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };

    let data_port = CsvAdapter::new(data_dir(&adapter));
    let out_dir = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| output_dir(&adapter));
    let charts = SvgChartAdapter::new();
    let report_port: Option<&dyn ReportPort> = if adapter.get_bool("report", "charts", true) {
        Some(&charts as &dyn ReportPort)
    } else {
        None
    };

    run_backtest_pipeline(&data_port, report_port, &bt_config, &out_dir)
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, CrossoverError> {
    let ticker = adapter
        .get_string("backtest", "ticker")
        .map(|t| t.trim().to_string())
        .ok_or_else(|| CrossoverError::ConfigMissing {
            section: "backtest".into(),
            key: "ticker".into(),
        })?;
    let start_date = parse_date(
        adapter.get_string("backtest", "start_date").as_deref(),
        "start_date",
    )?;
    let end_date = parse_date(
        adapter.get_string("backtest", "end_date").as_deref(),
        "end_date",
    )?;

    let trade_size = adapter.get_int("backtest", "trade_size", i64::from(DEFAULT_TRADE_SIZE));
    let short_window = adapter.get_int("strategy", "short_window", DEFAULT_SHORT_WINDOW);
    let long_window = adapter.get_int("strategy", "long_window", DEFAULT_LONG_WINDOW);

    Ok(BacktestConfig {
        ticker,
        start_date,
        end_date,
        initial_capital: adapter.get_double(
            "backtest",
            "initial_capital",
            DEFAULT_INITIAL_CAPITAL,
        ),
        trade_size: to_unsigned("backtest", "trade_size", trade_size)?,
        short_window: to_unsigned("strategy", "short_window", short_window)?,
        long_window: to_unsigned("strategy", "long_window", long_window)?,
    })
}

fn to_unsigned<T: TryFrom<i64>>(section: &str, key: &str, value: i64) -> Result<T, CrossoverError> {
    T::try_from(value).map_err(|_| CrossoverError::ConfigInvalid {
        section: section.into(),
        key: key.into(),
        reason: format!("{} is out of range", value),
    })
}

pub fn data_dir(adapter: &dyn ConfigPort) -> PathBuf {
    PathBuf::from(
        adapter
            .get_string("data", "directory")
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
    )
}

pub fn output_dir(adapter: &dyn ConfigPort) -> PathBuf {
    PathBuf::from(
        adapter
            .get_string("report", "output_dir")
            .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
    )
}

pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    report_port: Option<&dyn ReportPort>,
    bt_config: &BacktestConfig,
    output_dir: &Path,
) -> ExitCode {
    // Stage 1: Fetch prices
    eprintln!(
        "Fetching {} from {} to {}",
        bt_config.ticker, bt_config.start_date, bt_config.end_date
    );
    let prices = match data_port.fetch_prices(
        &bt_config.ticker,
        bt_config.start_date,
        bt_config.end_date,
    ) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 2: Signals, portfolio and metrics
    eprintln!(
        "Running backtest: {} prices, windows {}/{}",
        prices.len(),
        bt_config.short_window,
        bt_config.long_window
    );
    let result = match backtest_engine::run(&prices, bt_config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 3: Console summary
    println!("{}", result.metrics);

    // Stage 4: Charts
    if let Some(report_port) = report_port {
        match report_port.write(&result, bt_config, output_dir) {
            Ok(files) => {
                for file in &files {
                    eprintln!("Chart written to: {}", file.display());
                }
            }
            Err(e) => {
                eprintln!("error: failed to write charts: {e}");
                return (&e).into();
            }
        }
    }

    ExitCode::SUCCESS
}

pub fn run_dry_run(config_path: &Path, overrides: &Overrides) -> ExitCode {
    let (adapter, bt_config) = match load_validated_config(config_path, overrides) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };

    eprintln!("Config validated successfully");
    eprintln!("\nBacktest:");
    eprintln!("  ticker:          {}", bt_config.ticker);
    eprintln!(
        "  period:          {} to {}",
        bt_config.start_date, bt_config.end_date
    );
    eprintln!("  initial capital: {:.2}", bt_config.initial_capital);
    eprintln!("  trade size:      {}", bt_config.trade_size);
    eprintln!("\nStrategy:");
    eprintln!("  short window:    {}", bt_config.short_window);
    eprintln!("  long window:     {}", bt_config.long_window);
    eprintln!("\nData directory:    {}", data_dir(&adapter).display());
    eprintln!("Output directory:  {}", output_dir(&adapter).display());

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

pub fn run_list_symbols(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let data_port = CsvAdapter::new(data_dir(&adapter));

    let symbols = match data_port.list_symbols() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if symbols.is_empty() {
        eprintln!("No symbols found in {}", data_dir(&adapter).display());
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}

pub fn run_info(ticker: Option<&str>, config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let ticker = match ticker
        .map(str::to_string)
        .or_else(|| adapter.get_string("backtest", "ticker"))
    {
        Some(t) => t,
        None => {
            let err = CrossoverError::ConfigMissing {
                section: "backtest".into(),
                key: "ticker".into(),
            };
            eprintln!("error: {err}");
            return (&err).into();
        }
    };

    let data_port = CsvAdapter::new(data_dir(&adapter));
    match data_port.get_data_range(&ticker) {
        Ok(Some((first, last, rows))) => {
            println!("{}: {} to {} ({} rows)", ticker, first, last, rows);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            let err = CrossoverError::UnknownSymbol { ticker };
            eprintln!("error: {err}");
            (&err).into()
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
