//! CLI integration tests for the backtest command orchestration.
//!
//! Tests cover:
//! - Config parsing (build_backtest_config) and command-line overrides
//! - Dry-run mode with real INI files on disk
//! - Pipeline with MockDataPort
//! - Full pipeline over CSV files with chart output
//! - Symbol listing and data range lookups

mod common;

use common::*;
use crossover::adapters::csv_adapter::CsvAdapter;
use crossover::adapters::file_config_adapter::FileConfigAdapter;
use crossover::adapters::svg_chart_adapter::{EQUITY_FILE, SIGNALS_FILE, SvgChartAdapter};
use crossover::cli::{self, Overrides};
use crossover::domain::error::CrossoverError;
use crossover::ports::report_port::ReportPort;
use std::fs;
use std::io::Write;
use std::process::ExitCode;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const VALID_INI: &str = r#"
[data]
directory = prices

[backtest]
ticker = AAPL
start_date = 2020-01-01
end_date = 2023-01-01
initial_capital = 10000.0
trade_size = 50

[strategy]
short_window = 40
long_window = 100

[report]
output_dir = out
"#;

mod config_loading {
    use super::*;

    #[test]
    fn build_backtest_config_valid_full() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let config = cli::build_backtest_config(&adapter).unwrap();

        assert_eq!(config.ticker, "AAPL");
        assert_eq!(config.start_date, date(2020, 1, 1));
        assert_eq!(config.end_date, date(2023, 1, 1));
        assert!((config.initial_capital - 10_000.0).abs() < f64::EPSILON);
        assert_eq!(config.trade_size, 50);
        assert_eq!(config.short_window, 40);
        assert_eq!(config.long_window, 100);
    }

    #[test]
    fn build_backtest_config_uses_defaults() {
        let ini = "[backtest]\nticker = MSFT\nstart_date = 2020-01-01\nend_date = 2021-01-01\n";
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let config = cli::build_backtest_config(&adapter).unwrap();

        assert!((config.initial_capital - 10_000.0).abs() < f64::EPSILON);
        assert_eq!(config.trade_size, 100);
        assert_eq!(config.short_window, 40);
        assert_eq!(config.long_window, 100);
        assert_eq!(cli::data_dir(&adapter), std::path::PathBuf::from("data"));
        assert_eq!(cli::output_dir(&adapter), std::path::PathBuf::from("report"));
    }

    #[test]
    fn build_backtest_config_missing_ticker() {
        let ini = "[backtest]\nstart_date = 2020-01-01\nend_date = 2021-01-01\n";
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let err = cli::build_backtest_config(&adapter).unwrap_err();
        assert!(matches!(err, CrossoverError::ConfigMissing { key, .. } if key == "ticker"));
    }

    #[test]
    fn build_backtest_config_negative_window() {
        let ini = "[backtest]\nticker = X\nstart_date = 2020-01-01\nend_date = 2021-01-01\n\
                   [strategy]\nshort_window = -3\n";
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let err = cli::build_backtest_config(&adapter).unwrap_err();
        assert!(matches!(err, CrossoverError::ConfigInvalid { key, .. } if key == "short_window"));
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        Overrides {
            ticker: Some("MSFT".into()),
            short_window: Some(5),
            long_window: Some(20),
        }
        .apply(&mut adapter);

        let config = cli::build_backtest_config(&adapter).unwrap();
        assert_eq!(config.ticker, "MSFT");
        assert_eq!(config.short_window, 5);
        assert_eq!(config.long_window, 20);
        assert_eq!(config.trade_size, 50);
    }
}

mod dry_run {
    use super::*;

    #[test]
    fn valid_config_succeeds() {
        let file = write_temp_ini(VALID_INI);
        let code = cli::run_dry_run(file.path(), &Overrides::default());
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[test]
    fn missing_file_is_config_error() {
        let code = cli::run_dry_run(
            std::path::Path::new("/nonexistent/crossover.ini"),
            &Overrides::default(),
        );
        assert_eq!(code, ExitCode::from(2));
    }

    #[test]
    fn inverted_window_override_is_rejected() {
        let file = write_temp_ini(VALID_INI);
        let overrides = Overrides {
            short_window: Some(200),
            ..Overrides::default()
        };
        let code = cli::run_dry_run(file.path(), &overrides);
        assert_eq!(code, ExitCode::from(2));
    }
}

mod pipeline_with_mock {
    use super::*;

    #[test]
    fn succeeds_without_report() {
        let port = MockDataPort::new().with_prices("TEST", step_prices());
        let dir = tempfile::TempDir::new().unwrap();
        let code = cli::run_backtest_pipeline(&port, None, &sample_config(), dir.path());
        assert_eq!(code, ExitCode::SUCCESS);
        assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn data_error_maps_to_exit_code() {
        let port = MockDataPort::new().with_error("TEST", "connection refused");
        let dir = tempfile::TempDir::new().unwrap();
        let code = cli::run_backtest_pipeline(&port, None, &sample_config(), dir.path());
        assert_eq!(code, ExitCode::from(3));
    }

    #[test]
    fn empty_series_maps_to_exit_code() {
        let port = MockDataPort::new();
        let dir = tempfile::TempDir::new().unwrap();
        let code = cli::run_backtest_pipeline(&port, None, &sample_config(), dir.path());
        assert_eq!(code, ExitCode::from(5));
    }

    #[test]
    fn writes_charts_through_report_port() {
        let port = MockDataPort::new().with_prices("TEST", step_prices());
        let dir = tempfile::TempDir::new().unwrap();
        let charts = SvgChartAdapter::new();
        let code = cli::run_backtest_pipeline(
            &port,
            Some(&charts as &dyn ReportPort),
            &sample_config(),
            dir.path(),
        );
        assert_eq!(code, ExitCode::SUCCESS);
        assert!(dir.path().join(SIGNALS_FILE).exists());
        assert!(dir.path().join(EQUITY_FILE).exists());
    }
}

mod csv_end_to_end {
    use super::*;
    use crossover::domain::backtest::{self, BacktestConfig};
    use crossover::ports::data_port::DataPort;

    #[test]
    fn csv_prices_flow_through_pipeline() {
        let dir = tempfile::TempDir::new().unwrap();
        let values = [10.0, 10.0, 10.0, 10.0, 10.0, 12.0, 12.0, 12.0, 12.0, 12.0];
        fs::write(dir.path().join("TEST.csv"), csv_content(&values)).unwrap();

        let port = CsvAdapter::new(dir.path().to_path_buf());
        let config = sample_config();
        let prices = port
            .fetch_prices(&config.ticker, config.start_date, config.end_date)
            .unwrap();
        assert_eq!(prices.len(), 10);

        let run = backtest::run(&prices, &config).unwrap();
        assert_eq!(run.portfolio.points[5].cash, -200.0);
        assert_eq!(run.portfolio.points[9].total_equity, 1000.0);

        let out = dir.path().join("out");
        let files = SvgChartAdapter::new().write(&run, &config, &out).unwrap();
        assert_eq!(files.len(), 2);
        let svg = fs::read_to_string(out.join(SIGNALS_FILE)).unwrap();
        assert!(svg.contains("class=\"buy\""));
        assert!(svg.contains("class=\"sell\""));
    }

    #[test]
    fn csv_pipeline_exit_codes() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("TEST.csv"), csv_content(&[10.0, 11.0, 12.0])).unwrap();
        let port = CsvAdapter::new(dir.path().to_path_buf());

        let ok = cli::run_backtest_pipeline(&port, None, &sample_config(), dir.path());
        assert_eq!(ok, ExitCode::SUCCESS);

        let missing = BacktestConfig {
            ticker: "NOPE".into(),
            ..sample_config()
        };
        let code = cli::run_backtest_pipeline(&port, None, &missing, dir.path());
        assert_eq!(code, ExitCode::from(3));

        let out_of_range = BacktestConfig {
            start_date: date(2021, 1, 1),
            end_date: date(2021, 12, 31),
            ..sample_config()
        };
        let code = cli::run_backtest_pipeline(&port, None, &out_of_range, dir.path());
        assert_eq!(code, ExitCode::from(5));
    }
}

mod data_commands {
    use super::*;

    fn ini_for(dir: &std::path::Path, ticker: Option<&str>) -> tempfile::NamedTempFile {
        let mut content = format!("[data]\ndirectory = {}\n", dir.display());
        if let Some(ticker) = ticker {
            content.push_str(&format!("[backtest]\nticker = {}\n", ticker));
        }
        write_temp_ini(&content)
    }

    #[test]
    fn list_symbols_succeeds_with_files() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("AAPL.csv"), csv_content(&[1.0, 2.0])).unwrap();
        fs::write(dir.path().join("MSFT.csv"), csv_content(&[3.0])).unwrap();
        let ini = ini_for(dir.path(), None);
        assert_eq!(cli::run_list_symbols(ini.path()), ExitCode::SUCCESS);
    }

    #[test]
    fn list_symbols_empty_directory_succeeds() {
        let dir = tempfile::TempDir::new().unwrap();
        let ini = ini_for(dir.path(), None);
        assert_eq!(cli::run_list_symbols(ini.path()), ExitCode::SUCCESS);
    }

    #[test]
    fn list_symbols_missing_directory_is_data_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let ini = ini_for(&dir.path().join("absent"), None);
        assert_eq!(cli::run_list_symbols(ini.path()), ExitCode::from(3));
    }

    #[test]
    fn list_symbols_missing_config_file() {
        let code = cli::run_list_symbols(std::path::Path::new("/nonexistent/crossover.ini"));
        assert_eq!(code, ExitCode::from(2));
    }

    #[test]
    fn info_reports_range_for_known_ticker() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("AAPL.csv"), csv_content(&[1.0, 2.0, 3.0])).unwrap();
        let ini = ini_for(dir.path(), None);
        assert_eq!(cli::run_info(Some("AAPL"), ini.path()), ExitCode::SUCCESS);
    }

    #[test]
    fn info_falls_back_to_configured_ticker() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("MSFT.csv"), csv_content(&[4.0, 5.0])).unwrap();
        let ini = ini_for(dir.path(), Some("MSFT"));
        assert_eq!(cli::run_info(None, ini.path()), ExitCode::SUCCESS);
    }

    #[test]
    fn info_unknown_ticker_maps_through_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let ini = ini_for(dir.path(), None);
        let expected = ExitCode::from(&CrossoverError::UnknownSymbol {
            ticker: "NOPE".into(),
        });
        assert_eq!(cli::run_info(Some("NOPE"), ini.path()), expected);
        assert_eq!(expected, ExitCode::from(5));
    }

    #[test]
    fn info_without_any_ticker_is_config_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let ini = ini_for(dir.path(), None);
        assert_eq!(cli::run_info(None, ini.path()), ExitCode::from(2));
    }
}
