//! Domain error types.

/// Top-level error type for crossover.
#[derive(Debug, thiserror::Error)]
pub enum CrossoverError {
    #[error("invalid window sizes: short={short}, long={long} (need 0 < short < long)")]
    InvalidWindow { short: usize, long: usize },

    #[error("price series is empty")]
    EmptySeries,

    #[error("invalid price {price} at index {index}: prices must be finite and positive")]
    InvalidPrice { index: usize, price: f64 },

    #[error("dates must be strictly increasing (violated at index {index})")]
    UnorderedDates { index: usize },

    #[error("invalid initial capital {capital}: must be positive")]
    InvalidCapital { capital: f64 },

    #[error("invalid trade size: must be at least one share")]
    InvalidTradeSize,

    #[error("signal series is empty")]
    EmptySignalSeries,

    #[error("insufficient data: have {points} portfolio points, need at least 2")]
    InsufficientData { points: usize },

    #[error("sharpe ratio is undefined (fewer than 2 returns or zero volatility)")]
    UndefinedSharpe,

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {ticker} between {start} and {end}")]
    NoData {
        ticker: String,
        start: String,
        end: String,
    },

    #[error("no price data for {ticker}")]
    UnknownSymbol { ticker: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&CrossoverError> for std::process::ExitCode {
    fn from(err: &CrossoverError) -> Self {
        let code: u8 = match err {
            CrossoverError::Io(_) => 1,
            CrossoverError::ConfigParse { .. }
            | CrossoverError::ConfigMissing { .. }
            | CrossoverError::ConfigInvalid { .. } => 2,
            CrossoverError::Data { .. } => 3,
            CrossoverError::InvalidWindow { .. }
            | CrossoverError::InvalidPrice { .. }
            | CrossoverError::UnorderedDates { .. }
            | CrossoverError::InvalidCapital { .. }
            | CrossoverError::InvalidTradeSize => 4,
            CrossoverError::EmptySeries
            | CrossoverError::EmptySignalSeries
            | CrossoverError::InsufficientData { .. }
            | CrossoverError::UndefinedSharpe
            | CrossoverError::NoData { .. }
            | CrossoverError::UnknownSymbol { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::ExitCode;

    #[test]
    fn invalid_window_message_names_both_windows() {
        let err = CrossoverError::InvalidWindow { short: 50, long: 10 };
        assert_eq!(
            err.to_string(),
            "invalid window sizes: short=50, long=10 (need 0 < short < long)"
        );
    }

    #[test]
    fn config_missing_message() {
        let err = CrossoverError::ConfigMissing {
            section: "backtest".into(),
            key: "ticker".into(),
        };
        assert_eq!(err.to_string(), "missing config key [backtest] ticker");
    }

    #[test]
    fn exit_codes_by_family() {
        let config = CrossoverError::ConfigInvalid {
            section: "strategy".into(),
            key: "long_window".into(),
            reason: "bad".into(),
        };
        assert_eq!(ExitCode::from(&config), ExitCode::from(2));
        assert_eq!(
            ExitCode::from(&CrossoverError::Data { reason: "x".into() }),
            ExitCode::from(3)
        );
        assert_eq!(
            ExitCode::from(&CrossoverError::InvalidWindow { short: 0, long: 1 }),
            ExitCode::from(4)
        );
        assert_eq!(
            ExitCode::from(&CrossoverError::InsufficientData { points: 1 }),
            ExitCode::from(5)
        );
        assert_eq!(
            ExitCode::from(&CrossoverError::UnknownSymbol {
                ticker: "ZZZ".into()
            }),
            ExitCode::from(5)
        );
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: CrossoverError = io.into();
        assert!(matches!(err, CrossoverError::Io(_)));
        assert_eq!(err.to_string(), "gone");
    }
}
