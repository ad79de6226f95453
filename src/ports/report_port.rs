//! Report generation port trait.

use crate::domain::backtest::{BacktestConfig, BacktestRun};
use crate::domain::error::CrossoverError;
use std::path::{Path, PathBuf};

/// Port for writing backtest reports.
pub trait ReportPort {
    /// Write the report into `output_dir` and return the files created.
    fn write(
        &self,
        run: &BacktestRun,
        config: &BacktestConfig,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, CrossoverError>;
}
