use clap::Parser;
use crossover::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
