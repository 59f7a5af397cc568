use clap::Parser;
use trendrank::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
