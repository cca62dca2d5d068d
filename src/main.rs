use clap::Parser;
use signalscan::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
