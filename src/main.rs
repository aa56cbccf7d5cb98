use clap::Parser;
use goldmon::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
