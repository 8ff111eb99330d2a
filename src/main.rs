use clap::Parser;
use maplescan::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
