use bondexport::cli::{Cli, run};
use clap::Parser;

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
