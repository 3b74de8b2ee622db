#![forbid(unsafe_code)]

//! rover — Rover Console CLI entry point.

use clap::Parser;

fn main() {
    let args = rover_console::cli_app::Cli::parse();
    if let Err(e) = rover_console::cli_app::run(&args) {
        eprintln!("rover: {e}");
        std::process::exit(1);
    }
}
