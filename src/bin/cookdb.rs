//! cookdb CLI Binary
//!
//! Command-line interface for inspecting and maintaining cooked asset freshness.

use clap::Parser;
use cookdb::logging::init_logging;
use cookdb::tooling::cli::{Cli, CliContext};
use std::process;

fn main() {
    let cli = Cli::parse();

    let context = match CliContext::new(
        cli.workspace.clone(),
        cli.config.clone(),
        cli.platform.as_deref(),
    ) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(Some(&cli.logging_config(context.config()))) {
        eprintln!("Error initializing logging: {}", e);
        process::exit(1);
    }

    match context.execute(&cli.command) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
