//! exreport - exception record report generator
//!
//! Scans the record store, groups records by exception type and category,
//! and prints, saves or mails the HTML summary.

use clap::Parser;
use exreport::cli::{Cli, Commands};
use exreport::{commands, logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match commands::load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::from(78);
        }
    };
    logging::init(&config.log.level, config.report.verbose);

    let result = match &cli.command {
        Commands::Report { output, format } => commands::report(&config, output.as_deref(), *format),
        Commands::Scan => commands::scan(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(commands::exit_code(&e))
        }
    }
}
