//! `dsg`: the Django Starter Generator.
//!
//! Asks a few questions, then creates, configures and launches a new Django
//! project next to the generator's own directory.
//!
//! Arguments are parsed first, then logging and the tool configuration are
//! set up. A failure in any of these ends the run before the banner is shown.
//! Every error is reported once, here, and mapped to an exit code:
//!
//! | Code | Meaning                       |
//! |------|-------------------------------|
//! |  0   | Project created               |
//! |  1   | Internal or pipeline failure  |
//! |  2   | Invalid arguments or input    |
//! |  3   | Template archive or file missing |
//! |  4   | Bad tool configuration        |
//! | 130  | Interrupted with Ctrl+C       |

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info};

use crate::{cli::Cli, config::AppConfig, error::CliError, output::OutputManager};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;
mod prompt;

fn main() -> ExitCode {
    // A missing .env is not an error.
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version arrive here too, on stdout with code 0.
            let _ = e.print();
            return ExitCode::from(e.exit_code() as u8);
        }
    };
    let verbose = cli.global.verbose > 0;

    if let Err(e) = logging::init_logging(&cli.global) {
        eprintln!("Failed to initialise logging: {e:#}");
        return ExitCode::FAILURE;
    }
    debug!(args = ?cli.global, "Arguments parsed");

    let config = match AppConfig::load(cli.global.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            return report(
                CliError::ConfigError {
                    message: format!("{e:#}"),
                    source: Some(e.into()),
                },
                verbose,
            );
        }
    };
    debug!(?config, "Configuration loaded");

    let output = OutputManager::new(&cli.global, &config);
    match commands::provision::execute(config, output) {
        Ok(()) => {
            info!("Run finished");
            ExitCode::SUCCESS
        }
        Err(e) => report(e, verbose),
    }
}

fn report(err: CliError, verbose: bool) -> ExitCode {
    err.log();
    eprint!("{}", err.render(verbose, std::io::stderr().is_terminal()));
    ExitCode::from(err.exit_code())
}
