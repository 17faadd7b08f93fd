//! Flags shared by every run.
//!
//! Flattened into [`super::Cli`]. They only tune the tool itself; project
//! values are never taken from the command line.

use std::path::PathBuf;

use clap::{ArgAction, Args, builder::FalseyValueParser};

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Show pipeline diagnostics on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print errors only; banner, notices and progress are skipped.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Plain output without ANSI colours. Also set by any `NO_COLOR` value
    /// other than an empty or falsey one (`0`, `false`, `no`, `off`).
    #[arg(long, env = "NO_COLOR", value_parser = FalseyValueParser::new())]
    pub no_color: bool,

    /// Read tool settings from FILE instead of the user config directory.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
