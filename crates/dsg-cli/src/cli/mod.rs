//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names and help
//! text.  No business logic lives here.

use clap::Parser;

pub mod global;
pub use global::GlobalArgs;

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name     = "dsg",
    bin_name = "dsg",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Django Starter Generator",
    long_about = "Django Starter Generator creates, configures and launches a new \
                  Django project. All project settings are asked for interactively.",
    after_help = "Run the generator from its own directory, next to sources.tar.gz.\n\
                  The project is created in the parent directory unless \
                  workspace.root is configured.\n\n\
                  CONFIGURATION:\n\
        \x20 --config FILE, or config.toml in the user config directory\n\
        \x20 DSG_WORKSPACE__ROOT, DSG_WORKSPACE__ARCHIVE, DSG_CLEANUP__REMOVE_TOOL_DIR, ..."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_is_valid() {
        let cli = Cli::try_parse_from(["dsg"]).unwrap();
        assert_eq!(cli.global.verbose, 0);
        assert!(!cli.global.quiet);
        assert!(cli.global.config.is_none());
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::try_parse_from(["dsg", "-vvv"]).unwrap();
        assert_eq!(cli.global.verbose, 3);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["dsg", "--quiet", "--verbose"]);
        assert!(result.is_err());
    }

    #[test]
    fn project_values_are_not_flags() {
        assert!(Cli::try_parse_from(["dsg", "--name", "shop"]).is_err());
        assert!(Cli::try_parse_from(["dsg", "shop"]).is_err());
    }

    #[test]
    fn no_color_flag_takes_no_value() {
        let cli = Cli::try_parse_from(["dsg", "--no-color"]).unwrap();
        assert!(cli.global.no_color);
        assert!(Cli::try_parse_from(["dsg", "--no-color=1"]).is_err());
    }

    #[test]
    fn config_path_is_accepted() {
        let cli = Cli::try_parse_from(["dsg", "-c", "dsg.toml"]).unwrap();
        assert_eq!(cli.global.config.unwrap().to_str(), Some("dsg.toml"));
    }
}
