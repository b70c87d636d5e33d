//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface definition for the connection panel.
///
/// This is the top-level parser that handles global options and dispatches
/// to subcommands.
#[derive(Parser)]
#[command(name = "toolpanel")]
#[command(about = "Inspect and drive tool-provider server connections")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// JSON file with panel settings and server fixtures
    #[arg(short = 'c', long = "config", global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Seconds between automatic refreshes while the panel is open
    #[arg(
        long = "poll-interval",
        global = true,
        env = "TOOLPANEL_POLL_INTERVAL",
        value_name = "SECS"
    )]
    pub poll_interval: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from([
            "toolpanel",
            "--verbose",
            "--config",
            "/tmp/panel.json",
            "--poll-interval",
            "15",
            "list",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/panel.json")));
        assert_eq!(cli.poll_interval, Some(15));
        assert!(matches!(cli.command, Some(Commands::List)));
    }

    #[test]
    fn test_tools_subcommand() {
        let cli = Cli::parse_from(["toolpanel", "tools", "filesystem"]);
        assert!(matches!(cli.command, Some(Commands::Tools { ref name }) if name == "filesystem"));
    }

    #[test]
    fn test_rejects_non_numeric_interval() {
        assert!(Cli::try_parse_from(["toolpanel", "--poll-interval", "soon", "list"]).is_err());
    }
}
