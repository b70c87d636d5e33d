//! Available subcommands.

use clap::Subcommand;

/// Commands for the connection panel tool.
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the server directory once and print it
    List,

    /// Print the tools exposed by one server
    Tools {
        /// Server name as shown by `list`
        name: String,
    },

    /// Open the panel and drive it interactively
    Shell,
}
