//! Tools command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::{render_notification, render_tools};

/// Fetch the directory and print the tool catalog of `name`.
pub async fn execute(ctx: &mut CliContext, name: &str) -> Result<()> {
    let fetched = ctx.backend.refetch().await;
    for notification in ctx.pending_notifications() {
        eprintln!("{}", render_notification(&notification));
    }
    fetched.map_err(CliError::from)?;

    let tools = ctx.backend.server_tools(name).map_err(CliError::from)?;
    print!("{}", render_tools(name, &tools));
    Ok(())
}
