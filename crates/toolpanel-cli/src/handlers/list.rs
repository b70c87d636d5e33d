//! List command handler.
//!
//! Fetches the server directory once and prints the panel rows.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::{render_notification, render_view};

/// Execute the list command.
///
/// A failed fetch is reported on stderr and returned as
/// `CliError::Unavailable` so the process exits non-zero.
pub async fn execute(ctx: &mut CliContext) -> Result<()> {
    let fetched = ctx.backend.refetch().await;

    for notification in ctx.pending_notifications() {
        eprintln!("{}", render_notification(&notification));
    }
    fetched.map_err(CliError::from)?;

    print!("{}", render_view(&ctx.backend.view()));
    Ok(())
}
