//! Text rendering of the connection panel.

use std::fmt::Write;

use toolpanel_core::ToolDescriptor;
use toolpanel_core::ports::{Notification, NotificationLevel};
use toolpanel_gui::{PanelView, RowIndicator, ServerRow};

use super::tables::truncate_string;

const NAME_WIDTH: usize = 24;
const DESCRIPTION_WIDTH: usize = 60;

fn switch(row: &ServerRow) -> &'static str {
    match (row.busy, row.is_connected()) {
        (true, _) => "[...]",
        (false, true) => "[on ]",
        (false, false) => "[off]",
    }
}

fn status_note(row: &ServerRow) -> String {
    match row.indicator() {
        RowIndicator::Busy => "working".to_string(),
        RowIndicator::Error => format!("error: {}", row.error.as_deref().unwrap_or_default()),
        RowIndicator::None if row.is_connected() => match row.tool_catalog.len() {
            1 => "1 tool".to_string(),
            n => format!("{n} tools"),
        },
        RowIndicator::None => String::new(),
    }
}

fn push_tools(out: &mut String, tools: &[ToolDescriptor], indent: &str) {
    if tools.is_empty() {
        let _ = writeln!(out, "{indent}No tools available for this server");
        return;
    }
    for tool in tools {
        let _ = writeln!(
            out,
            "{indent}- {:<width$} {}",
            tool.name,
            truncate_string(&tool.description, DESCRIPTION_WIDTH),
            width = NAME_WIDTH
        );
    }
}

/// Render the whole panel.
pub fn render_view(view: &PanelView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Tool choice: {}", view.tool_choice);

    if view.is_empty() {
        let _ = writeln!(out, "  Connect to tool servers and use their tools");
        return out;
    }

    for row in &view.rows {
        let marker = if row.expanded { 'v' } else { '>' };
        let _ = writeln!(
            out,
            "{marker} {} {:<width$} {}",
            switch(row),
            truncate_string(&row.name, NAME_WIDTH),
            status_note(row),
            width = NAME_WIDTH
        );
        if row.expanded {
            push_tools(&mut out, &row.tool_catalog, "      ");
        }
    }
    out
}

/// Render the tool list of one server.
pub fn render_tools(name: &str, tools: &[ToolDescriptor]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Tools on {name}:");
    push_tools(&mut out, tools, "  ");
    out
}

pub fn render_notification(notification: &Notification) -> String {
    let prefix = match notification.level {
        NotificationLevel::Error => "!",
        NotificationLevel::Info => "*",
    };
    match &notification.server_name {
        Some(name) => format!("{prefix} {name}: {}", notification.message),
        None => format!("{prefix} {}", notification.message),
    }
}
