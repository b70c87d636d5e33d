//! Shared CLI presentation utilities.
//!
//! # Guidelines
//!
//! - Keep this module format-only: no domain transforms
//! - Renderers return strings; handlers decide where they go

pub mod panel;
pub mod tables;

pub use panel::{render_notification, render_tools, render_view};
pub use tables::truncate_string;
