//! Command handlers.
//!
//! Each handler takes the composed `CliContext` and drives the panel.

pub mod list;
pub mod shell;
pub mod tools;
