//! Connection panel domain types.
//!
//! These types represent tool-provider servers as the client sees them,
//! independent of any transport or rendering concerns.
//!
//! # Design
//!
//! - `ServerRecord` - One server as reported by the directory
//! - `ConnectionStatus` - Backend-reported connection state
//! - `ToolDescriptor` - A tool exposed by a connected server
//! - `DirectorySnapshot` - The full server list from one successful poll
//! - `ToolChoice` - Global policy for how an agent invokes tools

mod server;
mod tool_choice;

pub use server::{ConnectionStatus, DirectorySnapshot, ServerRecord, ToolDescriptor};
pub use tool_choice::{ToolChoice, ToolChoiceParseError};
