//! MCP (Model Context Protocol) module
//!
//! JSON-RPC over stdio plus the `summarize_outlook_emails` tool.

pub mod server;
pub mod tools;
pub mod types;
