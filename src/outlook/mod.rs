//! Outlook mail module
//!
//! Token acquisition and message retrieval against Microsoft Graph.

pub mod auth;
pub mod client;
pub mod types;
