//! Outlook Summary MCP Server Library
//!
//! A Model Context Protocol (MCP) server exposing one tool that fetches the
//! latest Outlook emails through Microsoft Graph and summarizes them with Gemini.

pub mod config;
pub mod error;
pub mod llm;
pub mod mcp;
pub mod outlook;
pub mod summarizer;

pub use config::Config;
pub use error::{Result, SummarizerError};
