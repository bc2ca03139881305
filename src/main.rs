//! Outlook Summary MCP Server
//!
//! Serves the `summarize_outlook_emails` tool over stdio, or runs it once from
//! the command line.

use std::sync::Arc;

use clap::{Parser, Subcommand};

use outlook_summary_mcp::config::Config;
use outlook_summary_mcp::error::Result;
use outlook_summary_mcp::llm::GeminiClient;
use outlook_summary_mcp::mcp::server::McpServer;
use outlook_summary_mcp::mcp::tools::{ToolHandler, DEFAULT_LIMIT};
use outlook_summary_mcp::outlook::auth::ClientCredentialsProvider;
use outlook_summary_mcp::outlook::client::OutlookClient;
use outlook_summary_mcp::summarizer::Summarizer;

/// Outlook Summary MCP Server
#[derive(Parser)]
#[command(name = "outlook-summary-mcp")]
#[command(author, version, about = "Outlook Summary MCP Server - summarizes recent Outlook emails with Gemini")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize the latest emails once and print the result
    Summarize {
        /// Number of emails to fetch
        #[arg(long, default_value_t = DEFAULT_LIMIT, allow_negative_numbers = true)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging; stdout carries JSON-RPC
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::from_env();
    let missing = config.missing_fields();
    if !missing.is_empty() {
        tracing::warn!(
            missing = %missing.join(", "),
            "Environment incomplete; requests will fail until these are set"
        );
    }

    let handler = build_handler(&config);

    match cli.command {
        Some(Commands::Summarize { limit }) => {
            println!("{}", handler.summarize_recent_messages(limit).await);
        }
        None => {
            tracing::info!(model = %config.model, "Starting MCP server on stdio");
            let mut server = McpServer::new(handler);
            server.run_stdio().await?;
        }
    }

    Ok(())
}

fn build_handler(config: &Config) -> ToolHandler {
    let http_client = reqwest::Client::new();

    let tokens = Arc::new(ClientCredentialsProvider::new(config, http_client.clone()));
    let messages = Arc::new(OutlookClient::new(config, http_client.clone()));
    let model = Arc::new(GeminiClient::new(config, http_client));

    ToolHandler::new(tokens, messages, Summarizer::new(model))
}
