mod cli;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;
use tracing::{info, warn};

use pagemark_mcp::server::McpServer;
use pagemark_mcp::transport::StdioTransport;
use pagemark_toolkit::assist::AssistantCommand;
use pagemark_toolkit::tools::{FetchConfig, FetchPageTool};
use pagemark_toolkit::{EchoTool, ToolRegistry};

use crate::cli::CliArgs;
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Stdout carries the protocol; all diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    let mut config = Config::load(args.config.as_deref())
        .context("failed to load configuration")?;
    if let Some(name) = args.server_name {
        config.server_name = name;
    }
    if let Some(agent) = args.user_agent {
        config.user_agent = agent;
    }
    if let Some(secs) = args.timeout_secs {
        config.request_timeout_secs = secs;
    }
    if let Some(assistant) = args.assistant {
        config.assistant_command = assistant.split_whitespace().map(String::from).collect();
    }

    let assistant = match AssistantCommand::from_argv(
        &config.assistant_command,
        Duration::from_secs(AssistantCommand::DEFAULT_TIMEOUT_SECS),
    ) {
        Ok(cmd) => Some(cmd),
        Err(e) => {
            warn!(error = %e, "assistant disabled");
            None
        }
    };

    let fetch_config = FetchConfig {
        user_agent: config.user_agent.clone(),
        accept_language: config.accept_language.clone(),
        timeout: Duration::from_secs(config.request_timeout_secs),
        assistant,
        ..FetchConfig::default()
    };

    let mut registry = ToolRegistry::new();
    registry.register(FetchPageTool::new(fetch_config));
    if args.with_echo {
        registry.register(EchoTool);
    }

    info!(server = %config.server_name, tools = registry.len(), "starting");

    let server = McpServer::new(registry)
        .with_name(config.server_name.clone())
        .with_version(env!("CARGO_PKG_VERSION"));

    let mut transport = StdioTransport::stdio();
    server
        .run(&mut transport)
        .await
        .context("server terminated with an error")?;

    Ok(())
}
