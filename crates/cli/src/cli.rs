use clap::Parser;

/// MCP server exposing a web-page fetch tool.
///
/// Speaks newline-delimited JSON-RPC 2.0 on stdin/stdout; diagnostics go
/// to stderr. Run it as a subprocess of an MCP client.
#[derive(Parser, Debug)]
#[command(name = "pagemark", about = "MCP server exposing a web-page fetch tool")]
pub struct CliArgs {
    /// Path to config file (default: ~/.config/pagemark/config.toml)
    #[arg(long)]
    pub config: Option<String>,

    /// Server name reported during initialization
    #[arg(long)]
    pub server_name: Option<String>,

    /// User-Agent header sent with outgoing fetches
    #[arg(long)]
    pub user_agent: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Assistant command for the fetch tool's prompt argument,
    /// e.g. "claude --print" (overrides config)
    #[arg(long)]
    pub assistant: Option<String>,

    /// Also register the echo test tool
    #[arg(long)]
    pub with_echo: bool,
}
