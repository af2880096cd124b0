//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::domain::models::McpTransport;

#[derive(Parser)]
#[command(name = "human-in-mcp")]
#[command(about = "Human-in-the-loop MCP server", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the operator gateway and the MCP transport
    Serve(ServeArgs),

    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(clap::Args, Debug, Default)]
pub struct ServeArgs {
    /// MCP transport (overrides mcp.transport)
    #[arg(short, long, value_enum)]
    pub transport: Option<TransportArg>,

    /// Gateway port (overrides gateway.port)
    #[arg(long)]
    pub gateway_port: Option<u16>,

    /// MCP HTTP port (overrides mcp.port)
    #[arg(long)]
    pub mcp_port: Option<u16>,

    /// Extra configuration file merged before environment variables
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the merged configuration
    Show {
        /// Extra configuration file merged before environment variables
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportArg {
    Stdio,
    Http,
}

impl From<TransportArg> for McpTransport {
    fn from(arg: TransportArg) -> Self {
        match arg {
            TransportArg::Stdio => Self::Stdio,
            TransportArg::Http => Self::Http,
        }
    }
}
