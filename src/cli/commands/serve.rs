//! `serve` command: wires the registry, broker and coordinator, then runs
//! the operator gateway alongside the MCP transport until shutdown.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::adapters::gateway::GatewayServer;
use crate::adapters::mcp::{McpHandler, McpHttpConfig, McpHttpServer, StdioServer};
use crate::adapters::memory::InMemoryTaskRegistry;
use crate::cli::types::ServeArgs;
use crate::domain::models::{Config, McpTransport};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::LoggerImpl;
use crate::services::{InteractionCoordinator, RendezvousBroker};

/// Build the coordinator and everything it owns from `config`.
pub fn build_coordinator(config: &Config) -> Arc<InteractionCoordinator> {
    let registry = Arc::new(InMemoryTaskRegistry::new());
    let broker = Arc::new(RendezvousBroker::new(registry, &config.broker));
    Arc::new(InteractionCoordinator::new(broker, &config.interaction))
}

/// Apply command-line overrides on top of the loaded configuration.
pub fn apply_overrides(config: &mut Config, args: &ServeArgs) {
    if let Some(transport) = args.transport {
        config.mcp.transport = transport.into();
    }
    if let Some(port) = args.gateway_port {
        config.gateway.port = port;
    }
    if let Some(port) = args.mcp_port {
        config.mcp.port = port;
    }
}

pub async fn execute(args: ServeArgs, _json: bool) -> Result<()> {
    let mut config = ConfigLoader::load_with(args.config.as_deref())?;
    apply_overrides(&mut config, &args);
    ConfigLoader::validate(&config)?;

    let _logger = LoggerImpl::init(&config.logging)?;
    let coordinator = build_coordinator(&config);
    let shutdown = CancellationToken::new();

    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            signal.cancel();
        }
    });

    let gateway = GatewayServer::new(Arc::clone(&coordinator), config.gateway.clone());
    let gateway_shutdown = shutdown.clone();
    let gateway_task = tokio::spawn(
        gateway.serve_with_shutdown(async move { gateway_shutdown.cancelled().await }),
    );

    let handler = McpHandler::new(coordinator);
    let transport_result = match config.mcp.transport {
        McpTransport::Stdio => StdioServer::new(handler, shutdown.clone()).run().await,
        McpTransport::Http => {
            let mcp_config = McpHttpConfig {
                host: config.mcp.host.clone(),
                port: config.mcp.port,
                enable_cors: config.gateway.enable_cors,
            };
            let mcp_shutdown = shutdown.clone();
            McpHttpServer::new(handler, mcp_config, shutdown.clone())
                .serve_with_shutdown(async move { mcp_shutdown.cancelled().await })
                .await
        }
    };

    // The transport ending (stdin closed, server error) stops the gateway too.
    shutdown.cancel();
    gateway_task
        .await
        .context("Gateway task panicked")?
        .context("Gateway server failed")?;
    transport_result.context("MCP transport failed")?;

    info!("stopped");
    Ok(())
}
