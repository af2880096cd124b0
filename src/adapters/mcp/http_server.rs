//! MCP over HTTP.
//!
//! One JSON-RPC message per `POST /mcp` body. A dropped connection drops the
//! in-flight exchange, which withdraws its announcement.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::protocol::{parse_request, McpHandler};

/// Configuration for the MCP HTTP server.
#[derive(Debug, Clone)]
pub struct McpHttpConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
}

impl Default for McpHttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8093,
            enable_cors: true,
        }
    }
}

struct AppState {
    handler: McpHandler,
    shutdown: CancellationToken,
}

pub struct McpHttpServer {
    config: McpHttpConfig,
    handler: McpHandler,
    shutdown: CancellationToken,
}

impl McpHttpServer {
    pub fn new(handler: McpHandler, config: McpHttpConfig, shutdown: CancellationToken) -> Self {
        Self {
            config,
            handler,
            shutdown,
        }
    }

    /// Build the router.
    pub fn build_router(self) -> Router {
        let state = Arc::new(AppState {
            handler: self.handler,
            shutdown: self.shutdown,
        });

        let app = Router::new()
            .route("/mcp", post(handle_rpc))
            .route("/health", get(health_check))
            .with_state(state);

        if self.config.enable_cors {
            app.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
                .layer(TraceLayer::new_for_http())
        } else {
            app.layer(TraceLayer::new_for_http())
        }
    }

    /// Start the server with a shutdown signal.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;
        let router = self.build_router();

        tracing::info!("MCP HTTP server listening on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}

async fn health_check() -> &'static str {
    "OK"
}

async fn handle_rpc(State(state): State<Arc<AppState>>, body: String) -> Response {
    let request = match parse_request(&body) {
        Ok(request) => request,
        Err(response) => return Json(response).into_response(),
    };

    let token = state.shutdown.child_token();
    match state.handler.handle(request, &token).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
