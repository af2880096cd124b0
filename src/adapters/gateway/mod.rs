//! Presentation gateway: the operator-facing HTTP surface.
//!
//! Every API route is served both at the root and under `/api`.

pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::domain::models::GatewayConfig;
use crate::services::InteractionCoordinator;

pub use handlers::{ErrorResponse, GatewayState};

/// Operator gateway server.
pub struct GatewayServer {
    config: GatewayConfig,
    coordinator: Arc<InteractionCoordinator>,
}

impl GatewayServer {
    pub fn new(coordinator: Arc<InteractionCoordinator>, config: GatewayConfig) -> Self {
        Self {
            config,
            coordinator,
        }
    }

    /// Build the router.
    pub fn build_router(self) -> Router {
        let state = Arc::new(GatewayState {
            coordinator: self.coordinator,
        });

        let api = Router::new()
            // Tasks
            .route("/tasks", post(handlers::add_manual_task))
            .route("/tasks/list", get(handlers::list_pending_tasks))
            .route("/tasks/status", get(handlers::task_status))
            .route("/tasks/delete", post(handlers::delete_task))
            .route("/tasks/clear", post(handlers::clear_tasks))
            // Announcements
            .route("/render-tasks", get(handlers::render_tasks))
            .route("/render-tasks/select", post(handlers::select_render_task))
            .route("/render-tasks/abandon", post(handlers::abandon_render_task))
            .route("/render-tasks/wait", get(handlers::wait_render_task))
            // Observability
            .route("/responses", get(handlers::response_history))
            .route("/stats", get(handlers::stats))
            // Continuation template
            .route("/format", get(handlers::get_format).post(handlers::set_format))
            .route("/format/get", get(handlers::get_format))
            .route("/format/set", post(handlers::set_format));

        let app = Router::new()
            .route("/", get(handlers::index))
            .route("/health", get(handlers::health_check))
            .merge(api.clone())
            .nest("/api", api)
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

        tracing::info!("operator gateway listening on http://{}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}
