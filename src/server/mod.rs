// Oakbot - HTTP server module
// JSON chat API with per-session conversation memory

mod handlers;
mod session;

pub use handlers::{
    create_router, health_check, AppError, ChatRequest, ChatResponse, ErrorResponse,
    HealthStatus, SessionInfo, SESSION_HEADER,
};
pub use session::{is_valid_session_id, SessionManager, SessionState, SharedSession};

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::router::MessageRouter;

/// Shared application state
pub struct ChatServer {
    /// Keyword rules plus the completion delegate
    message_router: MessageRouter,
    session_manager: SessionManager,
    started_at: Instant,
}

impl ChatServer {
    pub fn new(message_router: MessageRouter, session_manager: SessionManager) -> Self {
        Self {
            message_router,
            session_manager,
            started_at: Instant::now(),
        }
    }

    pub fn message_router(&self) -> &MessageRouter {
        &self.message_router
    }

    pub fn session_manager(&self) -> &SessionManager {
        &self.session_manager
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Full application with CORS (any origin) and request tracing
    pub fn into_app(self: Arc<Self>) -> axum::Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers([axum::http::HeaderName::from_static(SESSION_HEADER)]);

        create_router(self)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Start the HTTP server and run until Ctrl-C
    pub async fn serve(self, config: &Config) -> Result<()> {
        let addr: SocketAddr = config.server.bind_address()?;

        let server = Arc::new(self);
        let cleanup = server.session_manager().start_cleanup_task();
        let app = Arc::clone(&server).into_app();

        tracing::info!("Starting Oakbot server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server error")?;

        cleanup.abort();
        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
