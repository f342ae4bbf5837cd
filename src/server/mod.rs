//! HTTP front end for the pattern resolver.
//!
//! ## Endpoints
//!
//! - `POST /generate-emotion-pattern`: resolve emotion text into a pattern
//! - `GET /health`: report whether the model backend is configured
//! - `GET /`: API documentation

pub mod models;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::{PatternError, Result};
use crate::resolver::PatternResolver;

/// Shared state for axum handlers.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Immutable resolver shared by every request.
    pub resolver: PatternResolver,
}

impl AppState {
    /// Wraps a resolver for sharing across handlers.
    pub fn new(resolver: PatternResolver) -> Arc<Self> {
        Arc::new(Self { resolver })
    }
}

/// Build the router with permissive CORS.
pub fn build_app(state: Arc<AppState>) -> Router {
    build_router(state, true)
}

/// Build the router, optionally answering cross-origin requests.
pub fn build_router(state: Arc<AppState>, cors: bool) -> Router {
    let app = Router::new()
        .route("/", get(routes::docs))
        .route("/health", get(routes::health))
        .route("/generate-emotion-pattern", post(routes::generate_pattern))
        .with_state(state);
    if cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Running HTTP server.
///
/// Serves in a background tokio task; the task is aborted on drop.
pub struct PatternServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl PatternServer {
    /// Start the server.
    ///
    /// Binds to `{config.host}:{config.port}` (use port `0` for auto-assign).
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP listener cannot bind.
    pub async fn start(resolver: PatternResolver, config: &ServerConfig) -> Result<Self> {
        let app = build_router(AppState::new(resolver), config.cors);

        let bind_addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&bind_addr).await?;
        let addr = listener.local_addr()?;

        info!("emotion pattern server listening on http://{addr}");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("server error: {e}");
            }
        });

        Ok(Self { addr, handle })
    }

    /// Returns the address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Waits until the server task ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the server task panicked.
    pub async fn wait(&mut self) -> Result<()> {
        match (&mut self.handle).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_cancelled() => Ok(()),
            Err(e) => Err(PatternError::Io(std::io::Error::other(e))),
        }
    }

    /// Abort the server task.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for PatternServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
