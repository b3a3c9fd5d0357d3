//! HTTP server for the Prometheus scrape endpoint.
//!
//! Every `GET /metrics` runs a full collection pass before encoding.
//! The collector sits behind a single async mutex held for the whole
//! collect-and-encode sequence, so concurrent scrapes are served one
//! after another and each response reflects exactly one pass.

use super::collector::CredentialCollector;
use crate::directory::DirectorySource;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

/// Body returned by the liveness endpoint.
pub const LIVENESS_BODY: &str = "I'm Alive :D";

/// Errors that can occur during metrics server operations.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not be bound.
    #[error("failed to bind to address: {0}")]
    Bind(#[from] std::io::Error),

    /// The server stopped with an error.
    #[error("server error: {0}")]
    Server(String),
}

/// Collector shared between scrape requests.
pub type SharedCollector<S> = Arc<Mutex<CredentialCollector<S>>>;

/// HTTP server exposing credential expiry metrics.
pub struct ScrapeServer<S> {
    bind_addr: SocketAddr,
    collector: SharedCollector<S>,
}

impl<S: DirectorySource> ScrapeServer<S> {
    /// Creates a new scrape server.
    pub fn new(bind_addr: SocketAddr, collector: CredentialCollector<S>) -> Self {
        Self {
            bind_addr,
            collector: Arc::new(Mutex::new(collector)),
        }
    }

    /// Returns the shared collector.
    pub fn collector(&self) -> SharedCollector<S> {
        Arc::clone(&self.collector)
    }

    /// Builds the router serving `/` and `/metrics`.
    pub fn router(&self) -> Router {
        router(self.collector())
    }

    /// Serves requests until `shutdown` resolves.
    pub async fn run(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let app = self.router();
        let listener = tokio::net::TcpListener::bind(self.bind_addr).await?;

        tracing::info!(
            addr = %listener.local_addr()?,
            "Scrape server listening"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Server(e.to_string()))?;

        Ok(())
    }
}

/// Builds the scrape router around a shared collector.
pub fn router<S: DirectorySource>(collector: SharedCollector<S>) -> Router {
    Router::new()
        .route("/", get(liveness_handler))
        .route("/metrics", get(metrics_handler::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(collector)
}

/// Handler for the /metrics endpoint.
async fn metrics_handler<S: DirectorySource>(
    State(collector): State<SharedCollector<S>>,
) -> impl IntoResponse {
    let mut collector = collector.lock().await;
    collector.collect().await;

    let registry = collector.registry();
    match registry.encode() {
        Ok(output) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, registry.content_type())],
            output,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("Failed to encode metrics: {}", e),
        ),
    }
}

/// Handler for the / liveness endpoint.
async fn liveness_handler() -> impl IntoResponse {
    (StatusCode::OK, LIVENESS_BODY)
}
