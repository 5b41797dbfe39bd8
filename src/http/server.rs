//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Wrap an application Router with the envelope filter
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener and drain on shutdown

use std::time::Duration;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::middleware::{envelope_middleware, EnvelopeFilter};
use crate::http::request::{UuidRequestId, X_REQUEST_ID};

/// HTTP server hosting an application behind the envelope filter.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server serving `app` with the given configuration.
    pub fn new(config: AppConfig, app: Router) -> Self {
        let router = Self::build_router(&config, app);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layer order, outermost first: request ID, trace, ID propagation,
    /// envelope filter, timeout, application.
    #[allow(deprecated)]
    pub fn build_router(config: &AppConfig, app: Router) -> Router {
        let filter = EnvelopeFilter::new(config.envelope.clone());

        app.layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::from_fn_with_state(filter, envelope_middleware))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
    }

    /// Run the server, accepting connections on the given listener until
    /// the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            debug_mode = self.config.envelope.debug_mode,
            "HTTP server starting"
        );

        if self.config.envelope.debug_mode {
            tracing::warn!("Debug mode enabled: error responses include exception detail");
        }

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Consume the server and return its router (used by in-process tests).
    pub fn into_router(self) -> Router {
        self.router
    }
}
