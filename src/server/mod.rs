pub mod handler;

use crate::adapters::{DatasetSearchAdapter, ExplanationAdapter};
use crate::ports::{DatasetSearchPort, ExplanationPort};
use crate::{Config, Error, Result};
use axum::Router;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub use handler::{build_router, AppState};

pub struct Server {
    config: Arc<Config>,
    state: AppState,
    cancellation_token: CancellationToken,
}

impl Server {
    /// Create a server backed by the HTTP adapters described by `config`
    pub fn new(config: Config) -> Result<Self> {
        let dataset_search = DatasetSearchAdapter::new(config.dataset_search.clone())?;
        let explanation = ExplanationAdapter::new(config.explanation.clone())?;

        Ok(Self::with_ports(
            config,
            Arc::new(dataset_search),
            Arc::new(explanation),
        ))
    }

    /// Create a server with explicit port implementations
    #[must_use]
    pub fn with_ports(
        config: Config,
        dataset_search: Arc<dyn DatasetSearchPort>,
        explanation: Arc<dyn ExplanationPort>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            state: AppState::new(dataset_search, explanation),
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Router serving the request shell routes
    #[must_use]
    pub fn router(&self) -> Router {
        build_router(self.state.clone(), &self.config.server)
    }

    /// Bind the configured address and serve until shutdown
    pub async fn run(&self) -> Result<()> {
        let addr = (self.config.server.host.as_str(), self.config.server.port);
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            Error::Service(format!(
                "Failed to bind {}:{}: {e}",
                self.config.server.host, self.config.server.port
            ))
        })?;

        self.spawn_signal_listener();
        self.run_with_listener(listener).await
    }

    /// Serve on an already bound listener until shutdown is requested
    pub async fn run_with_listener(&self, listener: TcpListener) -> Result<()> {
        info!("HTTP server listening on {}", listener.local_addr()?);

        let token = self.cancellation_token.clone();
        let server = axum::serve(listener, self.router())
            .with_graceful_shutdown(async move { token.cancelled().await })
            .into_future();

        let drain_timeout = Duration::from_secs(self.config.server.graceful_shutdown_timeout_secs);
        let drain_deadline = async {
            self.cancellation_token.cancelled().await;
            info!("Shutdown signal received, draining connections");
            tokio::time::sleep(drain_timeout).await;
        };

        tokio::select! {
            result = server => result?,
            () = drain_deadline => {
                warn!("Graceful shutdown timeout exceeded, forcing shutdown");
            }
        }

        info!("HTTP server shutdown complete");
        Ok(())
    }

    fn spawn_signal_listener(&self) {
        let shutdown_token = self.cancellation_token.clone();
        tokio::spawn(async move {
            #[cfg(unix)]
            let terminate = async {
                match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                    Ok(mut sigterm) => {
                        sigterm.recv().await;
                    }
                    Err(e) => {
                        warn!("Failed to setup SIGTERM handler: {}", e);
                        std::future::pending::<()>().await;
                    }
                }
            };
            #[cfg(not(unix))]
            let terminate = std::future::pending::<()>();

            tokio::select! {
                result = signal::ctrl_c() => {
                    if let Err(e) = result {
                        warn!("Failed to listen for SIGINT: {}", e);
                        return;
                    }
                    info!("Received SIGINT, initiating graceful shutdown");
                }
                () = terminate => {
                    info!("Received SIGTERM, initiating graceful shutdown");
                }
                () = shutdown_token.cancelled() => return,
            }

            shutdown_token.cancel();
        });
    }

    pub async fn shutdown(&self) {
        warn!("Initiating server shutdown");
        self.cancellation_token.cancel();

        // Give a moment for cleanup to begin
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    /// Check if the server has been requested to shutdown
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }

    /// Get the server configuration
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}
