//! Server instance management

use std::net::SocketAddr;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ServiceConfig;
use crate::dataset;
use crate::error::ApiError;
use crate::handlers::{create_router, AppState};
use lerecette::Catalog;

/// LeMenu HTTP server
///
/// Owns the catalog for its whole lifetime; requests only borrow it.
pub struct LeMenuServer {
    /// Server configuration
    config: ServiceConfig,

    /// Shared recipe catalog
    catalog: Catalog,
}

impl LeMenuServer {
    /// Create new server instance, loading the catalog named by `config`
    ///
    /// # Returns
    ///
    /// `Result<LeMenuServer, ApiError>` - Server or error
    pub fn new(config: ServiceConfig) -> Result<Self, ApiError> {
        if let Err(e) = config.validate() {
            return Err(ApiError::internal(format!("Invalid config: {}", e)));
        }

        let catalog = if config.use_sample {
            info!("Using built-in sample catalog");
            dataset::sample_catalog()
        } else {
            dataset::load_from_dir(&config.data_dir).map_err(|e| {
                error!("Failed to load catalog: {}", e);
                ApiError::internal(format!("Failed to load catalog: {}", e))
            })?
        };

        Ok(Self::with_catalog(config, catalog))
    }

    /// Create a server around an already loaded catalog
    pub fn with_catalog(config: ServiceConfig, catalog: Catalog) -> Self {
        Self { config, catalog }
    }

    /// Get socket address for binding
    pub fn socket_addr(&self) -> Result<SocketAddr, ApiError> {
        self.config.socket_addr().map_err(ApiError::internal)
    }

    /// Build the router with state and tracing attached
    pub fn router(&self) -> axum::Router {
        let state = AppState::new(self.catalog.clone(), self.config.clone());
        create_router()
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Start server and run until Ctrl+C or SIGTERM
    pub async fn start(&self) -> Result<(), ApiError> {
        let addr = self.socket_addr()?;
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            error!("Failed to bind to {}: {:?}", addr, e);
            ApiError::internal(format!("Failed to bind to {}: {}", addr, e))
        })?;

        info!(
            "Server listening on: {} ({} recipes)",
            self.server_url(),
            self.catalog.len()
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(wait_for_shutdown())
            .await
            .map_err(|e| ApiError::internal(format!("Server error: {}", e)))?;

        info!("Server stopped");
        Ok(())
    }

    /// Shared catalog
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Get server URL
    #[must_use]
    pub fn server_url(&self) -> String {
        self.config.server_url()
    }
}

/// Wait for Ctrl+C or SIGTERM
async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received shutdown signal");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix;
        match unix::signal(unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received TERM signal");
            }
            Err(e) => {
                error!("Failed to install TERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
