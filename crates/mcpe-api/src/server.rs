use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;

use mcpe_store::StoreOpener;

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::router::{build_router, ApiState};

/// HTTP server for a directory of worlds.
pub struct ApiServer {
    config: ApiConfig,
    opener: Arc<dyn StoreOpener>,
}

impl ApiServer {
    pub fn new(config: ApiConfig, opener: Arc<dyn StoreOpener>) -> Self {
        Self { config, opener }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(ApiState::new(&self.config, Arc::clone(&self.opener)))
            .layer(TraceLayer::new_for_http())
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn serve(self) -> ApiResult<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve_on(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `signal` completes.
    pub async fn serve_on<F>(self, listener: TcpListener, signal: F) -> ApiResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        let root = self.config.worlds_root();
        info!(
            addr = %listener.local_addr()?,
            mount = %self.config.mount_prefix(),
            root = %root.display(),
            "worlds API listening"
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        info!("worlds API stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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

    info!("shutting down gracefully");
}
