//! Process lifecycle: load models, serve HTTP, release models.

use crate::{
    ChorusConfig, GenerationMetrics, GenerationService, Orchestrator, WorkerPool, create_router,
};
use chorus_error::{ServiceErrorKind, ServiceResult};
use chorus_models::{HuggingFaceLoader, ModelRegistry};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, instrument};

/// The text generation server.
#[derive(Debug, Clone)]
pub struct ChorusServer {
    config: ChorusConfig,
}

impl ChorusServer {
    /// Creates a server from configuration.
    pub fn new(config: ChorusConfig) -> Self {
        Self { config }
    }

    /// Load every configured model through the Hugging Face backend.
    ///
    /// Runs on a blocking thread; the loader's HTTP client must not live on
    /// the async executor.
    ///
    /// # Errors
    ///
    /// Returns an error if any model fails to load.
    #[instrument(skip(self))]
    pub async fn load_registry(&self) -> ServiceResult<Arc<ModelRegistry>> {
        let settings = self.config.huggingface.clone();
        let registry_config = self.config.registry.clone();
        let registry = tokio::task::spawn_blocking(move || {
            let loader = HuggingFaceLoader::new(settings)?;
            ModelRegistry::load(&registry_config, &loader)
        })
        .await
        .map_err(|e| ServiceErrorKind::Task(e.to_string()))??;
        Ok(Arc::new(registry))
    }

    /// Build the service stack over an already-loaded registry.
    pub fn service(&self, registry: Arc<ModelRegistry>) -> GenerationService {
        let metrics = GenerationMetrics::default();
        let orchestrator = Orchestrator::new(registry, self.config.generation.clone())
            .with_metrics(metrics.clone());
        let pool = WorkerPool::new(
            self.config.server.max_concurrent,
            self.config.server.queue_depth,
            self.config.server.request_timeout(),
        );
        GenerationService::new(orchestrator, pool).with_metrics(metrics)
    }

    /// Load models, bind the configured address, and serve until `shutdown`
    /// resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if models fail to load, the address cannot be bound,
    /// or the server stops abnormally.
    pub async fn run<S>(self, shutdown: S) -> ServiceResult<()>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let registry = self.load_registry().await?;
        let address = self.config.server.bind_address();
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|e| ServiceErrorKind::Io(format!("failed to bind {}: {}", address, e)))?;
        self.serve(listener, registry, shutdown).await
    }

    /// Serve on `listener` over `registry` until `shutdown` resolves, then
    /// unload the registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the server stops abnormally.
    pub async fn serve<S>(
        self,
        listener: TcpListener,
        registry: Arc<ModelRegistry>,
        shutdown: S,
    ) -> ServiceResult<()>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let service = Arc::new(self.service(Arc::clone(&registry)));
        let router = create_router(service);

        let local = listener
            .local_addr()
            .map_err(|e| ServiceErrorKind::Io(e.to_string()))?;
        info!(address = %local, models = ?registry.identifiers(), "Chorus server listening");

        let served = axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServiceErrorKind::Io(e.to_string()));

        info!("Releasing models");
        tokio::task::spawn_blocking(move || registry.unload())
            .await
            .map_err(|e| ServiceErrorKind::Task(e.to_string()))?;
        served?;

        info!("Server shutdown complete");
        Ok(())
    }
}

/// Resolve on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
