//! Route guide server

use crate::common::{Result, ServerConfig};
use crate::guide::grpc::RouteGuideService;
use crate::guide::relay::ChatRelay;
use crate::guide::store::FeatureStore;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;

pub struct GuideServer {
    config: ServerConfig,
    store: Arc<FeatureStore>,
    relay: Arc<ChatRelay>,
}

impl GuideServer {
    pub fn new(config: ServerConfig, store: FeatureStore) -> Self {
        Self {
            config,
            store: Arc::new(store),
            relay: Arc::new(ChatRelay::new()),
        }
    }

    /// Load the feature database named by the config (or the embedded one).
    pub fn open(config: ServerConfig) -> Result<Self> {
        config.validate()?;
        let store = FeatureStore::open(config.db_path.as_deref())?;
        Ok(Self::new(config, store))
    }

    pub fn service(&self) -> RouteGuideService {
        RouteGuideService::new(self.store.clone(), self.relay.clone())
            .with_stream_buffer(self.config.stream_buffer)
    }

    /// Serve on the configured address until Ctrl-C.
    pub async fn serve(self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve_with_listener(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `signal` resolves.
    pub async fn serve_with_listener<F>(self, listener: TcpListener, signal: F) -> Result<()>
    where
        F: Future<Output = ()> + Send,
    {
        tracing::info!("Starting route guide server");
        tracing::info!("  gRPC API: {}", listener.local_addr()?);
        tracing::info!("  Features: {}", self.store.len());
        tracing::info!("  Stream buffer: {}", self.config.stream_buffer);

        let grpc_server = tonic::transport::Server::builder()
            .add_service(self.service().into_server())
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), signal);

        tracing::info!("✓ Route guide ready");

        if let Err(e) = grpc_server.await {
            tracing::error!("gRPC server error: {}", e);
            return Err(e.into());
        }

        tracing::info!("Route guide stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
