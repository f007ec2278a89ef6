//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Serve over plain TCP or rustls
//! - Drain on shutdown

use axum::{routing::get, Router};
use axum_server::tls_rustls::RustlsConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{FaucetConfig, TlsConfig};
use crate::faucet::Coordinator;
use crate::http::handlers;
use crate::http::request::MakeRequestUuidV4;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<Coordinator>,
    pub trust_forwarded_for: bool,
}

/// HTTP front end of the faucet.
pub struct FaucetServer {
    router: Router,
    config: FaucetConfig,
}

impl FaucetServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: FaucetConfig, coordinator: Arc<Coordinator>) -> Self {
        let state = AppState {
            coordinator,
            trust_forwarded_for: config.http.trust_forwarded_for,
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &FaucetConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(handlers::home).post(handlers::claim))
            .route("/balance", get(handlers::balance))
            .route("/addresses", get(handlers::addresses))
            .route("/ops/status", get(handlers::operations))
            .route("/ops/status/{id}", get(handlers::operation))
            .route("/health", get(handlers::health))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.http.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// Run the server on a bound listener until shutdown.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server with TLS on the configured bind address until shutdown.
    pub async fn run_tls(
        self,
        tls: &TlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self
            .config
            .listener
            .bind_address
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        let rustls = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path).await?;

        let handle = axum_server::Handle::new();
        let drain = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            drain.graceful_shutdown(Some(Duration::from_secs(10)));
        });

        tracing::info!(address = %addr, cert = %tls.cert_path, "HTTPS server starting");
        axum_server::bind_rustls(addr, rustls)
            .handle(handle)
            .serve(self.router.into_make_service_with_connect_info::<SocketAddr>())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &FaucetConfig {
        &self.config
    }
}
