#![deny(unsafe_code)]

//! # Folio API
//!
//! HTTP layer for the portfolio backend: routing, session middleware, the
//! response envelope, and the handlers over `folio-core`.

use std::{net::SocketAddr, sync::Arc};

use bon::Builder;
use folio_config::Config;
use folio_core::{
    EmailService, FileStore, GoogleOAuth, Mailer, MockEmailSender, RepositoryContext, TokenIssuer,
};
use folio_storage::Backend;
use folio_types::{Error, error::Result};

pub mod envelope;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod resource;
pub mod routes;

pub use envelope::{ApiError, ApiResult};
pub use routes::build_router;

/// Shared application state
#[derive(Clone, Builder)]
pub struct AppState {
    /// Storage backend shared by every repository
    pub storage: Arc<Backend>,
    /// Server configuration
    pub config: Arc<Config>,
    /// Access token signer and verifier
    pub issuer: Arc<TokenIssuer>,
    /// Handle to the background email task
    pub mailer: Mailer,
    /// Google OAuth client, when configured
    pub oauth: Option<Arc<GoogleOAuth>>,
    /// Store for uploaded files
    pub files: Arc<FileStore>,
}

impl AppState {
    /// Repositories over this state's storage backend
    pub fn repos(&self) -> RepositoryContext<Backend> {
        RepositoryContext::new((*self.storage).clone())
    }

    /// State wired for integration tests: the given backend, a fixed
    /// signing secret, a mock mailer, no OAuth, and uploads under the
    /// system temp directory
    pub async fn new_test(storage: Arc<Backend>) -> Result<Self> {
        let config = Config::builder()
            .storage(folio_config::StorageBackend::Memory)
            .jwt_secret("test-secret")
            .dev_mode(true)
            .build();

        let upload_dir =
            std::env::temp_dir().join(format!("folio-test-uploads-{}", std::process::id()));
        let files = FileStore::new(upload_dir).await?;

        let mailer = Mailer::spawn(Arc::new(EmailService::new(Box::new(MockEmailSender::new()))));

        Ok(Self::builder()
            .storage(storage)
            .config(Arc::new(config))
            .issuer(Arc::new(TokenIssuer::new("test-secret", 15)))
            .mailer(mailer)
            .files(Arc::new(files))
            .build())
    }
}

/// Bind the configured address and serve until shutdown
pub async fn serve(state: AppState) -> Result<()> {
    let addr = state.config.listen;
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::internal(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::internal(format!("Server error: {e}")))
}

/// Resolve when the process receives SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
