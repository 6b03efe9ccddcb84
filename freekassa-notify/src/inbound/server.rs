//! HTTP Server configuration and startup.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use super::handlers::{self, AppState};
use crate::NotificationHandler;

/// HTTP server for the Freekassa notification URL.
pub struct NotificationServer<H: NotificationHandler> {
    state: AppState<H>,
}

impl<H: NotificationHandler> NotificationServer<H> {
    /// Creates a server that verifies notifications with `secret2` and hands
    /// accepted ones to `handler`.
    ///
    /// Source IPs are checked against the provider allow-list by default.
    pub fn new(secret2: impl Into<String>, handler: H) -> Self {
        Self {
            state: AppState {
                secret2: secret2.into(),
                check_ip: true,
                trust_proxy: false,
                handler,
            },
        }
    }

    /// Enables or disables the source IP allow-list check.
    pub fn with_ip_check(mut self, enabled: bool) -> Self {
        self.state.check_ip = enabled;
        self
    }

    /// Takes the source IP from `X-Real-IP` when running behind a proxy.
    pub fn with_trusted_proxy(mut self, trusted: bool) -> Self {
        self.state.trust_proxy = trusted;
        self
    }

    /// Builds the Axum router with all routes.
    ///
    /// The notification route needs `ConnectInfo<SocketAddr>`; serve it with
    /// `into_make_service_with_connect_info`.
    pub fn router(self) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route("/notification", post(handlers::notification::<H>))
            .layer(TraceLayer::new_for_http())
            .with_state(Arc::new(self.state))
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Notification server listening on {}", listener.local_addr()?);

        axum::serve(
            listener,
            self.router()
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
