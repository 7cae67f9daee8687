//! Server runner: router construction, listener lifecycle and shutdown.

use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::{Router, routing::get};
use hiroba_shared::time::timestamp_to_iso8601;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::{error::ServerError, handler, signal::shutdown_signal, state::AppState};
use crate::{
    config::ServerConfig,
    domain::ConnectionRegistry,
    infrastructure::repository::InMemoryConnectionRegistry,
};

/// Build the HTTP router
///
/// `/` accepts WebSocket upgrades and serves the client page otherwise.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handler::root_handler))
        .route("/index.html", get(handler::index))
        .route("/client.js", get(handler::client_script))
        .route("/style.css", get(handler::stylesheet))
        .fallback(handler::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A bound, not yet running relay server
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl Server {
    /// Bind the listener and create an empty registry.
    pub async fn bind(config: &ServerConfig) -> Result<Self, ServerError> {
        let addr = config.socket_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        let registry: Arc<dyn ConnectionRegistry> = Arc::new(InMemoryConnectionRegistry::new());
        let state = Arc::new(AppState::new(registry, config.public_dir.clone()));

        Ok(Self { listener, state })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        self.listener.local_addr().map_err(ServerError::LocalAddr)
    }

    /// Serve until `shutdown` resolves, then close the listener.
    ///
    /// Upgraded WebSocket connections are not drained; they keep running on
    /// their own tasks until the runtime stops.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Server { listener, state } = self;
        let app = build_router(state.clone());

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)?;

        let remaining = state.registry.connections().await;
        tracing::info!(
            "HTTP server closed with {} connection(s) still open",
            remaining.len()
        );
        for connection in remaining {
            tracing::debug!(
                connection_id = %connection.id,
                remote_addr = %connection.remote_addr,
                connected_at = %timestamp_to_iso8601(connection.connected_at.value()),
                "Open at shutdown"
            );
        }

        Ok(())
    }

    /// Serve until Ctrl-C or SIGTERM.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_until(shutdown_signal()).await
    }
}

/// Bind and run the server with the given configuration
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let server = Server::bind(&config).await?;
    let addr = server.local_addr()?;

    tracing::info!("Server is running on http://{}", addr);
    tracing::info!("WebSocket server is ready for connections");
    tracing::info!("Serving static files from '{}'", config.public_dir.display());

    server.run().await
}
