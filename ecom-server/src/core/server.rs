//! Server startup
//!
//! Binds the listener, announces `service.started` on the events topic, and
//! serves until ctrl-c (or the state's cancellation token) fires.

use crate::api;
use crate::core::{Config, ServerState};
use crate::utils::{AppError, AppResult};
use shared::events::EVENT_SERVICE_STARTED;

pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Reuse an already-initialized state (tests, tooling).
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> AppResult<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        // Startup announcement. The push endpoint is this very server, so a
        // refused publish only means nobody is listening yet.
        let startup = serde_json::json!({
            "environment": state.config.environment,
            "version": env!("CARGO_PKG_VERSION"),
        });
        if let Err(e) = state
            .publisher
            .publish_topic_event(EVENT_SERVICE_STARTED, &startup)
            .await
        {
            tracing::warn!(error = %e, "service.started publish failed");
        }

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::internal(format!("failed to bind {addr}: {e}")))?;
        tracing::info!("ecom-server listening on {addr}");

        let shutdown = state.shutdown.clone();
        let router = api::create_router(state);
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = shutdown.cancelled() => {}
                }
                tracing::info!("shutting down");
                shutdown.cancel();
            })
            .await
            .map_err(|e| AppError::internal(format!("server error: {e}")))
    }
}
