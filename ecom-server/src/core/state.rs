//! Server state
//!
//! One [`ServerState`] is built at startup and cloned into every handler.
//! All fields are cheap to clone (pools, Arcs, channels).

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::user;
use crate::events::publisher::EventPublisher;
use crate::utils::AppResult;
use shared::models::UserCreate;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub jwt_service: Arc<JwtService>,
    pub publisher: EventPublisher,
    /// Outbound HTTP client for webhook deliveries; connection pool shared
    /// across requests.
    pub http: reqwest::Client,
    /// Cancelled on shutdown; background work checks it.
    pub shutdown: CancellationToken,
}

impl ServerState {
    /// Initialize from configuration: open the database, run migrations,
    /// ensure the root account exists.
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db = DbService::new(&config.db_path).await?;
        let state = Self::with_db(config.clone(), db);
        state.ensure_root_user().await?;
        Ok(state)
    }

    fn with_db(config: Config, db: DbService) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let publisher = EventPublisher::new(config.pubsub.clone());
        Self {
            config,
            db,
            jwt_service,
            publisher,
            http: reqwest::Client::new(),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    /// The root account row; credentials live in the identity service, the
    /// row only anchors ownership.
    async fn ensure_root_user(&self) -> AppResult<()> {
        if user::find_by_email(self.pool(), &self.config.root_email)
            .await?
            .is_none()
        {
            user::create(
                self.pool(),
                UserCreate {
                    email: self.config.root_email.clone(),
                    name: "root".into(),
                },
            )
            .await?;
            tracing::info!(email = %self.config.root_email, "root user created");
        }
        Ok(())
    }

    /// In-memory state for router-level tests.
    #[cfg(test)]
    pub async fn for_tests() -> Self {
        let db = DbService::new_in_memory()
            .await
            .expect("in-memory database");
        let config = Config::with_overrides(":memory:", 0);
        let state = Self::with_db(config, db);
        state.ensure_root_user().await.expect("root user");
        state
    }
}
