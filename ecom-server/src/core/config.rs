//! Server configuration
//!
//! Every knob is an environment variable with a default, so a bare
//! `cargo run` comes up in development mode. `.env` files are honored.

use crate::auth::JwtConfig;

/// Card processor (hosted checkout) settings.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// REST API base, e.g. `https://api.stripe.com`.
    pub api_base: String,
    pub secret_key: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// Pub/sub topic settings.
///
/// Topics are addressed by their push endpoint URL; the token is the shared
/// secret the push endpoint verifies.
#[derive(Debug, Clone)]
pub struct PubSubConfig {
    pub events_push_url: String,
    pub events_token: String,
    pub broadcast_push_url: String,
    pub broadcast_token: String,
}

/// Server configuration.
///
/// | Environment variable | Default |
/// |----------------------|---------|
/// | `DB_PATH` | `ecom.db` |
/// | `HTTP_PORT` | `3000` |
/// | `ENVIRONMENT` | `development` |
/// | `LOG_LEVEL` | `info` |
/// | `LOG_DIR` | unset (stdout only) |
/// | `ROOT_EMAIL` | `root@localhost` |
/// | `PROCESSOR_API_BASE` | `https://api.stripe.com` |
/// | `PROCESSOR_SECRET_KEY` | empty |
/// | `CHECKOUT_SUCCESS_URL` / `CHECKOUT_CANCEL_URL` | localhost pages |
/// | `EVENTS_PUSH_URL` / `BROADCAST_PUSH_URL` | own push endpoints |
/// | `EVENTS_PUSH_TOKEN` / `BROADCAST_PUSH_TOKEN` | `dev-push-token` |
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// Superuser account ensured at startup.
    pub root_email: String,
    pub jwt: JwtConfig,
    pub processor: ProcessorConfig,
    pub pubsub: PubSubConfig,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

impl Config {
    pub fn from_env() -> Self {
        let http_port: u16 = std::env::var("HTTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);
        let own_base = format!("http://localhost:{http_port}");

        Self {
            db_path: env_or("DB_PATH", "ecom.db"),
            http_port,
            environment: env_or("ENVIRONMENT", "development"),
            log_level: env_or("LOG_LEVEL", "info"),
            log_dir: std::env::var("LOG_DIR").ok(),
            root_email: env_or("ROOT_EMAIL", "root@localhost"),
            jwt: JwtConfig::default(),
            processor: ProcessorConfig {
                api_base: env_or("PROCESSOR_API_BASE", "https://api.stripe.com"),
                secret_key: env_or("PROCESSOR_SECRET_KEY", ""),
                success_url: env_or(
                    "CHECKOUT_SUCCESS_URL",
                    "http://localhost:3000/checkout/success",
                ),
                cancel_url: env_or(
                    "CHECKOUT_CANCEL_URL",
                    "http://localhost:3000/checkout/cancel",
                ),
            },
            pubsub: PubSubConfig {
                events_push_url: env_or("EVENTS_PUSH_URL", &format!("{own_base}/pubsub/events")),
                events_token: env_or("EVENTS_PUSH_TOKEN", "dev-push-token"),
                broadcast_push_url: env_or(
                    "BROADCAST_PUSH_URL",
                    &format!("{own_base}/pubsub/broadcast"),
                ),
                broadcast_token: env_or("BROADCAST_PUSH_TOKEN", "dev-push-token"),
            },
        }
    }

    /// Override the varying knobs; used by tests.
    pub fn with_overrides(db_path: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.db_path = db_path.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
