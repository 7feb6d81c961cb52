//! Ecom Server - commerce back office API
//!
//! # Architecture overview
//!
//! A single HTTP service exposing the storefront-facing and back-office
//! JSON API:
//!
//! - **Catalog** (`catalog`): nested-set category tree, product lookups
//! - **Pricing** (`pricing`): price lists, promo rules, cart totals
//! - **Carts** (`carts`): guest and customer carts, coupon application
//! - **Checkout** (`checkout`): order placement, hosted checkout sessions
//! - **Events** (`events`): topic publisher, fan-out, webhook dispatch
//! - **Auth** (`auth`): JWT identity, per-operation access control
//!
//! # Module structure
//!
//! ```text
//! ecom-server/src/
//! ├── core/          # configuration, state, server loop
//! ├── auth/          # JWT validation, permissions
//! ├── api/           # HTTP routes and handlers
//! ├── catalog/       # category tree, associations
//! ├── carts/         # cart operations
//! ├── pricing/       # totals, discounts, tax
//! ├── checkout/      # orders, payment bridge
//! ├── events/        # pub/sub pipeline, webhooks
//! ├── db/            # pool, migrations, repositories
//! └── utils/         # errors, extractors, logging
//! ```

pub mod api;
pub mod auth;
pub mod carts;
pub mod catalog;
pub mod checkout;
pub mod core;
pub mod db;
pub mod events;
pub mod pricing;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService, Role};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env`, then bring up logging from the resulting environment.
pub fn setup_environment() -> Config {
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    config
}

pub fn print_banner() {
    println!(
        r#"
    ____
   / __/________  ____ ___
  / _// ___/ __ \/ __ `__ \
 / /_/ /__/ /_/ / / / / / /
/___/\___/\____/_/ /_/ /_/
    "#
    );
}
