//! Authentication and authorization
//!
//! - [`jwt`] — HS256 token verification and the [`CurrentUser`] identity
//! - [`middleware`] — identity injection and per-route authorization layers
//! - [`permissions`] — the static operation → roles table

pub mod jwt;
pub mod middleware;
pub mod permissions;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService, Role};
pub use middleware::{ensure_owner, require_auth, require_operation};
