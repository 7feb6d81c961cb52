//! JWT verification
//!
//! Tokens are issued by the external identity service; this side only
//! verifies HS256 signatures and lifts the claims into a [`CurrentUser`].
//! The user id claim is `ecom_uid`; tokens carrying the retired `cuuid`
//! claim fail validation because `ecom_uid` is required.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::constant_time;
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Shared HS256 secret (at least 32 bytes).
    pub secret: String,
    pub expiration_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = match load_jwt_secret() {
            Ok(secret) => secret,
            Err(e) => {
                #[cfg(debug_assertions)]
                {
                    tracing::warn!("JWT configuration error: {}, using a generated key", e);
                    generate_printable_secret()
                }
                #[cfg(not(debug_assertions))]
                {
                    panic!("FATAL: JWT_SECRET configuration failed: {}", e);
                }
            }
        };

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "ecom-identity".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "ecom-api".to_string()),
        }
    }
}

/// Claims carried by an access token.
///
/// `ecom_uid` and `ecom_role` are required; a token without them (including
/// legacy tokens using `cuuid`) is invalid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub ecom_uid: String,
    pub ecom_role: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    ExpiredToken,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("token generation failed: {0}")]
    GenerationFailed(String),

    #[error("configuration error: {0}")]
    ConfigError(String),
}

/// Generate a printable random secret (development fallback).
fn generate_printable_secret() -> String {
    let allowed =
        "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+";
    let rng = SystemRandom::new();
    let mut secret = String::with_capacity(64);
    for _ in 0..64 {
        let mut byte = [0u8; 1];
        if rng.fill(&mut byte).is_err() {
            return "EcomServerDevelopmentOnlyKeyReplaceMe!".to_string();
        }
        let idx = (byte[0] as usize) % allowed.len();
        secret.push(allowed.as_bytes()[idx] as char);
    }
    secret
}

fn load_jwt_secret() -> Result<String, JwtError> {
    match std::env::var("JWT_SECRET") {
        Ok(secret) => {
            if secret.len() < 32 {
                return Err(JwtError::ConfigError(
                    "JWT_SECRET must be at least 32 characters long".to_string(),
                ));
            }
            Ok(secret)
        }
        Err(_) => {
            #[cfg(debug_assertions)]
            {
                tracing::warn!("JWT_SECRET not set, generating a temporary development key");
                Ok(generate_printable_secret())
            }
            #[cfg(not(debug_assertions))]
            {
                Err(JwtError::ConfigError(
                    "JWT_SECRET environment variable must be set in production".to_string(),
                ))
            }
        }
    }
}

/// Token verification service.
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue a token. Production tokens come from the identity service; this
    /// path exists for tooling and tests.
    pub fn generate_token(&self, user_id: &str, role: Role) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            ecom_uid: user_id.to_string(),
            ecom_role: role.as_str().to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Verify and decode a token into the caller's identity.
    pub fn validate_token(&self, token: &str) -> Result<CurrentUser, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::InvalidToken(e.to_string()),
            }
        })?;

        let claims = token_data.claims;
        let role = Role::parse(&claims.ecom_role)
            .ok_or_else(|| JwtError::InvalidToken(format!("unknown role {}", claims.ecom_role)))?;
        Ok(CurrentUser {
            id: claims.ecom_uid,
            role,
        })
    }

    /// Extract the bearer token from an Authorization header value.
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// Caller role, from the `ecom_role` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Root,
    Admin,
    Customer,
    Anon,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Admin => "admin",
            Self::Customer => "customer",
            Self::Anon => "anon",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "root" => Some(Self::Root),
            "admin" => Some(Self::Admin),
            "customer" => Some(Self::Customer),
            "anon" => Some(Self::Anon),
            _ => None,
        }
    }
}

/// Caller identity, injected into request extensions by the auth middleware.
///
/// Requests without a token run as [`Role::Anon`] with an empty id; the
/// static permission table decides what anonymous callers may do.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn anonymous() -> Self {
        Self {
            id: String::new(),
            role: Role::Anon,
        }
    }

    pub fn is_root(&self) -> bool {
        self.role == Role::Root
    }

    /// Constant-time id comparison for ownership checks.
    pub fn owns(&self, owner_id: &str) -> bool {
        constant_time::verify_slices_are_equal(self.id.as_bytes(), owner_id.as_bytes()).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "0123456789abcdef0123456789abcdef".into(),
            expiration_minutes: 60,
            issuer: "ecom-identity".into(),
            audience: "ecom-api".into(),
        })
    }

    #[test]
    fn generation_and_validation_round_trip() {
        let service = test_service();
        let token = service.generate_token("user-1", Role::Customer).unwrap();
        let user = service.validate_token(&token).unwrap();
        assert_eq!(user.id, "user-1");
        assert_eq!(user.role, Role::Customer);
    }

    #[test]
    fn legacy_cuuid_claim_is_rejected() {
        let service = test_service();
        let now = Utc::now().timestamp();
        let legacy = serde_json::json!({
            "cuuid": "user-1",
            "ecom_role": "customer",
            "exp": now + 3600,
            "iat": now,
            "iss": "ecom-identity",
            "aud": "ecom-api",
        });
        let token = encode(
            &Header::default(),
            &legacy,
            &EncodingKey::from_secret(service.config.secret.as_bytes()),
        )
        .unwrap();
        assert!(matches!(
            service.validate_token(&token),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn unknown_role_is_rejected() {
        let service = test_service();
        let now = Utc::now().timestamp();
        let claims = serde_json::json!({
            "ecom_uid": "user-1",
            "ecom_role": "superuser",
            "exp": now + 3600,
            "iat": now,
            "iss": "ecom-identity",
            "aud": "ecom-api",
        });
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(service.config.secret.as_bytes()),
        )
        .unwrap();
        assert!(matches!(
            service.validate_token(&token),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn wrong_secret_is_an_invalid_signature() {
        let service = test_service();
        let token = service.generate_token("user-1", Role::Admin).unwrap();
        let other = JwtService::with_config(JwtConfig {
            secret: "another-secret-another-secret-xx".into(),
            ..service.config.clone()
        });
        assert!(matches!(
            other.validate_token(&token),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn ownership_check_matches_exact_id_only() {
        let user = CurrentUser {
            id: "abc".into(),
            role: Role::Customer,
        };
        assert!(user.owns("abc"));
        assert!(!user.owns("abd"));
        assert!(!CurrentUser::anonymous().owns("abc"));
    }
}
