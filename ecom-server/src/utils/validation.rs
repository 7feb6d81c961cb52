//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits live here.

use uuid::Uuid;

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, category, price list, tariff, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes and descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: SKU, codes, path segments
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// URLs
pub const MAX_URL_LEN: usize = 2048;

/// Address lines
pub const MAX_ADDRESS_LEN: usize = 500;

/// Coupon codes
pub const MAX_COUPON_CODE_LEN: usize = 32;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::bad_request(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::bad_request(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::bad_request(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a path-segment id: 36-char lowercase hyphenated UUIDv4.
///
/// Uppercase or non-canonical forms are rejected so that ids compare as
/// plain strings everywhere else.
pub fn validate_uuid(value: &str, field: &str) -> Result<(), AppError> {
    let parsed = Uuid::try_parse(value)
        .map_err(|_| AppError::bad_request(format!("{field} is not a valid id")))?;
    if parsed.get_version_num() != 4 || parsed.to_string() != value {
        return Err(AppError::bad_request(format!("{field} is not a valid id")));
    }
    Ok(())
}

/// Validate a coupon code: `^[A-Za-z0-9]{1,32}$`.
pub fn validate_coupon_code(value: &str) -> Result<(), AppError> {
    if value.is_empty() || value.len() > MAX_COUPON_CODE_LEN {
        return Err(AppError::bad_request(
            "coupon_code must be 1-32 characters",
        ));
    }
    if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::bad_request(
            "coupon_code may only contain letters and digits",
        ));
    }
    Ok(())
}

/// Validate a webhook endpoint: absolute https URL.
pub fn validate_https_url(value: &str) -> Result<(), AppError> {
    validate_required_text(value, "url", MAX_URL_LEN)?;
    let parsed = reqwest::Url::parse(value)
        .map_err(|_| AppError::bad_request("url must be an absolute URL"))?;
    if parsed.scheme() != "https" {
        return Err(AppError::bad_request("url must use https"));
    }
    Ok(())
}

/// Validate an ISO 3166-1 alpha-2 country code (two uppercase letters).
pub fn validate_country_code(value: &str) -> Result<(), AppError> {
    if value.len() != 2 || !value.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(AppError::bad_request(
            "country_code must be a two-letter uppercase code",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_must_be_lowercase_v4() {
        let id = Uuid::new_v4().to_string();
        assert!(validate_uuid(&id, "id").is_ok());
        assert!(validate_uuid(&id.to_uppercase(), "id").is_err());
        // v5-style (version nibble not 4)
        assert!(validate_uuid("936da01f-9abd-1d9d-80c7-02af85c822a8", "id").is_err());
        assert!(validate_uuid("not-a-uuid", "id").is_err());
    }

    #[test]
    fn coupon_code_charset() {
        assert!(validate_coupon_code("WELCOME10").is_ok());
        assert!(validate_coupon_code("").is_err());
        assert!(validate_coupon_code("has space").is_err());
        assert!(validate_coupon_code("DASH-10").is_err());
    }

    #[test]
    fn webhook_url_must_be_https() {
        assert!(validate_https_url("https://example.com/hook").is_ok());
        assert!(validate_https_url("http://example.com/hook").is_err());
        assert!(validate_https_url("/relative/path").is_err());
    }
}
