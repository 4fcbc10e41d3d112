use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;

pub mod password;

pub use password::PasswordHasher;

/// Payload of a signed session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(username: impl Into<String>, is_admin: bool, security: &SecurityConfig) -> Self {
        let now = Utc::now();
        // oversized lifetimes saturate at the latest representable instant
        let lifetime = i64::try_from(security.jwt_expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .unwrap_or(Duration::MAX);
        let exp = now
            .checked_add_signed(lifetime)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
            .timestamp();

        Self {
            username: username.into(),
            is_admin,
            iat: now.timestamp(),
            exp,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,
}

/// Sign a token for `username` with the configured secret and lifetime.
pub fn create_token(username: &str, is_admin: bool, security: &SecurityConfig) -> Result<String, JwtError> {
    encode_claims(&Claims::new(username, is_admin, security), &security.secret_key)
}

pub fn encode_claims(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Verify signature and expiry, returning the claims.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn round_trips_claims() {
        let security = AppConfig::test().security;
        let token = create_token("u1", true, &security).unwrap();
        let claims = decode_token(&token, &security.secret_key).unwrap();

        assert_eq!(claims.username, "u1");
        assert!(claims.is_admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn huge_expiry_saturates_instead_of_panicking() {
        let mut security = AppConfig::test().security;
        for hours in [u64::MAX, u64::MAX / 2, i64::MAX as u64 / 3600] {
            security.jwt_expiry_hours = hours;
            let claims = Claims::new("u1", false, &security);
            assert!(claims.exp > claims.iat);
            assert!(claims.exp <= DateTime::<Utc>::MAX_UTC.timestamp());
        }

        let token = create_token("u1", false, &security).unwrap();
        assert_eq!(decode_token(&token, &security.secret_key).unwrap().username, "u1");
    }

    #[test]
    fn rejects_wrong_secret() {
        let security = AppConfig::test().security;
        let token = create_token("u1", false, &security).unwrap();
        assert!(matches!(decode_token(&token, "other-secret"), Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn rejects_expired_token() {
        let now = Utc::now().timestamp();
        let claims = Claims { username: "u1".into(), is_admin: false, iat: now - 7200, exp: now - 3600 };
        let token = encode_claims(&claims, "secret-dev").unwrap();
        assert!(decode_token(&token, "secret-dev").is_err());
    }

    #[test]
    fn serializes_admin_flag_in_camel_case() {
        let claims = Claims { username: "u1".into(), is_admin: true, iat: 1, exp: 2 };
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["isAdmin"], true);
    }

    #[test]
    fn empty_secret_is_refused() {
        let claims = Claims { username: "u1".into(), is_admin: false, iat: 1, exp: 2 };
        assert!(matches!(encode_claims(&claims, ""), Err(JwtError::InvalidSecret)));
    }
}
