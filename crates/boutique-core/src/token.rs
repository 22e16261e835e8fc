//! # Admin Session Tokens
//!
//! Stateless bearer credentials for the single admin user: an HS256 JSON Web
//! Token carrying the admin identity, a fixed role marker and an expiry.
//! The server keeps no session table.

use crate::error::{ShopError, ShopResult};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Role marker embedded in every issued token
pub const ADMIN_ROLE: &str = "admin";

/// Validity window of an issued token
pub const TOKEN_TTL_HOURS: i64 = 2;

/// Claims embedded in every admin token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Admin identity
    pub username: String,
    /// Always `"admin"`
    pub role: String,
    /// Issued-at (Unix timestamp, seconds)
    pub iat: i64,
    /// Expiry (Unix timestamp, seconds)
    pub exp: i64,
}

/// Issues and verifies admin tokens with a process-wide signing key
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(TOKEN_TTL_HOURS),
        }
    }

    /// Issue a token for `username`, valid from now
    pub fn issue(&self, username: &str) -> ShopResult<String> {
        self.issue_at(username, Utc::now())
    }

    /// Issue a token as if it had been issued at `issued_at`
    pub fn issue_at(&self, username: &str, issued_at: DateTime<Utc>) -> ShopResult<String> {
        let claims = AdminClaims {
            username: username.to_string(),
            role: ADMIN_ROLE.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| ShopError::Configuration(format!("Failed to sign token: {}", e)))
    }

    /// Verify signature, expiry and role. No clock-skew leeway.
    pub fn verify(&self, token: &str) -> ShopResult<AdminClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<AdminClaims>(token, &self.decoding, &validation).map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            invalid_token()
        })?;

        if data.claims.role != ADMIN_ROLE {
            return Err(invalid_token());
        }

        Ok(data.claims)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

fn invalid_token() -> ShopError {
    ShopError::Unauthorized("Invalid or expired token".to_string())
}

/// Compare two strings without short-circuiting on the first mismatch
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_then_verify() {
        let tokens = TokenService::new("test-secret");
        let token = tokens.issue("admin").unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.username, "admin");
        assert_eq!(claims.role, ADMIN_ROLE);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_HOURS * 3600);
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = TokenService::new("test-secret");
        let token = tokens
            .issue_at("admin", Utc::now() - Duration::hours(3))
            .unwrap();

        assert!(matches!(
            tokens.verify(&token),
            Err(ShopError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = TokenService::new("one").issue("admin").unwrap();
        assert!(TokenService::new("two").verify(&token).is_err());
    }

    #[test]
    fn test_malformed_token_rejected() {
        let tokens = TokenService::new("test-secret");
        assert!(tokens.verify("not.a.token").is_err());
        assert!(tokens.verify("").is_err());
    }

    #[test]
    fn test_non_admin_role_rejected() {
        let tokens = TokenService::new("test-secret");
        let claims = AdminClaims {
            username: "mallory".into(),
            role: "customer".into(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(tokens.verify(&token).is_err());
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("secret", "secret"));
        assert!(!constant_time_eq("secret", "secreT"));
        assert!(!constant_time_eq("secret", "secret1"));
    }
}
