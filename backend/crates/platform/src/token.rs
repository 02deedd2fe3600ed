//! Auth Tokens
//!
//! Stateless HS256 JWTs carrying the subject (user id) and role. The signing
//! secret is fixed for the lifetime of the process; tokens are never stored
//! and cannot be revoked before they expire.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default token lifetime
pub const DEFAULT_TOKEN_TTL: Duration = Duration::hours(24);

#[derive(Debug, Error)]
pub enum TokenError {
    /// Signing secret is empty
    #[error("Token secret must not be empty")]
    EmptySecret,

    /// Signing failed
    #[error("Failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// Bad signature, malformed structure, or expired
    #[error("Invalid or expired token")]
    InvalidToken,
}

/// Wire format of the token payload
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(rename = "userId")]
    user_id: String,
    role: String,
    iat: i64,
    exp: i64,
}

/// Verified token contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject: String,
    pub role: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies auth tokens with one process-wide secret.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        })
    }

    /// Issue a token valid from now for the configured TTL.
    pub fn issue(&self, subject: &str, role: &str) -> Result<String, TokenError> {
        self.issue_at(subject, role, Utc::now())
    }

    /// Issue a token as if signed at `issued_at`.
    pub fn issue_at(
        &self,
        subject: &str,
        role: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            user_id: subject.to_string(),
            role: role.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(TokenError::Signing)
    }

    /// Check signature, structure and expiry.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| TokenError::InvalidToken)?;

        let expires_at =
            DateTime::from_timestamp(data.claims.exp, 0).ok_or(TokenError::InvalidToken)?;

        Ok(TokenClaims {
            subject: data.claims.user_id,
            role: data.claims.role,
            expires_at,
        })
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(b"test-secret", DEFAULT_TOKEN_TTL).unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let tokens = service();
        let token = tokens.issue("doctor-001-Ab3dE6gH", "doctor").unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.subject, "doctor-001-Ab3dE6gH");
        assert_eq!(claims.role, "doctor");
        assert!(claims.expires_at > Utc::now() + Duration::hours(23));
    }

    #[test]
    fn test_payload_uses_user_id_claim_name() {
        let tokens = service();
        let token = tokens.issue("admin-001-aaaaaaaa", "admin").unwrap();

        let decoded = jsonwebtoken::decode::<serde_json::Value>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap();
        assert_eq!(decoded.claims["userId"], "admin-001-aaaaaaaa");
        assert_eq!(decoded.claims["role"], "admin");
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let tokens = service();
        let token = tokens
            .issue_at("staff-001-aaaaaaaa", "staff", Utc::now() - Duration::hours(25))
            .unwrap();

        assert!(matches!(tokens.verify(&token), Err(TokenError::InvalidToken)));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = service().issue("staff-001-aaaaaaaa", "staff").unwrap();
        let other = TokenService::new(b"other-secret", DEFAULT_TOKEN_TTL).unwrap();

        assert!(matches!(other.verify(&token), Err(TokenError::InvalidToken)));
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let tokens = service();
        let token = tokens.issue("staff-001-aaaaaaaa", "staff").unwrap();
        let forged = tokens.issue("admin-001-aaaaaaaa", "admin").unwrap();

        // Staff signature on an admin payload
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_payload = forged.split('.').nth(1).unwrap();
        parts[1] = forged_payload;
        let spliced = parts.join(".");

        assert!(matches!(tokens.verify(&spliced), Err(TokenError::InvalidToken)));
        assert!(matches!(tokens.verify("not-a-jwt"), Err(TokenError::InvalidToken)));
    }

    #[test]
    fn test_empty_secret_is_refused() {
        assert!(matches!(
            TokenService::new(b"", DEFAULT_TOKEN_TTL),
            Err(TokenError::EmptySecret)
        ));
    }
}
