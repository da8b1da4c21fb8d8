//! Reset token issuing and verification.
//!
//! Reset tokens are stateless JWTs signed with the server secret
//! concatenated with the user's *current* password hash. Changing the
//! password changes the signing key, so every token issued before the
//! change stops verifying. That gives one-time-use semantics without
//! storing tokens server-side.
//!
//! The signing key must be recomputed from the stored hash on every
//! verification. Caching it would break the invalidation property.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reset links go stale after this many minutes.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 10;

/// Single undistinguished failure for signature, expiry, and tamper
/// errors, so the response doesn't reveal which check failed.
#[derive(Debug, Error)]
#[error("invalid or expired reset token")]
pub struct InvalidToken;

#[derive(Debug, Serialize, Deserialize)]
pub struct ResetClaims {
    /// User id the token was issued for
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

fn signing_key(secret: &str, password_hash: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(secret.len() + password_hash.len());
    key.extend_from_slice(secret.as_bytes());
    key.extend_from_slice(password_hash.as_bytes());
    key
}

/// Issue a reset token for a user, keyed to their current password hash.
pub fn issue(
    secret: &str,
    user_id: &str,
    email: &str,
    password_hash: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = ResetClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(RESET_TOKEN_TTL_MINUTES)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(&signing_key(secret, password_hash)),
    )
}

/// Verify a reset token against the user's current password hash.
pub fn verify(secret: &str, password_hash: &str, token: &str) -> Result<ResetClaims, InvalidToken> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<ResetClaims>(
        token,
        &DecodingKey::from_secret(&signing_key(secret, password_hash)),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "server-secret";
    const HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA";

    #[test]
    fn test_issue_and_verify_round_trip() {
        let token = issue(SECRET, "user-1", "alice@example.com", HASH).unwrap();
        let claims = verify(SECRET, HASH, &token).unwrap();

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.exp - claims.iat, RESET_TOKEN_TTL_MINUTES * 60);
    }

    #[test]
    fn test_password_change_invalidates_token() {
        let token = issue(SECRET, "user-1", "alice@example.com", HASH).unwrap();
        assert!(verify(SECRET, HASH, &token).is_ok());

        // Same secret, new hash: the signing key no longer matches
        let new_hash = "$argon2id$v=19$m=19456,t=2,p=1$bmV3c2FsdA$bmV3aGFzaA";
        assert!(verify(SECRET, new_hash, &token).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue(SECRET, "user-1", "alice@example.com", HASH).unwrap();
        assert!(verify("other-secret", HASH, &token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now();
        let claims = ResetClaims {
            sub: "user-1".to_string(),
            email: "alice@example.com".to_string(),
            iat: (now - Duration::minutes(20)).timestamp(),
            exp: (now - Duration::minutes(10)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(&signing_key(SECRET, HASH)),
        )
        .unwrap();

        assert!(verify(SECRET, HASH, &token).is_err());
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let token = issue(SECRET, "user-1", "alice@example.com", HASH).unwrap();

        // Splice the payload of a token for a different user onto the
        // original signature
        let forged = issue(SECRET, "user-2", "alice@example.com", HASH).unwrap();
        let original: Vec<&str> = token.split('.').collect();
        let other: Vec<&str> = forged.split('.').collect();
        let tampered = format!("{}.{}.{}", original[0], other[1], original[2]);

        assert!(verify(SECRET, HASH, &tampered).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(verify(SECRET, HASH, "not-a-token").is_err());
        assert!(verify(SECRET, HASH, "").is_err());
    }
}
