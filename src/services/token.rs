//! Token issuance and verification.
//!
//! Access and refresh tokens share the same claim shape and signing key;
//! only the expiry duration differs.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::User;
use crate::errors::{AppError, AppResult};

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: i64,
}

/// Access/refresh token pair returned after successful authentication
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenPair {
    /// Short-lived JWT authorizing API calls
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Longer-lived JWT exchanged for a new pair
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub refresh_token: String,
}

/// Signs access/refresh token pairs for authenticated users.
///
/// The signing secret is injected at construction; it is process-wide
/// configuration and constant for the process lifetime.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    /// Create a new issuer with the given secret and token lifetimes
    pub fn new(secret: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            access_ttl,
            refresh_ttl,
        }
    }

    /// Issue an access/refresh token pair for the given user.
    pub fn issue(&self, user: &User) -> AppResult<TokenPair> {
        Ok(TokenPair {
            access_token: self.sign(user.id, self.access_ttl)?,
            refresh_token: self.sign(user.id, self.refresh_ttl)?,
        })
    }

    fn sign(&self, subject: Uuid, ttl: Duration) -> AppResult<String> {
        let claims = Claims {
            sub: subject,
            exp: (Utc::now() + ttl).timestamp(),
        };

        // Signing failures are internal (500), not a caller problem
        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?)
    }
}

/// Verifies token signature and expiry, returning the embedded claims.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Create a new verifier for the given secret
    pub fn new(secret: &[u8]) -> Self {
        // Pinning HS256 rejects any token whose header names another
        // algorithm (algorithm substitution).
        let validation = Validation::new(Algorithm::HS256);

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Verify a token string and return its claims.
    ///
    /// Malformed, tampered, foreign-algorithm, and expired tokens are
    /// indistinguishable to the caller: all of them are invalid.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-key-for-testing-only-32chars";

    fn test_user() -> User {
        User::new(
            Uuid::new_v4(),
            "alice".to_string(),
            "hashed".to_string(),
        )
    }

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SECRET, Duration::minutes(30), Duration::minutes(60))
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let user = test_user();
        let pair = issuer().issue(&user).unwrap();

        let verifier = TokenVerifier::new(SECRET);
        assert_eq!(verifier.verify(&pair.access_token).unwrap().sub, user.id);
        assert_eq!(verifier.verify(&pair.refresh_token).unwrap().sub, user.id);
    }

    #[test]
    fn test_access_token_expiry_window() {
        let pair = issuer().issue(&test_user()).unwrap();
        let claims = TokenVerifier::new(SECRET).verify(&pair.access_token).unwrap();

        let now = Utc::now().timestamp();
        assert!(claims.exp > now + 29 * 60);
        assert!(claims.exp <= now + 31 * 60);
    }

    #[test]
    fn test_refresh_token_outlives_access_token() {
        let pair = issuer().issue(&test_user()).unwrap();

        let verifier = TokenVerifier::new(SECRET);
        let access = verifier.verify(&pair.access_token).unwrap();
        let refresh = verifier.verify(&pair.refresh_token).unwrap();

        assert!(refresh.exp > access.exp);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let pair = issuer().issue(&test_user()).unwrap();

        let verifier = TokenVerifier::new(b"another-secret-key-also-32-chars!!!!");
        assert!(matches!(
            verifier.verify(&pair.access_token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_verify_rejects_foreign_algorithm() {
        // Same secret, but the header names HS384 instead of HS256
        let claims = Claims {
            sub: Uuid::new_v4(),
            exp: (Utc::now() + Duration::minutes(30)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let verifier = TokenVerifier::new(SECRET);
        assert!(matches!(verifier.verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        // Expired well beyond the default leeway
        let expired = TokenIssuer::new(SECRET, Duration::minutes(-5), Duration::minutes(-5));
        let pair = expired.issue(&test_user()).unwrap();

        let verifier = TokenVerifier::new(SECRET);
        assert!(matches!(
            verifier.verify(&pair.refresh_token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let verifier = TokenVerifier::new(SECRET);
        assert!(matches!(verifier.verify("garbage"), Err(AppError::InvalidToken)));
        assert!(matches!(verifier.verify(""), Err(AppError::InvalidToken)));
    }
}
