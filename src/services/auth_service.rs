//! Authentication service - register, login, and token refresh.

use async_trait::async_trait;
use chrono::Duration;
use std::sync::Arc;

use crate::config::Config;
use crate::domain::{Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;
use crate::services::token::{Claims, TokenIssuer, TokenPair, TokenVerifier};

/// Argon2 hash that never verifies; used to equalize the cost of login
/// attempts against unknown usernames.
const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user
    async fn register(&self, username: String, password: String) -> AppResult<User>;

    /// Login and return an access/refresh token pair
    async fn login(&self, username: String, password: String) -> AppResult<TokenPair>;

    /// Exchange a refresh token for a fresh token pair
    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair>;

    /// Verify an access token and extract its claims
    fn verify_access_token(&self, token: &str) -> AppResult<Claims>;
}

/// Concrete implementation of AuthService over a user repository.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    issuer: TokenIssuer,
    verifier: TokenVerifier,
}

impl Authenticator {
    /// Create new auth service instance with explicit token components
    pub fn new(users: Arc<dyn UserRepository>, issuer: TokenIssuer, verifier: TokenVerifier) -> Self {
        Self {
            users,
            issuer,
            verifier,
        }
    }

    /// Create new auth service instance from application configuration
    pub fn from_config(users: Arc<dyn UserRepository>, config: &Config) -> Self {
        let issuer = TokenIssuer::new(
            config.jwt_secret_bytes(),
            Duration::minutes(config.access_token_minutes),
            Duration::minutes(config.refresh_token_minutes),
        );
        let verifier = TokenVerifier::new(config.jwt_secret_bytes());

        Self::new(users, issuer, verifier)
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, username: String, password: String) -> AppResult<User> {
        // Friendly-path duplicate check; the unique index on username is
        // what actually serializes concurrent registrations.
        if self.users.find_by_username(&username).await?.is_some() {
            return Err(AppError::DuplicateUser);
        }

        let password_hash = Password::new(&password)?.into_string();
        self.users.create(username, password_hash).await
    }

    async fn login(&self, username: String, password: String) -> AppResult<TokenPair> {
        let user_result = self.users.find_by_username(&username).await?;

        // SECURITY: Perform password verification even if user doesn't exist
        // to prevent timing attacks that could enumerate valid usernames.
        let (password_hash, user_exists) = match &user_result {
            Some(user) => (user.password_hash.as_str(), true),
            None => (DUMMY_PASSWORD_HASH, false),
        };

        let password_valid = Password::from_hash(password_hash.to_string()).verify(&password);

        // Unknown user and wrong password are indistinguishable to the caller
        if !user_exists || !password_valid {
            return Err(AppError::InvalidCredentials);
        }

        // Safe to unwrap since we verified user_exists is true
        self.issuer.issue(user_result.as_ref().unwrap())
    }

    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let claims = self.verifier.verify(refresh_token)?;

        // The presented refresh token stays valid until natural expiry;
        // only the subject's continued existence is re-checked here.
        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::UnknownUser)?;

        self.issuer.issue(&user)
    }

    fn verify_access_token(&self, token: &str) -> AppResult<Claims> {
        self.verifier.verify(token)
    }
}
