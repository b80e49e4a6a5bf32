//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, UserStore};
use crate::services::{AuthService, Authenticator};

/// Application state containing all services.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(database: Arc<Database>, config: &Config) -> Self {
        let users = Arc::new(UserStore::new(database.get_connection()));
        let auth_service = Arc::new(Authenticator::from_config(users, config));

        Self {
            auth_service,
            database,
        }
    }
}
