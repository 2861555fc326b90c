//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::pagination::Paginator;
use blog_core::ports::{PasswordService, TokenService};
use blog_core::service::{AccountService, BlogService, Repositories};
use blog_infra::database::DatabaseConfig;
use blog_infra::{Argon2PasswordService, InMemoryStore, JwtTokenService};

#[cfg(feature = "postgres")]
use blog_infra::DatabaseConnections;

use crate::admin::{self, AdminSite};
use crate::config::AppConfig;

/// Shared application state. Everything here is immutable; the store is the
/// only shared mutable resource.
#[derive(Clone)]
pub struct AppState {
    pub blog: BlogService,
    pub accounts: AccountService,
    pub tokens: Arc<dyn TokenService>,
    pub admin: Arc<AdminSite>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let repos = Self::connect(config.database.as_ref()).await;
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        let state = Self::from_parts(repos, Paginator::new(config.posts_per_page), tokens, passwords);
        tracing::info!(
            per_page = config.posts_per_page,
            admin_models = state.admin.models().len(),
            "Application state initialized"
        );
        state
    }

    pub fn from_parts(
        repos: Repositories,
        paginator: Paginator,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        Self {
            accounts: AccountService::new(repos.users.clone(), passwords),
            blog: BlogService::new(repos, paginator),
            tokens,
            admin: Arc::new(admin::register_models()),
        }
    }

    #[cfg(feature = "postgres")]
    async fn connect(db_config: Option<&DatabaseConfig>) -> Repositories {
        let Some(config) = db_config else {
            tracing::warn!("DATABASE_URL not set. Running on the in-memory store.");
            return InMemoryStore::new().repositories();
        };

        match DatabaseConnections::init(config).await {
            Ok(connections) => connections.repositories(),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                InMemoryStore::new().repositories()
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect(_db_config: Option<&DatabaseConfig>) -> Repositories {
        tracing::info!("Running without postgres feature - using the in-memory store");
        InMemoryStore::new().repositories()
    }
}
