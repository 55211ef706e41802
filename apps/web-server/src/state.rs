//! Application state - shared across all handlers.

use std::sync::Arc;

use yatube_core::Paginator;
use yatube_core::ports::{
    GroupRepository, PasswordService, PostRepository, TokenService, UserRepository,
};
use yatube_infra::InMemoryStore;
use yatube_infra::auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub paginator: Paginator,
    pub login_url: Arc<str>,
}

struct Repositories {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    posts: Arc<dyn PostRepository>,
}

impl Repositories {
    fn in_memory(store: &InMemoryStore) -> Self {
        Self {
            users: Arc::new(store.users()),
            groups: Arc::new(store.groups()),
            posts: Arc::new(store.posts()),
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(conn: yatube_infra::database::DbConn) -> Self {
        use yatube_infra::database::{
            PostgresGroupRepository, PostgresPostRepository, PostgresUserRepository,
        };

        Self {
            users: Arc::new(PostgresUserRepository::new(conn.clone())),
            groups: Arc::new(PostgresGroupRepository::new(conn.clone())),
            posts: Arc::new(PostgresPostRepository::new(conn)),
        }
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let repos = Self::connect_repositories(config).await?;
        tracing::info!("Application state initialized");

        Ok(Self::assemble(repos, config.jwt.clone(), &config.login_url))
    }

    /// State backed by an in-memory store.
    pub fn in_memory(store: &InMemoryStore, jwt: JwtConfig, login_url: &str) -> Self {
        Self::assemble(Repositories::in_memory(store), jwt, login_url)
    }

    fn assemble(repos: Repositories, jwt: JwtConfig, login_url: &str) -> Self {
        Self {
            users: repos.users,
            groups: repos.groups,
            posts: repos.posts,
            tokens: Arc::new(JwtTokenService::new(jwt)),
            passwords: Arc::new(Argon2PasswordService::new()),
            paginator: Paginator::default(),
            login_url: Arc::from(login_url),
        }
    }

    #[cfg(feature = "postgres")]
    async fn connect_repositories(config: &AppConfig) -> anyhow::Result<Repositories> {
        use migration::MigratorTrait;

        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Ok(Repositories::in_memory(&InMemoryStore::new()));
        };

        let conn = match yatube_infra::database::connect(db_config).await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                return Ok(Repositories::in_memory(&InMemoryStore::new()));
            }
        };

        if db_config.auto_migrate {
            tracing::info!("Applying pending migrations");
            migration::Migrator::up(&conn, None).await?;
        }

        Ok(Repositories::postgres(conn))
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect_repositories(_config: &AppConfig) -> anyhow::Result<Repositories> {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        Ok(Repositories::in_memory(&InMemoryStore::new()))
    }
}
