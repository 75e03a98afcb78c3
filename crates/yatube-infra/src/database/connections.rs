use std::sync::Arc;
use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DbConn, DbErr};
use sea_orm_migration::MigratorTrait;

use yatube_core::ports::Repositories;

use super::migrator::Migrator;
use super::repos::{
    SeaOrmCommentRepository, SeaOrmFollowRepository, SeaOrmGroupRepository,
    SeaOrmPostRepository, SeaOrmUserRepository,
};

const IN_MEMORY_URL: &str = "sqlite::memory:";
const DEFAULT_URL: &str = "sqlite://yatube.db?mode=rwc";

/// Configuration for the database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub sqlx_logging: bool,
}

impl DatabaseConfig {
    /// Read `DATABASE_URL`, `DB_MAX_CONNECTIONS`, `DB_MIN_CONNECTIONS` and
    /// `DB_SQLX_LOGGING`.
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_URL.to_string()),
            max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            min_connections: std::env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1),
            sqlx_logging: std::env::var("DB_SQLX_LOGGING")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }

    /// A private in-memory SQLite database, used by tests.
    ///
    /// Every SQLite connection to `:memory:` opens its own database, so the
    /// pool is pinned to a single connection.
    pub fn in_memory() -> Self {
        Self {
            url: IN_MEMORY_URL.to_string(),
            max_connections: 1,
            min_connections: 1,
            sqlx_logging: false,
        }
    }

    fn is_in_memory(&self) -> bool {
        self.url.starts_with("sqlite::memory:") || self.url.contains("mode=memory")
    }
}

/// Owner of the connection pool.
///
/// # Example
/// ```ignore
/// let db = DatabaseHandle::init(&config).await?;
/// db.run_migrations().await?;
/// let repos = db.repositories();
/// ```
#[derive(Clone)]
pub struct DatabaseHandle {
    pub conn: DbConn,
}

impl DatabaseHandle {
    /// Open the connection pool described by `config`.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing database connection...");

        let mut opts = ConnectOptions::new(&config.url);
        opts.max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .sqlx_logging(config.sqlx_logging);

        // idle in-memory connections must never be reaped: the data goes with them
        if !config.is_in_memory() {
            opts.idle_timeout(Duration::from_secs(300));
        }

        let conn = Database::connect(opts).await?;
        tracing::info!(
            "Database connected (pool: {})",
            config.max_connections
        );

        Ok(Self { conn })
    }

    /// Open an in-memory database with every migration applied.
    pub async fn in_memory() -> Result<Self, DbErr> {
        let handle = Self::init(&DatabaseConfig::in_memory()).await?;
        handle.run_migrations().await?;
        Ok(handle)
    }

    /// Apply pending migrations.
    pub async fn run_migrations(&self) -> Result<(), DbErr> {
        Migrator::up(&self.conn, None).await?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    /// Repository implementations over this pool.
    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: Arc::new(SeaOrmUserRepository::new(self.conn.clone())),
            groups: Arc::new(SeaOrmGroupRepository::new(self.conn.clone())),
            posts: Arc::new(SeaOrmPostRepository::new(self.conn.clone())),
            comments: Arc::new(SeaOrmCommentRepository::new(self.conn.clone())),
            follows: Arc::new(SeaOrmFollowRepository::new(self.conn.clone())),
        }
    }
}
