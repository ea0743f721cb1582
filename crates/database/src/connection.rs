use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::time::Duration;

const MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds the connection options for the configured database.
pub fn connect_options(settings: &DatabaseSettings) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .database(&settings.name)
        .username(&settings.user)
        .password(&settings.password)
}

/// Establishes a connection pool to the PostgreSQL database.
///
/// The pool is created once at process start and handed to everything that
/// needs it; call [`close`] at shutdown.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    if settings.host.is_empty() || settings.name.is_empty() {
        return Err(DbError::ConnectionConfigError(
            "database host and name must be set".to_string(),
        ));
    }

    tracing::info!(
        host = %settings.host,
        port = settings.port,
        database = %settings.name,
        "Connecting to the database."
    );

    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_with(connect_options(settings))
        .await?;

    Ok(pool)
}

/// Creates a pool that opens connections on first use.
pub fn connect_lazy(settings: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_lazy_with(connect_options(settings))
}

/// Applies the embedded migrations so the schema is up to date.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied.");
    Ok(())
}

/// Waits for checked-out connections to be returned, then closes the pool.
pub async fn close(pool: PgPool) {
    pool.close().await;
    tracing::info!("Database pool closed.");
}
