use crate::config::DatabaseSettings;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::{io, time::Duration};

/// SeaORM pool handle shared by every repository.
pub type DB = DatabaseConnection;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_MIN_CONNECTIONS: u32 = 1;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 8;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 8;
const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;

fn secs(value: Option<u64>, default: u64) -> Duration {
    Duration::from_secs(value.unwrap_or(default))
}

/// Pool options with every unset tuning knob falling back to its default.
fn pool_options(settings: &DatabaseSettings) -> ConnectOptions {
    let mut options = ConnectOptions::new(settings.url.as_str());
    options
        .max_connections(settings.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS))
        .min_connections(settings.min_connections.unwrap_or(DEFAULT_MIN_CONNECTIONS))
        .connect_timeout(secs(settings.connect_timeout_secs, DEFAULT_CONNECT_TIMEOUT_SECS))
        .acquire_timeout(secs(settings.acquire_timeout_secs, DEFAULT_ACQUIRE_TIMEOUT_SECS))
        .idle_timeout(secs(settings.idle_timeout_secs, DEFAULT_IDLE_TIMEOUT_SECS))
        .sqlx_logging(settings.sql_log.unwrap_or(false));
    options
}

/// Opens the pool and pings it once, so a bad URL fails at startup instead of on first request.
///
/// Tuning is read by [`DatabaseSettings::default_from_url`] from `DATABASE_MAX_CONNECTIONS`,
/// `DATABASE_MIN_CONNECTIONS`, `DATABASE_CONNECT_TIMEOUT_SECS`,
/// `DATABASE_ACQUIRE_TIMEOUT_SECS`, `DATABASE_IDLE_TIMEOUT_SECS` and `DATABASE_SQL_LOG`.
pub async fn connect_with_settings(settings: &DatabaseSettings) -> io::Result<DB> {
    let options = pool_options(settings);
    log::debug!(
        "Opening database pool (max {:?} connections)",
        options.get_max_connections()
    );

    let db = Database::connect(options)
        .await
        .map_err(|e| io::Error::other(format!("Failed to connect to database: {}", e)))?;
    ping(&db)
        .await
        .map_err(|e| io::Error::other(format!("Database did not answer ping: {}", e)))?;

    Ok(db)
}

pub async fn connect_from_url(url: &str) -> io::Result<DB> {
    connect_with_settings(&DatabaseSettings::default_from_url(url.to_string())).await
}

pub async fn ping(db: &DB) -> Result<(), DbErr> {
    db.ping().await
}
