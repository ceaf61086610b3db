//! PostgreSQL client wrapper.

use crate::config::WarehouseConfig;
use etl_core::{Error, Result};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::info;

/// Warehouse client wrapping a PostgreSQL connection pool.
///
/// The pool is held for the full lifetime of a run; call [`close`] on every
/// exit path so the store connection is released even when the run fails.
///
/// [`close`]: WarehouseClient::close
#[derive(Clone)]
pub struct WarehouseClient {
    pool: PgPool,
    config: WarehouseConfig,
}

impl WarehouseClient {
    /// Connects to the warehouse.
    pub async fn connect(config: WarehouseConfig) -> Result<Self> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.username)
            .password(&config.password)
            .database(&config.database);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(|e| {
                Error::connection(format!(
                    "failed to connect to {}:{}/{}: {}",
                    config.host, config.port, config.database, e
                ))
            })?;

        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "Connected to PostgreSQL"
        );

        Ok(Self { pool, config })
    }

    /// Returns the inner connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Returns the configuration.
    pub fn config(&self) -> &WarehouseConfig {
        &self.config
    }

    /// Closes the pool, releasing all connections.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL connection closed");
    }
}
