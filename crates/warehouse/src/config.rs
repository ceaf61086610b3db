//! Warehouse connection configuration.

use serde::{Deserialize, Serialize};

/// PostgreSQL warehouse configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseConfig {
    /// Database host
    #[serde(default = "default_host")]
    pub host: String,
    /// Database port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Username
    #[serde(default = "default_username")]
    pub username: String,
    /// Password
    #[serde(default = "default_password")]
    pub password: String,
    /// Database name
    #[serde(default = "default_database")]
    pub database: String,
    /// Connection pool size
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_username() -> String {
    "postgres".to_string()
}

fn default_password() -> String {
    "password".to_string()
}

fn default_database() -> String {
    "jira_db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            username: default_username(),
            password: default_password(),
            database: default_database(),
            max_connections: default_max_connections(),
        }
    }
}
