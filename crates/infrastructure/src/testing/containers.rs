//! PostgreSQL container wrapper for store tests.

use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tracing::{debug, info};

use crate::{
    config::DatabaseConfig,
    persistence::{Database, connect},
};

/// Configuration for the PostgreSQL container
#[derive(Debug, Clone)]
pub struct PostgresContainerConfig {
    pub database: String,
    pub username: String,
    pub password: String,
    /// Image tag (e.g., "16-alpine")
    pub version: String,
}

impl Default for PostgresContainerConfig {
    fn default() -> Self {
        Self {
            database: "weather_test".to_string(),
            username: "etl".to_string(),
            password: "etl".to_string(),
            version: "16-alpine".to_string(),
        }
    }
}

/// Running PostgreSQL container, removed when dropped
#[derive(Debug)]
pub struct PostgresContainer {
    _container: ContainerAsync<Postgres>,
    connection_string: String,
}

impl PostgresContainer {
    pub async fn start() -> Result<Self, ContainerError> {
        Self::start_with_config(PostgresContainerConfig::default()).await
    }

    pub async fn start_with_config(
        config: PostgresContainerConfig,
    ) -> Result<Self, ContainerError> {
        info!(version = %config.version, "Starting PostgreSQL container");

        let container = Postgres::default()
            .with_db_name(&config.database)
            .with_user(&config.username)
            .with_password(&config.password)
            .with_tag(&config.version)
            .start()
            .await
            .map_err(|e| ContainerError::Start(e.to_string()))?;

        let host = container
            .get_host()
            .await
            .map_err(|e| ContainerError::Start(e.to_string()))?;
        let port = container
            .get_host_port_ipv4(5432)
            .await
            .map_err(|e| ContainerError::Start(e.to_string()))?;

        let connection_string = format!(
            "postgres://{}:{}@{host}:{port}/{}",
            config.username, config.password, config.database
        );
        debug!(%host, port, "PostgreSQL container started");

        Ok(Self {
            _container: container,
            connection_string,
        })
    }

    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    /// Pool handle for this instance
    pub async fn database(&self) -> Result<Database, ContainerError> {
        connect(&DatabaseConfig::with_url(&self.connection_string))
            .await
            .map_err(|e| ContainerError::Connection(e.to_string()))
    }

    /// Raw PostgreSQL pool for this instance
    pub async fn pool(&self) -> Result<sqlx::PgPool, ContainerError> {
        match self.database().await? {
            Database::Postgres(pool) => Ok(pool),
            Database::Sqlite(_) => Err(ContainerError::Connection(
                "expected a PostgreSQL pool".to_string(),
            )),
        }
    }
}

/// Errors that can occur when working with containers
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("Container failed to start: {0}")]
    Start(String),

    #[error("Failed to connect to container: {0}")]
    Connection(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgres_config_default() {
        let config = PostgresContainerConfig::default();
        assert_eq!(config.database, "weather_test");
        assert_eq!(config.version, "16-alpine");
    }

    #[test]
    fn container_error_display() {
        let error = ContainerError::Start("no docker".to_string());
        assert!(error.to_string().contains("no docker"));
    }
}
