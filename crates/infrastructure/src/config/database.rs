//! Database configuration.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Database connection configuration
///
/// The backend is chosen from the URL scheme: `sqlite:` or
/// `postgres://` / `postgresql://`.
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL (sensitive - may embed credentials)
    #[serde(default = "default_db_url", skip_serializing)]
    pub url: SecretString,

    /// Maximum number of pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Whether to apply pending migrations when connecting (default: false)
    #[serde(default)]
    pub run_migrations: bool,
}

fn default_db_url() -> SecretString {
    SecretString::from("sqlite:weather.db")
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_db_url(),
            max_connections: default_max_connections(),
            run_migrations: false,
        }
    }
}

impl DatabaseConfig {
    /// Config for the given URL with default pool settings
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: SecretString::from(url.into()),
            ..Self::default()
        }
    }

    /// URL scheme, used for logging without exposing credentials
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.url
            .expose_secret()
            .split_once(':')
            .map_or("", |(scheme, _)| scheme)
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &format_args!("{}:[REDACTED]", self.scheme()))
            .field("max_connections", &self.max_connections)
            .field("run_migrations", &self.run_migrations)
            .finish()
    }
}
