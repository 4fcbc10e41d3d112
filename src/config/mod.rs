use serde::{Deserialize, Serialize};
use std::env;

/// Process-wide settings. Built once at startup and shared read-only through
/// `AppState`; nothing mutates it after the server starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Test,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub secret_key: String,
    /// Argon2 iteration count used for new password hashes.
    pub password_hash_cost: u32,
    pub jwt_expiry_hours: u64,
}

const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/jobly";
const TEST_DATABASE_NAME: &str = "jobly_test";

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("test") => Environment::Test,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Test => Self::test(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = match self.environment {
                Environment::Test => test_database_url(&v).unwrap_or(v),
                _ => v,
            };
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("RUN_MIGRATIONS") {
            self.database.run_migrations = v.parse().unwrap_or(self.database.run_migrations);
        }

        // API overrides
        if let Ok(v) = env::var("PORT") {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        // Security overrides
        if let Ok(v) = env::var("SECRET_KEY") {
            self.security.secret_key = v;
        }
        if let Ok(v) = env::var("PASSWORD_HASH_COST") {
            self.security.password_hash_cost = v.parse().unwrap_or(self.security.password_hash_cost);
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
                max_connections: 10,
                connection_timeout: 30,
                run_migrations: true,
            },
            api: ApiConfig {
                port: 3001,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                secret_key: "secret-dev".to_string(),
                password_hash_cost: 3,
                jwt_expiry_hours: 24 * 7, // 1 week
            },
        }
    }

    /// Same as development but pointed at the `jobly_test` database and with
    /// the cheapest hash cost so suites stay fast.
    pub fn test() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Test;
        config.database.url = test_database_url(DEFAULT_DATABASE_URL)
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        config.security.password_hash_cost = 1;
        config
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
                max_connections: 50,
                connection_timeout: 5,
                run_migrations: false,
            },
            api: ApiConfig {
                port: 3001,
                enable_request_logging: false,
            },
            security: SecurityConfig {
                secret_key: "secret-dev".to_string(),
                password_hash_cost: 4,
                jwt_expiry_hours: 4,
            },
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self.environment, Environment::Production)
    }
}

/// Swap the database name in a connection URL for the test database,
/// keeping credentials, host and query parameters.
pub fn test_database_url(base: &str) -> Option<String> {
    let mut url = url::Url::parse(base).ok()?;
    url.set_path(&format!("/{}", TEST_DATABASE_NAME));
    Some(url.into())
}
