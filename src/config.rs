//! Application configuration loaded from environment variables.
//!
//! The service and the client library each read their own small set of
//! variables. A `.env` file is honored in both cases.

use std::env;

/// Service configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file (`:memory:` for an ephemeral database)
    pub database_path: String,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Lifetime of a sign-in session
    pub session_ttl_days: i64,

    // --- Secrets ---
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Public API key every client must present in the `apikey` header
    pub public_api_key: String,
}

impl Config {
    /// Config for tests: in-memory database and fixed keys.
    pub fn test_default() -> Self {
        Self {
            database_path: ":memory:".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            session_ttl_days: 30,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            public_api_key: "test_public_api_key".to_string(),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "green_book.db".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            session_ttl_days: env::var("SESSION_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|days| *days > 0)
                .unwrap_or(30),

            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            public_api_key: env::var("PUBLIC_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("PUBLIC_API_KEY"))?,
        })
    }
}

/// Connection parameters for the client library.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend endpoint, e.g. `http://localhost:8080`
    pub backend_url: String,
    /// Public API key sent with every request
    pub api_key: String,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            backend_url: env::var("GREEN_BOOK_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .map_err(|_| ConfigError::Missing("GREEN_BOOK_URL"))?,
            api_key: env::var("GREEN_BOOK_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("GREEN_BOOK_API_KEY"))?,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");
        env::set_var("PUBLIC_API_KEY", " anon-key ");
        env::set_var("GREEN_BOOK_URL", "http://localhost:8080/");
        env::set_var("GREEN_BOOK_API_KEY", "anon-key");

        let config = Config::from_env().expect("Config should load");
        assert_eq!(config.public_api_key, "anon-key");
        assert_eq!(config.jwt_signing_key, b"test_jwt_key_32_bytes_minimum!!");
        assert!(config.session_ttl_days > 0);

        let client = ClientConfig::from_env().expect("Client config should load");
        assert_eq!(client.backend_url, "http://localhost:8080");
        assert_eq!(client.api_key, "anon-key");
    }
}
