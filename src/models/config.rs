use serde::Deserialize;

/// Configuration options for the storefront server.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Path to the SQLite database file.
    pub database_url: String,
    /// Interface to bind the HTTP server to.
    pub bind_address: String,
    /// Port to listen on.
    pub port: u16,
    /// Session cookie lifetime in hours.
    pub session_ttl_hours: i64,
    /// Hex-encoded 64+ byte key for signing session and flash cookies.
    /// A random key is generated when absent (sessions then reset on
    /// restart).
    pub secret_key: Option<String>,
}
