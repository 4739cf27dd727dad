use serde::Deserialize;
use std::fmt;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
}

/// Contains parameters for the HTTP server itself.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// The interface the server binds to (e.g., "0.0.0.0").
    pub host: String,
    /// The port the server listens on.
    pub port: u16,
}

/// Contains the connection parameters for the PostgreSQL database.
///
/// The credential fields are secrets: `Debug` is implemented by hand so the
/// password can never end up in a log line or error message.
#[derive(Clone, Deserialize)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database_name: String,
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database_name", &self.database_name)
            .finish()
    }
}
