use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{DatabaseSettings, ServerSettings, Settings};

/// Loads the application settings from `config.toml` and the environment.
///
/// This function is the primary entry point for this crate. Values come from
/// the optional `config.toml` file first, then from `APP_`-prefixed
/// environment variables (e.g. `APP_DATABASE__PASSWORD` overrides
/// `database.password`), so deployments can supply credentials without a
/// config file on disk.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5000_i64)?
        .set_default("database.port", 5432_i64)?
        .add_source(config::File::with_name("config.toml").required(false))
        .add_source(config::Environment::with_prefix("APP").separator("__"))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;

    Ok(settings)
}
