use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{DatabaseSettings, LogSettings, ServerSettings, Settings};

/// Environment variables that override individual keys, applied last.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("database.host", "DB_HOST"),
    ("database.port", "DB_PORT"),
    ("database.name", "DB_NAME"),
    ("database.user", "DB_USER"),
    ("database.password", "DB_PASSWORD"),
    ("server.host", "HOST"),
    ("server.port", "PORT"),
    ("log.directory", "LOG_DIR"),
    ("log.level", "LOG_LEVEL"),
];

/// Loads the application settings.
///
/// Sources, later ones winning: built-in development defaults, an optional
/// `dashboard.toml` in the working directory, then the process environment
/// (`DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER`, `DB_PASSWORD`, `HOST`, `PORT`,
/// `LOG_DIR`, `LOG_LEVEL`).
pub fn load_settings() -> Result<Settings, ConfigError> {
    load_settings_with(|var| std::env::var(var).ok())
}

/// Same as [`load_settings`], with the environment supplied by `lookup`.
pub fn load_settings_with<F>(lookup: F) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // The database defaults are insecure and only meant for local development.
    let mut builder = config::Config::builder()
        .set_default("database.host", "127.0.0.1")?
        .set_default("database.port", 5432_i64)?
        .set_default("database.name", "next_project")?
        .set_default("database.user", "sergey")?
        .set_default("database.password", "sergey")?
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000_i64)?
        .set_default("log.directory", "logs")?
        .set_default("log.level", "info")?
        .add_source(config::File::with_name("dashboard").required(false));

    for (key, var) in ENV_OVERRIDES {
        builder = builder.set_override_option(*key, lookup(var))?;
    }

    let settings = builder.build()?.try_deserialize::<Settings>()?;
    validate(&settings)?;

    tracing::debug!(database = ?settings.database, server = ?settings.server, "Settings loaded.");
    Ok(settings)
}

fn validate(settings: &Settings) -> Result<(), ConfigError> {
    if settings.database.host.trim().is_empty() {
        return Err(ConfigError::ValidationError("database host must not be empty".to_string()));
    }
    if settings.database.name.trim().is_empty() {
        return Err(ConfigError::ValidationError("database name must not be empty".to_string()));
    }
    if settings.database.port == 0 {
        return Err(ConfigError::ValidationError("database port must not be 0".to_string()));
    }
    if settings.server.port == 0 {
        return Err(ConfigError::ValidationError("server port must not be 0".to_string()));
    }
    Ok(())
}
