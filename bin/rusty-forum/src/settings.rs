//! Layered runtime settings.
//!
//! Built-in defaults, then an optional `rusty-forum.toml` in the working
//! directory, then `FORUM__*` environment variables (`FORUM__SERVER__PORT=9000`).

use config::{Config, ConfigError, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub log: LogSettings,
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    /// sqlx connection string; ignored by the in-memory store.
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthSettings {
    /// Signing secret for bearer tokens. No default.
    pub token_secret: SecretString,
    /// Access token lifetime.
    pub token_ttl_secs: i64,
}

#[derive(Debug, Deserialize)]
pub struct LogSettings {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    pub json: bool,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("database.url", "sqlite:rusty_forum.db")?
            .set_default("auth.token_ttl_secs", 3600)?
            .set_default("log.level", "info")?
            .set_default("log.json", false)?
            .add_source(File::with_name("rusty-forum").required(false))
            .add_source(
                Environment::with_prefix("FORUM")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
