use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

/// Development fallback, long enough to derive a cookie signing key.
/// Override with `SESSION_SECRET` or `config.toml` in production.
const DEV_SECRET: &str =
    "insecure-dev-session-secret-0123456789abcdefghijklmnopqrstuvwxyz-change-me";

#[derive(Debug, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
    pub debug: bool,
}

impl Server {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
            debug: false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Database {
    pub path: String,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            path: "daybook.db".into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Session {
    /// Cookie signing key material, at least 64 bytes.
    pub secret: String,
    /// Inactivity expiry in minutes.
    pub ttl: i64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            secret: DEV_SECRET.into(),
            ttl: 10080,
        }
    }
}

/// Layered configuration: defaults, then an optional `config.toml`, then the
/// environment (`SERVER_PORT`, `DATABASE_PATH`, `SESSION_SECRET`, ...).
#[derive(Debug, Deserialize, Default)]
pub struct Settings {
    pub server: Server,
    pub database: Database,
    pub session: Session,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000_i64)?
            .set_default("server.debug", false)?
            .set_default("database.path", "daybook.db")?
            .set_default("session.secret", DEV_SECRET)?
            .set_default("session.ttl", 10080_i64)?
            .add_source(
                File::with_name("config.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::default().separator("_"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::{remove_var, set_var};

    #[test]
    fn defaults_and_env_overrides() {
        set_var("SERVER_PORT", "4000");
        set_var("DATABASE_PATH", "/tmp/daybook-test.db");
        let settings = Settings::new().unwrap_or_default();
        assert_eq!(settings.server.bind_address(), "127.0.0.1:4000");
        assert_eq!(settings.database.path, "/tmp/daybook-test.db");
        assert!(!settings.server.debug);
        assert!(settings.session.secret.len() >= 64);
        remove_var("SERVER_PORT");
        remove_var("DATABASE_PATH");
    }
}
