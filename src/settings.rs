use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// sqlx connection string, e.g. `sqlite:trivia.db`
    pub url: String,
    pub max_connections: u32,
    pub create_if_missing: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// `EnvFilter` directives, e.g. `info` or `trivia_api=debug,tower_http=info`
    pub level: String,
    /// Also log span enter/exit events
    pub span_events: bool,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Settings {
    /// Layers defaults, an optional config file and `TRIVIA_*` variables
    /// (`TRIVIA_DATABASE__URL`, `TRIVIA_SERVER__PORT`, `TRIVIA_LOG__LEVEL`, ...),
    /// in that order.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.url", "sqlite:trivia.db")?
            .set_default("database.max_connections", 5)?
            .set_default("database.create_if_missing", true)?
            .set_default("log.level", "info")?
            .set_default("log.span_events", false)?;

        builder = match file {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name("trivia").required(false)),
        };

        builder
            .add_source(
                Environment::with_prefix("TRIVIA")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 9999\n[database]\nurl = \"sqlite::memory:\""
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.server.port, 9999);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.database.url, "sqlite::memory:");
        assert_eq!(settings.database.max_connections, 5);
        assert_eq!(settings.server.address(), "0.0.0.0:9999");
        assert_eq!(settings.log.level, "info");
        assert!(!settings.log.span_events);
    }
}
