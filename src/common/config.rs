//! Configuration for the route guide server

use crate::common::Result;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Base name of the optional config file looked up in the working directory.
pub const DEFAULT_CONFIG_NAME: &str = "routeguide";

/// Prefix for environment overrides, e.g. `ROUTEGUIDE__SERVER__BIND_ADDR`.
pub const ENV_PREFIX: &str = "ROUTEGUIDE";

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server-specific config
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration: defaults, then the config file, then environment.
    ///
    /// With `path` the file must exist; without it `routeguide.{toml,json,...}`
    /// in the working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => ::config::File::from(path).required(true),
            None => ::config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let config = ::config::Config::builder()
            .add_source(file)
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Config>()?;

        config.server.validate()?;
        Ok(config)
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for gRPC
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,

    /// Feature database (JSON). The bundled database is used when unset.
    #[serde(default)]
    pub db_path: Option<PathBuf>,

    /// Capacity of the per-call ListFeatures channel
    #[serde(default = "default_stream_buffer")]
    pub stream_buffer: usize,
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0, 0, 0, 0, 1], 10000))
}
fn default_stream_buffer() -> usize {
    4
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            db_path: None,
            stream_buffer: default_stream_buffer(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.stream_buffer == 0 {
            return Err(crate::Error::InvalidConfig(
                "stream_buffer must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.server.bind_addr.port(), 10000);
        assert!(config.server.db_path.is_none());
        assert_eq!(config.server.stream_buffer, 4);
    }

    #[test]
    fn test_load_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
log_level = "debug"

[server]
bind_addr = "127.0.0.1:50051"
db_path = "/srv/route_guide_db.json"
"#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(
            config.server.bind_addr,
            "127.0.0.1:50051".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(
            config.server.db_path.as_deref(),
            Some(Path::new("/srv/route_guide_db.json"))
        );
        // Unset keys keep their defaults
        assert_eq!(config.server.stream_buffer, 4);
    }

    #[test]
    fn test_missing_explicit_file() {
        assert!(Config::load(Some(Path::new("/nonexistent/routeguide.toml"))).is_err());
    }

    #[test]
    fn test_zero_stream_buffer_rejected() {
        let config = ServerConfig {
            stream_buffer: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
