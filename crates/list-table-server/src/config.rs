//! Server configuration, loaded from a YAML file.
//!
//! Every key is optional; missing keys take the defaults below.
//!
//! ```yaml
//! bind: 127.0.0.1:8080
//! nonce_secret: change-me
//! max_per_page: 100
//! demo_records: 47
//! max_body_bytes: 65536
//! actions:
//!   - wplt_table_types
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "list-table.yml";

pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address of the HTTP server.
    pub bind: String,
    /// Secret the CSRF tokens are derived from.
    pub nonce_secret: String,
    /// Upper bound the per-page hook clamps every table to.
    pub max_per_page: u32,
    /// Number of sample posts seeded into the in-memory source.
    pub demo_records: u64,
    /// Largest POST body the AJAX endpoint reads.
    pub max_body_bytes: usize,
    /// Extra dispatchable action names.
    pub actions: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            nonce_secret: "change-me".to_string(),
            max_per_page: 100,
            demo_records: 47,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            actions: vec![crate::lifecycle::TABLE_TYPES_ACTION.to_string()],
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found '{}'", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read config '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Reads `path`. With `allow_missing`, a file that does not exist yields the defaults.
pub fn load_config(path: &Path, allow_missing: bool) -> Result<ServerConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => Ok(ServerConfig::default()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ConfigError::NotFound(path.to_path_buf())),
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: ServerConfig = serde_yaml::from_str("max_per_page: 10\nactions: []\n").unwrap();
        assert_eq!(config.max_per_page, 10);
        assert!(config.actions.is_empty());
        assert_eq!(config.bind, ServerConfig::default().bind);
        assert_eq!(config.demo_records, 47);
        assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
    }

    #[test]
    fn missing_file_is_an_error_unless_allowed() {
        let path = Path::new("/nonexistent/list-table.yml");
        assert_eq!(load_config(path, true).unwrap(), ServerConfig::default());
        assert!(matches!(load_config(path, false), Err(ConfigError::NotFound(_))));
    }
}
