//! Configuration structures for LineLog

use crate::{LineLogError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server settings
    pub server: ServerSettings,
    /// Storage configuration
    pub storage: StorageSettings,
}

/// Core server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Address to bind the listening socket to
    pub bind_address: String,
    /// TCP port to listen on
    pub port: u16,
    /// Capacity of the per-session receive buffer in bytes
    pub buffer_size: usize,
    /// What to do when a line outgrows the receive buffer
    #[serde(default)]
    pub overflow_policy: OverflowPolicy,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Path of the shared data file accumulating received lines
    pub data_file: PathBuf,
}

/// Policy applied when a session's receive buffer fills without a newline.
///
/// `Discard` drops the buffered bytes and keeps reading, bounding memory per
/// session at the cost of losing the over-length line. `Grow` lets the buffer
/// expand so arbitrarily long lines survive intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Drop buffered bytes when the buffer fills without a newline
    #[default]
    Discard,
    /// Grow the buffer past its configured capacity
    Grow,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                bind_address: "0.0.0.0".to_string(),
                port: 9000,
                buffer_size: 512,
                overflow_policy: OverflowPolicy::Discard,
            },
            storage: StorageSettings {
                data_file: PathBuf::from("/var/tmp/linelogdata"),
            },
        }
    }
}

impl ServerConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LineLogError::Config(format!("Failed to read config file: {}", e)))?;

        let config: ServerConfig = toml::from_str(&content)
            .map_err(|e| LineLogError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.bind_address.is_empty() {
            return Err(LineLogError::Config(
                "Bind address cannot be empty".to_string(),
            ));
        }
        if self.server.buffer_size == 0 {
            return Err(LineLogError::Config(
                "Receive buffer size must be non-zero".to_string(),
            ));
        }
        if self.storage.data_file.as_os_str().is_empty() {
            return Err(LineLogError::Config(
                "Data file path cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Socket address string the listener binds to
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_config_is_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.overflow_policy, OverflowPolicy::Discard);
        assert_eq!(config.listen_addr(), "0.0.0.0:9000");
    }

    #[test]
    fn zero_buffer_size_rejected() {
        let mut config = ServerConfig::default();
        config.server.buffer_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_data_file_rejected() {
        let mut config = ServerConfig::default();
        config.storage.data_file = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn from_file_parses_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [server]
            bind_address = "127.0.0.1"
            port = 9100
            buffer_size = 1024
            overflow_policy = "grow"

            [storage]
            data_file = "/tmp/linelog-test.data"
            "#
        )
        .unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.overflow_policy, OverflowPolicy::Grow);
        assert_eq!(
            config.storage.data_file,
            PathBuf::from("/tmp/linelog-test.data")
        );
    }

    #[test]
    fn from_file_rejects_garbage() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not toml at all [").unwrap();
        assert!(ServerConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn overflow_policy_defaults_to_discard() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [server]
            bind_address = "127.0.0.1"
            port = 9100
            buffer_size = 512

            [storage]
            data_file = "/tmp/linelog-test.data"
            "#
        )
        .unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.overflow_policy, OverflowPolicy::Discard);
    }
}
