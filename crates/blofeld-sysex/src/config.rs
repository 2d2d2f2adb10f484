//! Device and session configuration
//!
//! ```toml
//! device_id = 0
//!
//! [session]
//! response_timeout_ms = 5000
//!
//! [mock]
//! latency_ms = 10
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for a Blofeld connection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlofeldConfig {
    /// SysEx device id (0x00 by default, 0x7F addresses all devices)
    #[serde(default)]
    pub device_id: u8,
    /// Dump exchange settings
    #[serde(default)]
    pub session: SessionConfig,
    /// Mock port settings, used in tests and offline runs
    #[serde(default)]
    pub mock: MockConfig,
}

impl BlofeldConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

/// Dump session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How long to wait for a SNDD after sending a request
    #[serde(default = "default_response_timeout")]
    pub response_timeout_ms: u64,
}

impl SessionConfig {
    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            response_timeout_ms: default_response_timeout(),
        }
    }
}

fn default_response_timeout() -> u64 {
    5000
}

/// Mock port configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockConfig {
    /// Simulated reply latency in milliseconds
    #[serde(default)]
    pub latency_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = BlofeldConfig::default();
        assert_eq!(config.device_id, 0);
        assert_eq!(config.session.response_timeout(), Duration::from_secs(5));
        assert_eq!(config.mock.latency_ms, 0);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = BlofeldConfig::from_toml_str("").unwrap();
        assert_eq!(config, BlofeldConfig::default());
    }

    #[test]
    fn test_parse_full_toml() {
        let config = BlofeldConfig::from_toml_str(
            r#"
            device_id = 127

            [session]
            response_timeout_ms = 250

            [mock]
            latency_ms = 15
            "#,
        )
        .unwrap();

        assert_eq!(config.device_id, 0x7F);
        assert_eq!(config.session.response_timeout_ms, 250);
        assert_eq!(config.mock.latency_ms, 15);
    }

    #[test]
    fn test_partial_session_table() {
        let config = BlofeldConfig::from_toml_str("[session]\n").unwrap();
        assert_eq!(config.session.response_timeout_ms, 5000);
    }

    #[test]
    fn test_invalid_toml() {
        let err = BlofeldConfig::from_toml_str("device_id = 300").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "device_id = 3\n[session]\nresponse_timeout_ms = 1000").unwrap();

        let config = BlofeldConfig::load(file.path()).unwrap();
        assert_eq!(config.device_id, 3);
        assert_eq!(config.session.response_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_load_missing_file() {
        let err = BlofeldConfig::load("/nonexistent/blofeld.toml").unwrap_err();
        match err {
            ConfigError::Io { path, .. } => assert_eq!(path, "/nonexistent/blofeld.toml"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
