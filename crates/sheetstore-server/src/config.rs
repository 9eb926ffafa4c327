//! Server configuration.
//!
//! All operational settings in one TOML-loadable structure. The shared
//! token and the default store/tab are part of it so the service can be
//! constructed and tested without any ambient state.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Data directory for the file-backed store.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Run with the in-memory backend (nothing persisted).
    #[serde(default)]
    pub memory_mode: bool,

    /// Shared authentication token. Requests must present it verbatim;
    /// an empty value accepts requests with an empty or missing token.
    #[serde(default)]
    pub shared_token: String,

    /// Default store id used when a request carries none.
    #[serde(default = "default_sheet_id")]
    pub sheet_id: String,

    /// Default tab used when a request carries none. Provisioned with
    /// the standard header row at startup.
    #[serde(default = "default_tab")]
    pub default_tab: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    7450
}

fn default_sheet_id() -> String {
    "primary".to_string()
}

fn default_tab() -> String {
    "AUCTIONS_MASTER".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_dir: None,
            memory_mode: false,
            shared_token: String::new(),
            sheet_id: default_sheet_id(),
            default_tab: default_tab(),
        }
    }
}

impl ServerConfig {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_toml()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Converts configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Returns the socket address string.
    #[must_use]
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the effective data directory.
    #[must_use]
    pub fn effective_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("./data"))
    }

    /// Creates a builder for configuration.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::new()
    }
}

/// Builder for server configuration.
#[derive(Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the host.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Sets the port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Sets the data directory.
    #[must_use]
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.data_dir = Some(dir.into());
        self
    }

    /// Enables memory mode.
    #[must_use]
    pub fn memory_mode(mut self, enabled: bool) -> Self {
        self.config.memory_mode = enabled;
        self
    }

    /// Sets the shared token.
    #[must_use]
    pub fn shared_token(mut self, token: impl Into<String>) -> Self {
        self.config.shared_token = token.into();
        self
    }

    /// Sets the default store id.
    #[must_use]
    pub fn sheet_id(mut self, id: impl Into<String>) -> Self {
        self.config.sheet_id = id.into();
        self
    }

    /// Sets the default tab.
    #[must_use]
    pub fn default_tab(mut self, tab: impl Into<String>) -> Self {
        self.config.default_tab = tab.into();
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> ServerConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 7450);
        assert_eq!(config.sheet_id, "primary");
        assert_eq!(config.default_tab, "AUCTIONS_MASTER");
        assert!(!config.memory_mode);
    }

    #[test]
    fn test_builder() {
        let config = ServerConfig::builder()
            .host("0.0.0.0")
            .port(9999)
            .memory_mode(true)
            .shared_token("secret")
            .default_tab("POTENTIAL_TRADES")
            .build();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9999);
        assert!(config.memory_mode);
        assert_eq!(config.shared_token, "secret");
        assert_eq!(config.default_tab, "POTENTIAL_TRADES");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sheetstored.toml");

        let config = ServerConfig::builder()
            .host("testhost")
            .port(7777)
            .shared_token("abc")
            .build();
        config.save(&path).unwrap();

        let loaded = ServerConfig::from_file(&path).unwrap();
        assert_eq!(loaded.host, "testhost");
        assert_eq!(loaded.port, 7777);
        assert_eq!(loaded.shared_token, "abc");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("partial.toml");
        std::fs::write(&path, "port = 8000\n").unwrap();

        let loaded = ServerConfig::from_file(&path).unwrap();
        assert_eq!(loaded.port, 8000);
        assert_eq!(loaded.host, "127.0.0.1");
        assert_eq!(loaded.default_tab, "AUCTIONS_MASTER");
    }

    #[test]
    fn test_effective_data_dir() {
        assert_eq!(
            ServerConfig::default().effective_data_dir(),
            PathBuf::from("./data")
        );
        let config = ServerConfig::builder().data_dir("/var/lib/sheetstore").build();
        assert_eq!(
            config.effective_data_dir(),
            PathBuf::from("/var/lib/sheetstore")
        );
    }
}
