//! Tool configuration via `vtctl.toml`
//!
//! One file configures both tools: `[server]` tunes `vtctld`, `[client]`
//! picks the transport for `vtctlclient`, and `cells` plus `[[tablets]]`
//! seed the in-memory topology. Every section is optional.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vtctl_client::ClientConfig;
use vtctl_core::{Context, Tablet};
use vtctl_executor::Executor;
use vtctl_server::{ServerConfig, VtctlServer};
use vtctl_topo::{MemoryTopo, TabletStore, TopoError};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "vtctl.toml";

/// Errors loading configuration or applying it.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read or written
    #[error("failed to access config file '{path}': {reason}")]
    Io {
        /// File path
        path: String,
        /// OS error
        reason: String,
    },

    /// The file is not valid TOML for [`VtctlConfig`]
    #[error("failed to parse config file '{path}': {reason}")]
    Parse {
        /// File path
        path: String,
        /// Parser message
        reason: String,
    },

    /// A seed tablet could not be registered
    #[error("failed to seed topology: {0}")]
    Seed(#[from] TopoError),

    /// The client section does not resolve to a transport
    #[error(transparent)]
    Client(#[from] vtctl_client::ConfigError),
}

/// Contents of `vtctl.toml`.
///
/// # Example
///
/// ```toml
/// cells = ["cell1"]
///
/// [server]
/// listen_addr = "127.0.0.1:15999"
///
/// [client]
/// protocol = "tcp"
/// addr = "127.0.0.1:15999"
///
/// [[tablets]]
/// alias = { cell = "cell1", uid = 1 }
/// hostname = "localhost"
/// mysql_hostname = "localhost"
/// mysql_port = 3306
/// type = "primary"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VtctlConfig {
    /// Cells known to the topology, in addition to those of seed tablets
    pub cells: Vec<String>,
    /// `vtctld` settings
    pub server: ServerConfig,
    /// `vtctlclient` settings
    pub client: ClientConfig,
    /// Tablets registered at startup
    pub tablets: Vec<Tablet>,
}

impl VtctlConfig {
    /// Read and parse a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config: VtctlConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        config.client.protocol()?;
        Ok(config)
    }

    /// Load `path` if given, else `vtctl.toml` if present, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(CONFIG_FILE_NAME);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Write the commented default file if none exists at `path`.
    pub fn write_default_if_missing(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| ConfigError::Io {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// The default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# vtctl configuration

# Cells registered in the in-memory topology.
cells = ["cell1"]

[server]
# Address vtctld listens on.
listen_addr = "127.0.0.1:15999"
# Requests asking for a longer timeout are clamped to this.
max_timeout_ms = 3600000
# Log lines buffered per call before the command waits for the reader.
event_buffer = 64
# TCP clients must send their request within this many milliseconds.
request_timeout_ms = 10000

[client]
# "in_process" runs commands against this file's topology,
# "tcp" calls the vtctld at `addr`.
protocol = "in_process"
# addr = "127.0.0.1:15999"
timeout_ms = 30000
connect_timeout_ms = 5000

# Tablets registered at startup.
# [[tablets]]
# alias = { cell = "cell1", uid = 1 }
# hostname = "localhost"
# mysql_hostname = "localhost"
# mysql_port = 3306
# port_map = { vt = 15001 }
# keyspace = "commerce"
# shard = "0"
# type = "primary"
"#
    }

    /// Build the in-memory topology this config describes.
    pub fn build_topo(&self) -> Result<MemoryTopo, ConfigError> {
        let topo = MemoryTopo::default();
        for cell in &self.cells {
            topo.add_cell(cell);
        }
        let ctx = Context::background();
        for tablet in &self.tablets {
            topo.add_cell(&tablet.alias.cell);
            topo.create_tablet(&ctx, tablet.clone())?;
        }
        Ok(topo)
    }

    /// Build a server over the configured topology.
    pub fn build_server(&self) -> Result<Arc<VtctlServer>, ConfigError> {
        let topo = self.build_topo()?;
        Ok(Arc::new(VtctlServer::with_config(
            Executor::new(Arc::new(topo)),
            self.server.clone(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use vtctl_client::{Protocol, ProtocolKind};
    use vtctl_core::{TabletAlias, TabletType};

    #[test]
    fn test_default_toml_parses() {
        let config: VtctlConfig = toml::from_str(VtctlConfig::default_toml()).unwrap();
        assert_eq!(config.cells, vec!["cell1"]);
        assert_eq!(config.server, ServerConfig::default());
        assert_eq!(config.client, ClientConfig::default());
        assert!(config.tablets.is_empty());
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config: VtctlConfig = toml::from_str("").unwrap();
        assert_eq!(config, VtctlConfig::default());
    }

    #[test]
    fn test_tablets_seed_topology() {
        let config: VtctlConfig = toml::from_str(
            r#"
            cells = ["cell2"]

            [[tablets]]
            alias = { cell = "cell1", uid = 7 }
            hostname = "host1"
            mysql_hostname = "host1"
            mysql_port = 3306
            port_map = { vt = 15007 }
            keyspace = "commerce"
            type = "replica"
            "#,
        )
        .unwrap();
        let topo = config.build_topo().unwrap();
        let ctx = Context::background();
        assert_eq!(topo.cells(&ctx).unwrap(), vec!["cell1", "cell2"]);

        let tablet = topo.get_tablet(&ctx, &TabletAlias::new("cell1", 7)).unwrap();
        assert_eq!(tablet.tablet_type, TabletType::Replica);
        assert_eq!(tablet.addr(), "host1:15007");
    }

    #[test]
    fn test_duplicate_seed_tablet_fails() {
        let tablet = Tablet {
            alias: TabletAlias::new("cell1", 1),
            ..Tablet::default()
        };
        let config = VtctlConfig {
            tablets: vec![tablet.clone(), tablet],
            ..VtctlConfig::default()
        };
        assert!(matches!(config.build_topo(), Err(ConfigError::Seed(_))));
    }

    #[test]
    fn test_write_default_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        VtctlConfig::write_default_if_missing(&path).unwrap();
        assert!(path.exists());

        let config = VtctlConfig::load(Some(&path)).unwrap();
        assert_eq!(config.client.protocol, ProtocolKind::InProcess);
    }

    #[test]
    fn test_write_default_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[client]\nprotocol = \"tcp\"\naddr = \"10.0.0.1:15999\"\n").unwrap();
        VtctlConfig::write_default_if_missing(&path).unwrap();

        let config = VtctlConfig::from_file(&path).unwrap();
        assert_eq!(
            config.client.protocol().unwrap(),
            Protocol::Tcp {
                addr: "10.0.0.1:15999".into()
            }
        );
    }

    #[test]
    fn test_tcp_without_addr_rejected_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[client]\nprotocol = \"tcp\"\n").unwrap();
        assert!(matches!(
            VtctlConfig::from_file(&path),
            Err(ConfigError::Client(_))
        ));
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "cells = 3").unwrap();
        let err = VtctlConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }
}
