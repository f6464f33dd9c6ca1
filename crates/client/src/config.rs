//! Transport selection.
//!
//! The transport is an explicit configuration value handed to [`connect`];
//! there is no process-wide registry of client factories.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use vtctl_server::VtctlServer;

use crate::{LocalClient, TcpClient, VtctlClient};

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default connect timeout for TCP.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

/// Errors resolving a client configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `protocol = "tcp"` without an address
    #[error("protocol \"tcp\" requires an addr")]
    MissingAddr,

    /// `protocol = "in_process"` but no server was supplied
    #[error("protocol \"in_process\" requires a server in this process")]
    NoLocalServer,
}

/// Transport name as written in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolKind {
    /// Call a server in the same process
    #[default]
    InProcess,
    /// JSON lines over TCP
    Tcp,
}

/// A resolved transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Protocol {
    /// Call a server in the same process
    InProcess,
    /// Connect to `addr` over TCP
    Tcp {
        /// `host:port`
        addr: String,
    },
}

/// Client settings, the `[client]` table of `vtctl.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Which transport to use
    pub protocol: ProtocolKind,
    /// Server address, required for TCP
    pub addr: Option<String>,
    /// Per-call timeout
    pub timeout_ms: u64,
    /// TCP connect timeout
    pub connect_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            protocol: ProtocolKind::InProcess,
            addr: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    /// TCP settings for `addr`.
    pub fn tcp(addr: impl Into<String>) -> Self {
        Self {
            protocol: ProtocolKind::Tcp,
            addr: Some(addr.into()),
            ..Self::default()
        }
    }

    /// Resolve the configured transport.
    pub fn protocol(&self) -> Result<Protocol, ConfigError> {
        match self.protocol {
            ProtocolKind::InProcess => Ok(Protocol::InProcess),
            ProtocolKind::Tcp => match &self.addr {
                Some(addr) if !addr.is_empty() => Ok(Protocol::Tcp { addr: addr.clone() }),
                _ => Err(ConfigError::MissingAddr),
            },
        }
    }

    /// Per-call timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Build the client `config` selects.
///
/// `local` is the server used by the in-process transport.
pub fn connect(
    config: &ClientConfig,
    local: Option<Arc<VtctlServer>>,
) -> Result<Box<dyn VtctlClient>, ConfigError> {
    match config.protocol()? {
        Protocol::InProcess => {
            let server = local.ok_or(ConfigError::NoLocalServer)?;
            Ok(Box::new(LocalClient::new(server)))
        }
        Protocol::Tcp { addr } => Ok(Box::new(
            TcpClient::new(addr)
                .with_connect_timeout(Duration::from_millis(config.connect_timeout_ms)),
        )),
    }
}
