//! Tablet records
//!
//! A tablet is one managed database server instance. It is identified by a
//! [`TabletAlias`]: the cell it lives in plus a numeric uid unique within
//! that cell.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Port map key of the tablet's vt service port.
pub const VT_PORT_NAME: &str = "vt";

/// Unique identifier of a tablet: `(cell, uid)`.
///
/// Renders as `<cell>-<uid>` with the uid zero-padded to 10 digits,
/// e.g. `cell1-0000000001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TabletAlias {
    /// Cell the tablet belongs to
    pub cell: String,
    /// Numeric id, unique within the cell
    pub uid: u32,
}

impl TabletAlias {
    /// Create a new alias
    pub fn new(cell: impl Into<String>, uid: u32) -> Self {
        Self {
            cell: cell.into(),
            uid,
        }
    }
}

impl fmt::Display for TabletAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:010}", self.cell, self.uid)
    }
}

/// Error returned when a string is not a valid tablet alias.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid tablet alias: '{0}', expecting something like cell1-0000000001")]
pub struct AliasParseError(pub String);

impl FromStr for TabletAlias {
    type Err = AliasParseError;

    /// Parse `<cell>-<uid>`. The cell may itself contain dashes; the uid is
    /// whatever follows the last one.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (cell, uid) = s
            .rsplit_once('-')
            .ok_or_else(|| AliasParseError(s.to_string()))?;
        if cell.is_empty() {
            return Err(AliasParseError(s.to_string()));
        }
        let uid = uid
            .parse::<u32>()
            .map_err(|_| AliasParseError(s.to_string()))?;
        Ok(TabletAlias::new(cell, uid))
    }
}

/// Role of a tablet in its shard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabletType {
    /// Not yet assigned a role
    #[default]
    Unknown,
    /// Accepts writes for its shard
    Primary,
    /// Replicates from the primary and serves reads
    Replica,
    /// Batch/analytics replica
    Rdonly,
    /// Idle replica that can be promoted to a serving type
    Spare,
    /// Replica used for experiments, never serves traffic
    Experimental,
    /// Replica currently taking a backup
    Backup,
    /// Tablet restoring from a backup
    Restore,
    /// Tablet taken out of service
    Drained,
}

impl TabletType {
    /// All tablet types, in declaration order.
    pub const ALL: [TabletType; 9] = [
        TabletType::Unknown,
        TabletType::Primary,
        TabletType::Replica,
        TabletType::Rdonly,
        TabletType::Spare,
        TabletType::Experimental,
        TabletType::Backup,
        TabletType::Restore,
        TabletType::Drained,
    ];

    /// Lowercase name used in listings.
    pub fn as_str(&self) -> &'static str {
        match self {
            TabletType::Unknown => "unknown",
            TabletType::Primary => "primary",
            TabletType::Replica => "replica",
            TabletType::Rdonly => "rdonly",
            TabletType::Spare => "spare",
            TabletType::Experimental => "experimental",
            TabletType::Backup => "backup",
            TabletType::Restore => "restore",
            TabletType::Drained => "drained",
        }
    }
}

impl fmt::Display for TabletType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unrecognized tablet type name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown TabletType {0}")]
pub struct TabletTypeParseError(pub String);

impl FromStr for TabletType {
    type Err = TabletTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        // "master" is the legacy name of the primary role
        if lower == "master" {
            return Ok(TabletType::Primary);
        }
        TabletType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| TabletTypeParseError(s.to_string()))
    }
}

/// A tablet record as stored in the topology.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tablet {
    /// Unique alias
    pub alias: TabletAlias,
    /// Host serving the tablet's vt ports
    pub hostname: String,
    /// Host serving mysqld
    pub mysql_hostname: String,
    /// mysqld port
    pub mysql_port: i32,
    /// Named service ports (`vt`, `grpc`, ...)
    #[serde(default)]
    pub port_map: BTreeMap<String, i32>,
    /// When this tablet last became primary, if ever
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_term_start_time: Option<DateTime<Utc>>,
    /// Free-form tags
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    /// Keyspace served, empty when unassigned
    #[serde(default)]
    pub keyspace: String,
    /// Shard served, empty when unassigned
    #[serde(default)]
    pub shard: String,
    /// Role of the tablet
    #[serde(default, rename = "type")]
    pub tablet_type: TabletType,
}

impl Default for TabletAlias {
    fn default() -> Self {
        TabletAlias::new("", 0)
    }
}

impl Tablet {
    /// `hostname:vt-port`, or just the hostname when no vt port is set.
    pub fn addr(&self) -> String {
        match self.port_map.get(VT_PORT_NAME) {
            Some(port) => format!("{}:{}", self.hostname, port),
            None => self.hostname.clone(),
        }
    }

    /// `mysql_hostname:mysql_port`.
    pub fn mysql_addr(&self) -> String {
        format!("{}:{}", self.mysql_hostname, self.mysql_port)
    }
}
