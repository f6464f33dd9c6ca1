//! Awk-friendly rendering of tablet records.
//!
//! One tablet per line, space separated, so output can be piped into awk.
//! The layout is relied on by existing consumers and must not change:
//!
//! ```text
//! <alias> <keyspace> <shard> <type> <addr> <mysql-addr> <tags> <primary-term-start>
//! ```
//!
//! Empty keyspace, shard and primary-term-start render as `<null>`.

use chrono::SecondsFormat;
use std::collections::BTreeMap;
use vtctl_core::Tablet;

const NULL: &str = "<null>";

/// Render a tablet as one awk-friendly line, without a trailing newline.
pub fn format_tablet_line(tablet: &Tablet) -> String {
    let keyspace = or_null(&tablet.keyspace);
    let shard = or_null(&tablet.shard);
    let primary_term_start = tablet
        .primary_term_start_time
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| NULL.to_string());

    format!(
        "{} {} {} {} {} {} {} {}",
        tablet.alias,
        keyspace,
        shard,
        tablet.tablet_type,
        tablet.addr(),
        tablet.mysql_addr(),
        format_tags(&tablet.tags),
        primary_term_start
    )
}

/// Render a tag map as `[k1: "v1" k2: "v2"]`, pairs sorted.
pub fn format_tags(tags: &BTreeMap<String, String>) -> String {
    let mut pairs: Vec<String> = tags.iter().map(|(k, v)| format!("{}: {:?}", k, v)).collect();
    pairs.sort();
    format!("[{}]", pairs.join(" "))
}

fn or_null(s: &str) -> &str {
    if s.is_empty() {
        NULL
    } else {
        s
    }
}
