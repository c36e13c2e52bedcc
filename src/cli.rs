//! Shared helpers for the command-line binaries.

use crate::node::Node;
use chrono::{TimeZone, Utc};

/// Bring up a node from `config.toml` in the current directory.
pub fn load_node_from_config() -> Result<Node, Box<dyn std::error::Error>> {
    Node::init()
}

/// Render a block timestamp (epoch milliseconds) for display.
pub fn format_timestamp(millis: u64) -> String {
    match Utc.timestamp_millis_opt(millis as i64).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => millis.to_string(),
    }
}

/// Abbreviate a digest for table display.
pub fn short_hash(hash: &str) -> String {
    if hash.len() <= 12 {
        hash.to_string()
    } else {
        format!("{}…{}", &hash[..8], &hash[hash.len() - 4..])
    }
}
