//! Node table and CLI value parsing
//!
//! The deployment is a fixed rack of five nodes. Hosts and credentials are
//! read from the environment at startup so the binary carries no addresses;
//! the resulting table is immutable for the rest of the run.

use std::collections::BTreeMap;
use std::env;
use std::ops::RangeInclusive;

use tracing::warn;

use sirocco_bmc::BmcConfig;

/// Default duty percentage when none is given
pub const DEFAULT_RATE: u8 = 20;

/// Fans per node unless overridden
pub const DEFAULT_FAN_COUNT: usize = 12;

/// Valid node ids
pub const NODE_IDS: RangeInclusive<u32> = 1..=5;

/// One node's BMC coordinates, fixed at startup
#[derive(Debug, Clone)]
pub struct NodeTarget {
    pub id: u32,
    pub host: String,
}

/// Everything read from the environment at startup
#[derive(Debug, Clone)]
pub struct Settings {
    pub username: String,
    pub password: String,
    pub fan_count: usize,
    pub verify_tls: bool,
    pub hosts: BTreeMap<u32, String>,
}

impl Settings {
    /// Read settings from `SIROCCO_*` environment variables
    pub fn from_env() -> Self {
        let mut hosts = BTreeMap::new();
        for id in NODE_IDS {
            if let Ok(host) = env::var(format!("SIROCCO_NODE{id}_HOST")) {
                if !host.is_empty() {
                    hosts.insert(id, host);
                }
            }
        }

        let fan_count = env::var("SIROCCO_FAN_COUNT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_FAN_COUNT);

        Self {
            username: env::var("SIROCCO_BMC_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            password: env::var("SIROCCO_BMC_PASSWORD").unwrap_or_else(|_| "admin".to_string()),
            fan_count,
            verify_tls: env::var("SIROCCO_TLS_VERIFY").is_ok(),
            hosts,
        }
    }

    /// Resolve node ids to targets; ids with no configured host are skipped
    pub fn resolve(&self, ids: &[u32]) -> Vec<NodeTarget> {
        let mut targets = Vec::new();
        for &id in ids {
            match self.hosts.get(&id) {
                Some(host) => targets.push(NodeTarget {
                    id,
                    host: host.clone(),
                }),
                None => warn!("Node {id} not found in configuration"),
            }
        }
        targets
    }

    /// BMC connection settings for one target
    pub fn bmc_config(&self, target: &NodeTarget) -> BmcConfig {
        BmcConfig::new(&target.host, &self.username, &self.password)
            .with_insecure(!self.verify_tls)
    }
}

/// Parse `"N"` or `"N1-N2"` into an explicit id list
///
/// A reversed range is an empty list, not an error.
pub fn parse_node_range(spec: &str) -> Option<Vec<u32>> {
    match spec.split_once('-') {
        Some((start, end)) => {
            let start: u32 = start.trim().parse().ok()?;
            let end: u32 = end.trim().parse().ok()?;
            Some((start..=end).collect())
        }
        None => Some(vec![spec.trim().parse().ok()?]),
    }
}

/// Pick the node ids to control from the CLI argument
///
/// Malformed input falls back to all nodes; ids outside the table are
/// dropped with a warning. Order of the surviving ids is preserved.
pub fn select_nodes(arg: Option<&str>) -> Vec<u32> {
    let Some(spec) = arg else {
        return NODE_IDS.collect();
    };
    let Some(ids) = parse_node_range(spec) else {
        warn!("Invalid node specification: {spec}. Using all nodes.");
        return NODE_IDS.collect();
    };
    ids.into_iter()
        .filter(|id| {
            let valid = NODE_IDS.contains(id);
            if !valid {
                warn!("Node {id} is out of range (1-5), skipping");
            }
            valid
        })
        .collect()
}

/// Pick the duty percentage from the CLI argument
///
/// A value that does not parse keeps the default; a parseable value outside
/// 0-100 is applied anyway, with a warning.
pub fn select_rate(arg: Option<&str>) -> u8 {
    let Some(raw) = arg else {
        return DEFAULT_RATE;
    };
    match raw.parse::<u8>() {
        Ok(rate) => {
            if rate > 100 {
                warn!("Fan rate should be between 0-100, using provided value: {rate}%");
            }
            rate
        }
        Err(_) => {
            warn!("Invalid rate parameter: {raw}. Using default rate: {DEFAULT_RATE}%");
            DEFAULT_RATE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_node() {
        assert_eq!(parse_node_range("3"), Some(vec![3]));
    }

    #[test]
    fn test_parse_node_range() {
        assert_eq!(parse_node_range("2-4"), Some(vec![2, 3, 4]));
        assert_eq!(parse_node_range("1-1"), Some(vec![1]));
    }

    #[test]
    fn test_parse_reversed_range_is_empty() {
        assert_eq!(parse_node_range("4-2"), Some(vec![]));
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_node_range("abc"), None);
        assert_eq!(parse_node_range("1-x"), None);
        assert_eq!(parse_node_range("-3"), None);
        assert_eq!(parse_node_range(""), None);
    }

    #[test]
    fn test_select_nodes_defaults_to_all() {
        assert_eq!(select_nodes(None), vec![1, 2, 3, 4, 5]);
        assert_eq!(select_nodes(Some("nope")), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_select_nodes_drops_out_of_range_ids() {
        assert_eq!(select_nodes(Some("4-7")), vec![4, 5]);
        assert_eq!(select_nodes(Some("9")), Vec::<u32>::new());
    }

    #[test]
    fn test_select_nodes_preserves_order() {
        assert_eq!(select_nodes(Some("2-4")), vec![2, 3, 4]);
    }

    #[test]
    fn test_select_rate() {
        assert_eq!(select_rate(None), DEFAULT_RATE);
        assert_eq!(select_rate(Some("35")), 35);
        assert_eq!(select_rate(Some("fast")), DEFAULT_RATE);
        // Out of range is warned about but still applied
        assert_eq!(select_rate(Some("150")), 150);
    }

    #[test]
    fn test_resolve_skips_unconfigured_nodes() {
        let mut hosts = BTreeMap::new();
        hosts.insert(1, "10.0.13.1".to_string());
        hosts.insert(3, "10.0.13.3".to_string());
        let settings = Settings {
            username: "admin".to_string(),
            password: "admin".to_string(),
            fan_count: DEFAULT_FAN_COUNT,
            verify_tls: false,
            hosts,
        };

        let targets = settings.resolve(&[1, 2, 3]);
        let ids: Vec<u32> = targets.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(targets[0].host, "10.0.13.1");
    }
}
