use std::net::SocketAddr;
use std::time::Duration;

use crate::gateway::QueryTarget;

const DEFAULT_PRESETS: &str = "Local Prometheus|http://localhost:9090";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub rest_addr: SocketAddr,
    /// Named Prometheus endpoints offered for live queries. Parsed once at
    /// startup and immutable for the process lifetime.
    pub presets: Vec<QueryTarget>,
    pub query_timeout: Duration,
    /// Bearer token required for template mutations. None leaves the gate
    /// open (development mode).
    pub admin_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            rest_addr: "0.0.0.0:8080".parse().unwrap(),
            presets: parse_presets(DEFAULT_PRESETS),
            query_timeout: Duration::from_secs(10),
            admin_token: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("PROMLINT_ADDR") {
            match addr.parse() {
                Ok(addr) => config.rest_addr = addr,
                Err(_) => tracing::warn!(%addr, "ignoring unparseable PROMLINT_ADDR"),
            }
        }
        if let Ok(raw) = std::env::var("PROMETHEUS_URLS") {
            let presets = parse_presets(&raw);
            if presets.is_empty() {
                tracing::warn!("PROMETHEUS_URLS is set but empty, keeping defaults");
            } else {
                config.presets = presets;
            }
        }
        if let Ok(secs) = std::env::var("PROMLINT_QUERY_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) if secs > 0 => config.query_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(%secs, "ignoring unparseable PROMLINT_QUERY_TIMEOUT_SECS"),
            }
        }
        config.admin_token = std::env::var("PROMLINT_ADMIN_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());

        config
    }
}

/// Comma-separated `Name|url` pairs; an entry without `|` uses the whole
/// string as both name and url.
pub fn parse_presets(raw: &str) -> Vec<QueryTarget> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| match item.split_once('|') {
            Some((name, url)) => QueryTarget {
                name: name.trim().to_string(),
                url: url.trim().to_string(),
            },
            None => QueryTarget {
                name: item.to_string(),
                url: item.to_string(),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_local_preset() {
        let config = ServerConfig::default();
        assert_eq!(config.presets.len(), 1);
        assert_eq!(config.presets[0].name, "Local Prometheus");
        assert_eq!(config.presets[0].url, "http://localhost:9090");
        assert_eq!(config.query_timeout, Duration::from_secs(10));
        assert!(config.admin_token.is_none());
    }

    #[test]
    fn parses_named_pairs() {
        let presets = parse_presets("Prod|https://prom.example.com, Staging|http://stage:9090");
        assert_eq!(presets.len(), 2);
        assert_eq!(presets[0].name, "Prod");
        assert_eq!(presets[0].url, "https://prom.example.com");
        assert_eq!(presets[1].name, "Staging");
        assert_eq!(presets[1].url, "http://stage:9090");
    }

    #[test]
    fn bare_url_doubles_as_name() {
        let presets = parse_presets("http://localhost:9090");
        assert_eq!(presets.len(), 1);
        assert_eq!(presets[0].name, presets[0].url);
    }

    #[test]
    fn empty_entries_skipped() {
        let presets = parse_presets("A|http://a, ,B|http://b,");
        assert_eq!(presets.len(), 2);
    }
}
