//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::graph::templates::QueryTemplates;

/// Root configuration for the graph gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// SPARQL endpoint and query templates.
    pub sparql: SparqlConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// SPARQL 1.1 Protocol endpoint settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SparqlConfig {
    /// Query endpoint URL.
    pub endpoint: String,

    /// Per-query HTTP timeout in seconds.
    pub timeout_secs: u64,

    /// User-Agent sent to the endpoint.
    pub user_agent: String,

    /// One query template per backend operation.
    pub queries: QueryTemplates,
}

impl Default for SparqlConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9999/blazegraph/namespace/kb/sparql".to_string(),
            timeout_secs: 30,
            user_agent: concat!("graph-gateway/", env!("CARGO_PKG_VERSION")).to_string(),
            queries: QueryTemplates::default(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 60 }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, for development.
    #[default]
    Pretty,
    /// One JSON object per line, for log aggregation.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [sparql]
            endpoint = "http://triplestore:8890/sparql"
            "#,
        )
        .unwrap();

        assert_eq!(config.sparql.endpoint, "http://triplestore:8890/sparql");
        assert_eq!(config.sparql.timeout_secs, 30);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
        assert!(!config.sparql.queries.details.is_empty());
    }

    #[test]
    fn test_log_format_parses_lowercase() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [observability]
            log_format = "json"
            metrics_enabled = true
            "#,
        )
        .unwrap();

        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert!(config.observability.metrics_enabled);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_query_override_keeps_other_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [sparql.queries]
            logo = "SELECT ?logo WHERE { <{resource}> <https://schema.org/logo> ?logo }"
            "#,
        )
        .unwrap();

        let defaults = QueryTemplates::default();
        assert!(config.sparql.queries.logo.contains("schema.org/logo"));
        assert_eq!(config.sparql.queries.describe, defaults.describe);
    }
}
