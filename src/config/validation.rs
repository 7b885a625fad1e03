//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and the SPARQL endpoint URL
//! - Validate value ranges (timeouts > 0, body limit > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;
use crate::routing::Operation;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("sparql.endpoint: '{0}' is not an absolute http(s) URL")]
    InvalidEndpoint(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("observability.log_level: unknown level '{0}'")]
    UnknownLogLevel(String),

    #[error("sparql.queries.{0}: template is empty")]
    EmptyTemplate(&'static str),

    #[error(
        "timeouts.request_secs ({request_secs}) must be greater than sparql.timeout_secs ({sparql_secs})"
    )]
    RequestTimeoutTooShort { request_secs: u64, sparql_secs: u64 },
}

/// Check a parsed configuration, collecting every problem.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    match Url::parse(&config.sparql.endpoint) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
        _ => errors.push(ValidationError::InvalidEndpoint(config.sparql.endpoint.clone())),
    }

    if config.sparql.timeout_secs == 0 {
        errors.push(ValidationError::Zero("sparql.timeout_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    // The backend timeout must fire before the request timeout.
    let (request_secs, sparql_secs) = (config.timeouts.request_secs, config.sparql.timeout_secs);
    if request_secs > 0 && sparql_secs > 0 && request_secs <= sparql_secs {
        errors.push(ValidationError::RequestTimeoutTooShort {
            request_secs,
            sparql_secs,
        });
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero("security.max_body_size"));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(config.observability.log_level.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    for operation in Operation::ALL {
        if config.sparql.queries.get(operation).trim().is_empty() {
            errors.push(ValidationError::EmptyTemplate(operation.template_key()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&GatewayConfig::default()), Ok(()));
    }

    #[test]
    fn test_reports_all_errors() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.sparql.endpoint = "ftp://store/sparql".into();
        config.timeouts.request_secs = 0;
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::Zero("timeouts.request_secs")));
        assert!(errors.contains(&ValidationError::UnknownLogLevel("loud".into())));
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = GatewayConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::InvalidAddress {
                field: "observability.metrics_address",
                value: "nowhere".into(),
            }]
        );
    }

    #[test]
    fn test_request_timeout_must_exceed_backend_timeout() {
        let mut config = GatewayConfig::default();
        config.timeouts.request_secs = 1;
        config.sparql.timeout_secs = 10;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::RequestTimeoutTooShort {
                request_secs: 1,
                sparql_secs: 10,
            }]
        );

        config.timeouts.request_secs = 10;
        assert_eq!(validate_config(&config).unwrap_err().len(), 1);

        config.timeouts.request_secs = 11;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_template_rejected() {
        let mut config = GatewayConfig::default();
        config.sparql.queries.orgsearch = "   ".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyTemplate("orgsearch")]);
        assert_eq!(errors[0].to_string(), "sparql.queries.orgsearch: template is empty");
    }
}
