//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. Every problem found is
//! returned, not just the first.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("upstream.base_url '{0}' is not an absolute http(s) URL")]
    UpstreamUrl(String),

    #[error("upstream.batch_timeout_secs must be greater than zero")]
    BatchTimeout,

    #[error("currencies.supported contains invalid code '{0}'")]
    CurrencyCode(String),

    #[error("currencies.supported is empty")]
    NoCurrencies,

    #[error("limits.max_batch_pairs must be greater than zero")]
    MaxBatchPairs,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    match Url::parse(&config.upstream.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && !url.cannot_be_a_base() => {}
        _ => errors.push(ValidationError::UpstreamUrl(config.upstream.base_url.clone())),
    }

    if config.upstream.batch_timeout_secs == 0 {
        errors.push(ValidationError::BatchTimeout);
    }

    if config.currencies.supported.is_empty() {
        errors.push(ValidationError::NoCurrencies);
    }
    for code in &config.currencies.supported {
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            errors.push(ValidationError::CurrencyCode(code.clone()));
        }
    }

    if config.limits.max_batch_pairs == 0 {
        errors.push(ValidationError::MaxBatchPairs);
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
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
    fn test_collects_all_errors() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.upstream.base_url = "ftp://rates.example".into();
        config.upstream.batch_timeout_secs = 0;
        config.currencies.supported.push("EURO".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::BatchTimeout));
        assert!(errors.contains(&ValidationError::CurrencyCode("EURO".into())));
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = GatewayConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::MetricsAddress("nowhere".into())]);
    }
}
