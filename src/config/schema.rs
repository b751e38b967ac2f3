//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Frankfurter public API, the default upstream.
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.frankfurter.app";

/// Currencies published by the upstream provider.
pub const DEFAULT_SUPPORTED_CURRENCIES: [&str; 31] = [
    "AUD", "BGN", "BRL", "CAD", "CHF", "CNY", "CZK", "DKK", "EUR", "GBP", "HKD", "HUF", "IDR",
    "ILS", "INR", "ISK", "JPY", "KRW", "MXN", "MYR", "NOK", "NZD", "PHP", "PLN", "RON", "SEK",
    "SGD", "THB", "TRY", "USD", "ZAR",
];

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream exchange-rate provider.
    pub upstream: UpstreamConfig,

    /// Currency allow-list for batch lookups.
    pub currencies: CurrencyConfig,

    /// Cross-origin access.
    pub cors: CorsConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
        }
    }
}

/// Upstream provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the rates API.
    pub base_url: String,

    /// Timeout for single-pair lookups. Unset means no timeout.
    pub request_timeout_secs: Option<u64>,

    /// Timeout applied to every pair of a batch.
    pub batch_timeout_secs: u64,

    /// User-Agent sent upstream.
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_URL.to_string(),
            request_timeout_secs: None,
            batch_timeout_secs: 10,
            user_agent: concat!("rates-gateway/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Currency allow-list.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CurrencyConfig {
    /// Codes accepted as batch `base`/`target`.
    pub supported: Vec<String>,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            supported: DEFAULT_SUPPORTED_CURRENCIES
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins. Empty, or a `*` entry, allows any origin.
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Maximum number of pairs in one batch.
    pub max_batch_pairs: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 1024 * 1024,
            max_batch_pairs: 100,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Service name reported by `/health`.
    pub service_name: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            service_name: "currency-exchange-api".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:5000");
        assert_eq!(config.upstream.base_url, DEFAULT_UPSTREAM_URL);
        assert_eq!(config.upstream.batch_timeout_secs, 10);
        assert!(config.upstream.request_timeout_secs.is_none());
        assert_eq!(config.currencies.supported.len(), 31);
        assert!(config.cors.allows_any_origin());
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [upstream]
            batch_timeout_secs = 3

            [cors]
            allowed_origins = ["https://example.com"]
            "#,
        )
        .expect("valid toml");

        assert_eq!(config.upstream.batch_timeout_secs, 3);
        assert_eq!(config.upstream.base_url, DEFAULT_UPSTREAM_URL);
        assert!(!config.cors.allows_any_origin());
        assert_eq!(config.limits.max_batch_pairs, 100);
    }
}
