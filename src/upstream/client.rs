//! HTTP client for the rates provider.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::upstream::error::UpstreamError;

/// Which upstream resource to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateWindow {
    /// Most recent published rates.
    Latest,
    /// Rates for a single day.
    On(NaiveDate),
    /// Time series between two days, inclusive.
    Range { start: NaiveDate, end: NaiveDate },
}

impl RateWindow {
    /// An end date without a start date is ignored.
    pub fn from_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        match (start, end) {
            (Some(start), Some(end)) => RateWindow::Range { start, end },
            (Some(day), None) => RateWindow::On(day),
            (None, _) => RateWindow::Latest,
        }
    }
}

impl fmt::Display for RateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateWindow::Latest => f.write_str("latest"),
            RateWindow::On(day) => write!(f, "{}", day.format("%Y-%m-%d")),
            RateWindow::Range { start, end } => write!(
                f,
                "{}..{}",
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d")
            ),
        }
    }
}

/// Time-series body returned for a date range.
#[derive(Debug, Clone, Deserialize)]
pub struct RangeResponse {
    #[serde(default)]
    pub base: Option<String>,
    /// date → {currency → rate}
    pub rates: BTreeMap<String, HashMap<String, f64>>,
}

/// Shared client for the rates provider.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: Url,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| UpstreamError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidUrl(config.base_url.clone()));
        }

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(UpstreamError::Client)?;

        Ok(Self { http, base_url })
    }

    /// Build `{base_url}/{window}?from=..[&to=..]`.
    pub fn rates_url(
        &self,
        window: RateWindow,
        from: &str,
        to: Option<&str>,
    ) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(&window.to_string());

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("from", from);
            if let Some(to) = to {
                query.append_pair("to", to);
            }
        }

        Ok(url)
    }

    /// Fetch a window and return the body untouched.
    pub async fn fetch_json(
        &self,
        window: RateWindow,
        from: &str,
        to: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<Value, UpstreamError> {
        let url = self.rates_url(window, from, to)?;
        self.get(url, timeout).await
    }

    /// Fetch the daily series for one currency pair.
    pub async fn fetch_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        from: &str,
        to: &str,
        timeout: Duration,
    ) -> Result<RangeResponse, UpstreamError> {
        let url = self.rates_url(RateWindow::Range { start, end }, from, Some(to))?;
        self.get(url, Some(timeout)).await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        timeout: Option<Duration>,
    ) -> Result<T, UpstreamError> {
        let start = Instant::now();
        let result = self.send(&url, timeout).await;

        match &result {
            Ok(_) => metrics::record_upstream_call("success", start),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Upstream request failed");
                metrics::record_upstream_call(e.outcome(), start);
            }
        }
        result
    }

    async fn send<T: DeserializeOwned>(
        &self,
        url: &Url,
        timeout: Option<Duration>,
    ) -> Result<T, UpstreamError> {
        tracing::debug!(url = %url, ?timeout, "Requesting rates from upstream");

        let mut request = self.http.get(url.clone());
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|source| UpstreamError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| UpstreamError::Transport {
                url: url.to_string(),
                source,
            })?;

        serde_json::from_slice(&body).map_err(|e| UpstreamError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn client_for(base_url: &str) -> UpstreamClient {
        let config = UpstreamConfig {
            base_url: base_url.to_string(),
            ..UpstreamConfig::default()
        };
        UpstreamClient::new(&config).unwrap()
    }

    #[test]
    fn test_window_paths() {
        assert_eq!(RateWindow::from_dates(None, None).to_string(), "latest");
        assert_eq!(
            RateWindow::from_dates(Some(date("2023-01-01")), None).to_string(),
            "2023-01-01"
        );
        assert_eq!(
            RateWindow::from_dates(Some(date("2023-01-01")), Some(date("2023-01-31"))).to_string(),
            "2023-01-01..2023-01-31"
        );
        assert_eq!(
            RateWindow::from_dates(None, Some(date("2023-01-31"))),
            RateWindow::Latest
        );
    }

    #[test]
    fn test_rates_url() {
        let client = client_for("https://api.frankfurter.app");

        let url = client.rates_url(RateWindow::Latest, "USD", None).unwrap();
        assert_eq!(url.as_str(), "https://api.frankfurter.app/latest?from=USD");

        let window = RateWindow::Range {
            start: date("2023-01-01"),
            end: date("2023-01-31"),
        };
        let url = client.rates_url(window, "USD", Some("EUR")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.frankfurter.app/2023-01-01..2023-01-31?from=USD&to=EUR"
        );
    }

    #[test]
    fn test_rates_url_keeps_base_path() {
        let client = client_for("http://localhost:8080/v1/");
        let url = client.rates_url(RateWindow::Latest, "EUR", None).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v1/latest?from=EUR");
    }

    #[test]
    fn test_rejects_non_base_url() {
        let config = UpstreamConfig {
            base_url: "mailto:rates@example.com".into(),
            ..UpstreamConfig::default()
        };
        assert!(matches!(
            UpstreamClient::new(&config),
            Err(UpstreamError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_json_relays_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("from", "USD"))
            .and(query_param_is_missing("to"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"amount":1.0,"base":"USD","date":"2024-05-03","rates":{"EUR":0.93}}"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server.uri());
        let body = client
            .fetch_json(RateWindow::Latest, "USD", None, None)
            .await
            .unwrap();

        assert_eq!(body["base"], "USD");
        assert_eq!(body["rates"]["EUR"], 0.93);
    }

    #[tokio::test]
    async fn test_fetch_range_parses_series() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2024-01-01..2024-01-03"))
            .and(query_param("from", "USD"))
            .and(query_param("to", "EUR"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"base":"USD","rates":{"2024-01-03":{"EUR":0.91},"2024-01-02":{"EUR":0.9}}}"#,
            ))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server.uri());
        let range = client
            .fetch_range(
                date("2024-01-01"),
                date("2024-01-03"),
                "USD",
                "EUR",
                Duration::from_secs(10),
            )
            .await
            .unwrap();

        assert_eq!(range.base.as_deref(), Some("USD"));
        assert_eq!(range.rates.len(), 2);
        assert_eq!(range.rates["2024-01-02"]["EUR"], 0.9);
    }

    #[tokio::test]
    async fn test_error_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"message":"not found"}"#))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server.uri());
        let err = client
            .fetch_json(RateWindow::Latest, "XXX", None, None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            UpstreamError::Status { status, .. } if status == reqwest::StatusCode::NOT_FOUND
        ));
    }

    #[tokio::test]
    async fn test_malformed_range_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"message":"no rates"}"#))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server.uri());
        let err = client
            .fetch_range(
                date("2024-01-01"),
                date("2024-01-02"),
                "USD",
                "EUR",
                Duration::from_secs(10),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, UpstreamError::Decode { .. }));
        assert!(err.to_string().contains("missing field `rates`"));
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("{}")
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server.uri());
        let err = client
            .fetch_json(
                RateWindow::Latest,
                "USD",
                None,
                Some(Duration::from_millis(50)),
            )
            .await
            .unwrap_err();

        assert_eq!(err.outcome(), "timeout");
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let client = client_for("http://127.0.0.1:1");
        let err = client
            .fetch_json(RateWindow::Latest, "USD", None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, UpstreamError::Transport { .. }));
    }
}
