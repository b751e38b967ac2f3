use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One pair of a batch request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PairRequest {
    pub base: String,
    pub target: String,
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Observation {
    pub date: String,
    pub rate: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PairResult {
    pub index: usize,
    pub base: String,
    pub target: String,
    pub start_date: String,
    pub end_date: String,
    pub rates: Vec<Observation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PairError {
    pub index: usize,
    pub pair: Value,
    pub error: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchResponse {
    pub success: bool,
    pub results: Vec<PairResult>,
    pub errors: Option<Vec<PairError>>,
    pub total_pairs: usize,
    pub successful: usize,
    pub failed: usize,
}

/// A raw gateway answer: status plus JSON body.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub struct RatesClient {
    client: Client,
    gateway_url: String,
}

impl RatesClient {
    pub fn new(gateway_url: &str) -> Self {
        Self {
            client: Client::new(),
            gateway_url: gateway_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn health(&self) -> Result<HealthResponse, Box<dyn std::error::Error>> {
        let resp = self
            .client
            .get(format!("{}/health", self.gateway_url))
            .send()
            .await?;
        Ok(resp.error_for_status()?.json().await?)
    }

    /// `GET /api/rates`. Non-2xx answers are returned, not turned into errors.
    pub async fn rates(
        &self,
        base: &str,
        target: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<ApiResponse, reqwest::Error> {
        let mut query = vec![("base", base)];
        if let Some(target) = target {
            query.push(("target", target));
        }
        if let Some(start) = start_date {
            query.push(("start_date", start));
        }
        if let Some(end) = end_date {
            query.push(("end_date", end));
        }

        let resp = self
            .client
            .get(format!("{}/api/rates", self.gateway_url))
            .query(&query)
            .send()
            .await?;
        into_api_response(resp).await
    }

    /// `POST /api/rates/multiple` with an arbitrary JSON body.
    pub async fn batch_raw(&self, body: &Value) -> Result<ApiResponse, reqwest::Error> {
        let resp = self
            .client
            .post(format!("{}/api/rates/multiple", self.gateway_url))
            .json(body)
            .send()
            .await?;
        into_api_response(resp).await
    }

    /// Typed batch request. Fails when the gateway rejects the whole batch.
    pub async fn batch(
        &self,
        pairs: &[PairRequest],
    ) -> Result<BatchResponse, Box<dyn std::error::Error>> {
        let body = serde_json::json!({ "pairs": pairs });
        let resp = self.batch_raw(&body).await?;

        if !resp.status.is_success() {
            return Err(format!("Gateway returned error status {}: {}", resp.status, resp.body).into());
        }

        Ok(serde_json::from_value(resp.body)?)
    }
}

async fn into_api_response(resp: reqwest::Response) -> Result<ApiResponse, reqwest::Error> {
    let status = resp.status();
    let text = resp.text().await?;
    let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
    Ok(ApiResponse { status, body })
}
