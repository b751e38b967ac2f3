//! Route handlers.

use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::http::response::{ApiError, HealthResponse, RatesResponse};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::rates::{parse_date, BatchProcessor, BatchResponse, CurrencyCode};
use crate::upstream::RateWindow;

/// Query parameters of `GET /api/rates`.
#[derive(Debug, Default, Deserialize)]
pub struct RatesQuery {
    pub base: Option<String>,
    pub target: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn date_param(
    field: &'static str,
    value: &Option<String>,
) -> Result<Option<NaiveDate>, ApiError> {
    non_empty(value)
        .map(|raw| parse_date(field, raw))
        .transpose()
        .map_err(|e| ApiError::bad_request(format!("Invalid parameter: {field}"), e.to_string()))
}

/// Naive UTC with microseconds, no offset suffix.
const HEALTH_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: state.config.observability.service_name.clone(),
        timestamp: Utc::now()
            .naive_utc()
            .format(HEALTH_TIMESTAMP_FORMAT)
            .to_string(),
    })
}

/// Single-pair lookup, relayed verbatim.
pub async fn get_rates(
    State(state): State<AppState>,
    query: Result<Query<RatesQuery>, QueryRejection>,
) -> Result<Json<RatesResponse>, ApiError> {
    let Query(query) =
        query.map_err(|e| ApiError::bad_request("Invalid query string", e.body_text()))?;

    let base = non_empty(&query.base)
        .and_then(CurrencyCode::parse)
        .ok_or_else(ApiError::missing_base)?;
    let target = non_empty(&query.target).and_then(CurrencyCode::parse);

    let window = RateWindow::from_dates(
        date_param("start_date", &query.start_date)?,
        date_param("end_date", &query.end_date)?,
    );

    tracing::info!(
        base = %base,
        target = target.as_ref().map(CurrencyCode::as_str).unwrap_or("*"),
        window = %window,
        "Fetching rates"
    );

    let timeout = state
        .config
        .upstream
        .request_timeout_secs
        .map(Duration::from_secs);
    let data = state
        .upstream
        .fetch_json(
            window,
            base.as_str(),
            target.as_ref().map(CurrencyCode::as_str),
            timeout,
        )
        .await?;

    Ok(Json(RatesResponse {
        success: true,
        data,
    }))
}

/// Batch lookup. Per-pair failures are reported in the body; the status
/// stays 200 once the body itself is acceptable.
pub async fn get_multiple_rates(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<BatchResponse>, ApiError> {
    let body = body.map_err(|rejection| match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge(rejection.body_text()),
        _ => ApiError::Internal(rejection.body_text()),
    })?;

    let payload: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::Internal(format!("Invalid JSON body: {e}")))?;

    let pairs = payload.get("pairs").ok_or_else(|| {
        ApiError::bad_request(
            "Missing required field: pairs",
            "Request body must contain a 'pairs' list",
        )
    })?;

    let pairs = pairs
        .as_array()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::bad_request("Invalid pairs", "'pairs' must be a non-empty list"))?;

    let max_pairs = state.config.limits.max_batch_pairs;
    if pairs.len() > max_pairs {
        return Err(ApiError::bad_request(
            "Too many pairs",
            format!("A batch may contain at most {max_pairs} pairs (got {})", pairs.len()),
        ));
    }

    tracing::info!(pairs = pairs.len(), "Processing batch");

    let timeout = Duration::from_secs(state.config.upstream.batch_timeout_secs);
    let processor = BatchProcessor::new(&state.upstream, &state.currencies, timeout);
    let batch = processor.run(pairs, Utc::now().date_naive()).await;

    metrics::record_batch_pairs(batch.successes.len(), batch.errors.len());
    tracing::info!(
        total = batch.total(),
        successful = batch.successes.len(),
        failed = batch.errors.len(),
        "Batch complete"
    );

    Ok(Json(BatchResponse::from(batch)))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
