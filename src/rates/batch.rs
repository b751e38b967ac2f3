//! Sequential batch processing with partial-failure semantics.

use std::time::Duration;

use chrono::NaiveDate;
use serde_json::Value;
use thiserror::Error;

use crate::rates::series::{extract_series, SeriesError};
use crate::rates::types::{BatchResult, PairError, PairResult, SupportedCurrencies};
use crate::rates::validation::{validate_pair, PairValidationError};
use crate::upstream::{UpstreamClient, UpstreamError};

/// Why one pair of a batch failed.
#[derive(Debug, Error)]
pub enum PairFailure {
    #[error(transparent)]
    Validation(#[from] PairValidationError),

    #[error("Failed to fetch rates: {0}")]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Series(#[from] SeriesError),
}

/// Runs a batch against the upstream, one pair at a time.
pub struct BatchProcessor<'a> {
    client: &'a UpstreamClient,
    supported: &'a SupportedCurrencies,
    timeout: Duration,
}

impl<'a> BatchProcessor<'a> {
    pub fn new(
        client: &'a UpstreamClient,
        supported: &'a SupportedCurrencies,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            supported,
            timeout,
        }
    }

    /// Process every pair in order. A failing pair is recorded and the
    /// next one is processed regardless.
    pub async fn run(&self, pairs: &[Value], today: NaiveDate) -> BatchResult {
        let mut batch = BatchResult::default();

        for (index, raw) in pairs.iter().enumerate() {
            match self.process_pair(index, raw, today).await {
                Ok(result) => batch.successes.push(result),
                Err(failure) => {
                    match &failure {
                        PairFailure::Validation(e) => {
                            tracing::info!(index, error = %e, "Batch pair rejected")
                        }
                        other => tracing::warn!(index, error = %other, "Batch pair failed"),
                    }
                    batch.errors.push(PairError {
                        index,
                        pair: raw.clone(),
                        error: failure.to_string(),
                    });
                }
            }
        }

        batch
    }

    async fn process_pair(
        &self,
        index: usize,
        raw: &Value,
        today: NaiveDate,
    ) -> Result<PairResult, PairFailure> {
        let pair = validate_pair(raw, today, self.supported)?;

        tracing::debug!(
            index,
            base = %pair.base,
            target = %pair.target,
            start = %pair.start_date,
            end = %pair.end_date,
            "Fetching batch pair"
        );

        let range = self
            .client
            .fetch_range(
                pair.start_date,
                pair.end_date,
                pair.base.as_str(),
                pair.target.as_str(),
                self.timeout,
            )
            .await?;

        let rates = extract_series(&range.rates, &pair.target)?;

        Ok(PairResult {
            index,
            base: pair.base,
            target: pair.target,
            start_date: pair.start_date,
            end_date: pair.end_date,
            rates,
        })
    }
}
