//! Rate lookup types.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Uppercased, trimmed currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Normalise raw input. Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let code = raw.trim().to_uppercase();
        if code.is_empty() {
            None
        } else {
            Some(Self(code))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Allow-list of currencies accepted in batch lookups.
#[derive(Debug, Clone)]
pub struct SupportedCurrencies(HashSet<String>);

impl SupportedCurrencies {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            codes
                .into_iter()
                .map(|c| c.as_ref().trim().to_uppercase())
                .collect(),
        )
    }

    pub fn contains(&self, code: &CurrencyCode) -> bool {
        self.0.contains(code.as_str())
    }
}

/// One pair as submitted in a batch body. Every field is optional here;
/// validation decides what is missing.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RatePair {
    pub base: Option<String>,
    pub target: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// A pair that passed validation and is ready to be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPair {
    pub base: CurrencyCode,
    pub target: CurrencyCode,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// A single day's rate for one pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateObservation {
    #[serde(with = "iso_date")]
    pub date: NaiveDate,
    pub rate: f64,
}

/// Successful outcome for one batch pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairResult {
    pub index: usize,
    pub base: CurrencyCode,
    pub target: CurrencyCode,
    #[serde(with = "iso_date")]
    pub start_date: NaiveDate,
    #[serde(with = "iso_date")]
    pub end_date: NaiveDate,
    pub rates: Vec<RateObservation>,
}

/// Failed outcome for one batch pair, carrying the original payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairError {
    pub index: usize,
    pub pair: Value,
    pub error: String,
}

/// Collected outcomes of one batch request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    pub successes: Vec<PairResult>,
    pub errors: Vec<PairError>,
}

impl BatchResult {
    pub fn total(&self) -> usize {
        self.successes.len() + self.errors.len()
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Wire shape of the batch endpoint's response.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResponse {
    pub success: bool,
    pub results: Vec<PairResult>,
    pub errors: Option<Vec<PairError>>,
    pub total_pairs: usize,
    pub successful: usize,
    pub failed: usize,
}

impl From<BatchResult> for BatchResponse {
    fn from(batch: BatchResult) -> Self {
        let total_pairs = batch.total();
        let success = batch.is_success();
        let successful = batch.successes.len();
        let failed = batch.errors.len();
        Self {
            success,
            results: batch.successes,
            errors: if batch.errors.is_empty() {
                None
            } else {
                Some(batch.errors)
            },
            total_pairs,
            successful,
            failed,
        }
    }
}

mod iso_date {
    use chrono::NaiveDate;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format("%Y-%m-%d"))
    }
}
