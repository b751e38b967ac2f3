//! Per-pair validation for batch lookups.

use chrono::NaiveDate;
use serde_json::Value;
use thiserror::Error;

use crate::rates::types::{CurrencyCode, RatePair, SupportedCurrencies, ValidatedPair};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Why a pair was rejected before any upstream call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PairValidationError {
    #[error("Invalid pair: expected an object with string fields base, target, start_date, end_date")]
    Malformed,

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Unsupported currency: {}", .0.join(", "))]
    UnsupportedCurrency(Vec<String>),

    #[error("Base and target currencies must differ (both are {0})")]
    SameCurrency(String),

    #[error("Invalid {field}: '{value}' is not a YYYY-MM-DD date")]
    InvalidDate { field: &'static str, value: String },
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, PairValidationError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        PairValidationError::InvalidDate {
            field,
            value: raw.to_string(),
        }
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Validate one raw batch entry.
///
/// Checks run in order: required fields, allow-list, distinct currencies,
/// then date syntax. A missing `end_date` becomes `today`.
pub fn validate_pair(
    raw: &Value,
    today: NaiveDate,
    supported: &SupportedCurrencies,
) -> Result<ValidatedPair, PairValidationError> {
    let pair: RatePair =
        serde_json::from_value(raw.clone()).map_err(|_| PairValidationError::Malformed)?;

    let base = non_empty(pair.base).and_then(|b| CurrencyCode::parse(&b));
    let target = non_empty(pair.target).and_then(|t| CurrencyCode::parse(&t));
    let start_date = non_empty(pair.start_date);
    let end_date = non_empty(pair.end_date);

    let (base, target, start_date) = match (base, target, start_date) {
        (Some(base), Some(target), Some(start)) => (base, target, start),
        (base, target, start) => {
            let mut missing = Vec::new();
            if base.is_none() {
                missing.push("base");
            }
            if target.is_none() {
                missing.push("target");
            }
            if start.is_none() {
                missing.push("start_date");
            }
            return Err(PairValidationError::MissingFields(missing));
        }
    };

    let unsupported: Vec<String> = [&base, &target]
        .into_iter()
        .filter(|code| !supported.contains(code))
        .map(|code| code.to_string())
        .collect();
    if !unsupported.is_empty() {
        return Err(PairValidationError::UnsupportedCurrency(unsupported));
    }

    if base == target {
        return Err(PairValidationError::SameCurrency(base.to_string()));
    }

    let start_date = parse_date("start_date", &start_date)?;
    let end_date = match end_date {
        Some(end) => parse_date("end_date", &end)?,
        None => today,
    };

    Ok(ValidatedPair {
        base,
        target,
        start_date,
        end_date,
    })
}
