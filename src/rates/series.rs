//! Reshape upstream time series into per-pair observations.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use thiserror::Error;

use crate::rates::types::{CurrencyCode, RateObservation};
use crate::rates::validation::DATE_FORMAT;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Upstream returned an invalid date key '{0}'")]
pub struct SeriesError(pub String);

/// Keep only `target`'s rate per day, ascending by date.
///
/// Days that do not quote `target` are skipped.
pub fn extract_series(
    rates: &BTreeMap<String, HashMap<String, f64>>,
    target: &CurrencyCode,
) -> Result<Vec<RateObservation>, SeriesError> {
    let mut series = Vec::with_capacity(rates.len());

    for (day, quotes) in rates {
        let date = NaiveDate::parse_from_str(day, DATE_FORMAT)
            .map_err(|_| SeriesError(day.clone()))?;
        if let Some(rate) = quotes.get(target.as_str()) {
            series.push(RateObservation { date, rate: *rate });
        }
    }

    series.sort_by_key(|obs| obs.date);
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates(quotes: &[(&str, &str, f64)]) -> BTreeMap<String, HashMap<String, f64>> {
        let mut rates: BTreeMap<String, HashMap<String, f64>> = BTreeMap::new();
        for (day, currency, rate) in quotes {
            rates
                .entry(day.to_string())
                .or_default()
                .insert(currency.to_string(), *rate);
        }
        rates
    }

    #[test]
    fn test_sorted_by_date() {
        let input = rates(&[
            ("2024-01-03", "EUR", 0.93),
            ("2024-01-01", "EUR", 0.91),
            ("2024-01-02", "EUR", 0.92),
        ]);

        let series = extract_series(&input, &CurrencyCode::parse("EUR").unwrap()).unwrap();
        let days: Vec<String> = series.iter().map(|o| o.date.to_string()).collect();
        assert_eq!(days, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
        assert_eq!(series[0].rate, 0.91);
    }

    #[test]
    fn test_keeps_only_target_and_skips_missing_days() {
        let input = rates(&[
            ("2024-01-01", "EUR", 0.91),
            ("2024-01-01", "GBP", 0.79),
            ("2024-01-02", "GBP", 0.78),
        ]);

        let series = extract_series(&input, &CurrencyCode::parse("GBP").unwrap()).unwrap();
        assert_eq!(series.len(), 2);

        let series = extract_series(&input, &CurrencyCode::parse("EUR").unwrap()).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].rate, 0.91);
    }

    #[test]
    fn test_invalid_date_key() {
        let input = rates(&[("yesterday", "EUR", 0.91)]);
        let err = extract_series(&input, &CurrencyCode::parse("EUR").unwrap()).unwrap_err();
        assert_eq!(err, SeriesError("yesterday".into()));
    }
}
