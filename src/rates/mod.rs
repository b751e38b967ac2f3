//! Rate lookup domain.
//!
//! # Data Flow
//! ```text
//! batch body {pairs: [...]}
//!     → validation.rs (required fields, allow-list, base != target, dates)
//!     → batch.rs (one upstream range call per valid pair, sequential)
//!     → series.rs (date → {currency: rate} into sorted {date, rate})
//!     → BatchResult (successes + per-index errors)
//! ```
//!
//! # Design Decisions
//! - A failing pair never aborts the batch
//! - Failed pairs echo the original payload back to the caller
//! - No caching: every valid pair costs one upstream call

pub mod batch;
pub mod series;
pub mod types;
pub mod validation;

pub use batch::{BatchProcessor, PairFailure};
pub use types::{
    BatchResponse, BatchResult, CurrencyCode, PairError, PairResult, RateObservation, RatePair,
    SupportedCurrencies, ValidatedPair,
};
pub use validation::{parse_date, validate_pair, PairValidationError};
