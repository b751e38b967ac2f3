//! Upstream exchange-rate provider.
//!
//! # Data Flow
//! ```text
//! handler
//!     → RateWindow (latest | date | range)
//!     → client.rs builds {base_url}/{window}?from=&to=
//!     → one GET, optional per-call timeout
//!     → JSON body (verbatim or typed range response)
//! ```
//!
//! # Design Decisions
//! - One pooled reqwest client shared by all handlers
//! - No retries; a failed call is reported to the caller as-is
//! - Non-2xx statuses are errors, like transport failures

pub mod client;
pub mod error;

pub use client::{RangeResponse, RateWindow, UpstreamClient};
pub use error::UpstreamError;
