//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, CORS, request ID, tracing, panic recovery)
//!     → handlers.rs (parse & validate parameters, call upstream)
//!     → response.rs (success bodies, ApiError → status + JSON)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{request_id, MakeUuidRequestId, X_REQUEST_ID};
pub use response::{ApiError, ErrorBody};
pub use server::{build_router, AppState, HttpServer};
