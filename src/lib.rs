//! Currency exchange-rate gateway library.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod rates;
pub mod upstream;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
