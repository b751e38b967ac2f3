//! Shared utilities for integration tests.

use std::net::SocketAddr;

use rates_gateway::config::GatewayConfig;
use rates_gateway::http::HttpServer;
use rates_gateway::lifecycle::Shutdown;
use tokio::net::TcpListener;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A gateway running on an ephemeral port. Stops when dropped.
pub struct TestGateway {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a gateway pointed at `upstream_url`.
pub async fn start_gateway(upstream_url: &str) -> TestGateway {
    let mut config = GatewayConfig::default();
    config.upstream.base_url = upstream_url.to_string();
    start_gateway_with(config).await
}

pub async fn start_gateway_with(config: GatewayConfig) -> TestGateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    TestGateway { addr, shutdown }
}

/// Mount a time-series answer for one pair and range.
pub async fn mount_range(
    server: &MockServer,
    from: &str,
    to: &str,
    range: &str,
    body: serde_json::Value,
) {
    Mock::given(method("GET"))
        .and(path(format!("/{range}")))
        .and(query_param("from", from))
        .and(query_param("to", to))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
