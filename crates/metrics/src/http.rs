use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::collector::MetricsCollector;

/// Prometheus scrape endpoint for one coordinator process.
///
/// Serves the text exposition format on `/metrics` and a trivial liveness
/// probe on `/health`. Bind address and port come from the application's
/// metrics configuration section.
pub struct MetricsServer {
    collector: Arc<MetricsCollector>,
    bind_addr: String,
    port: u16,
}

impl MetricsServer {
    pub fn new(
        collector: Arc<MetricsCollector>,
        bind_addr: impl Into<String>,
        port: u16,
    ) -> Self {
        Self {
            collector,
            bind_addr: bind_addr.into(),
            port,
        }
    }

    fn addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Bind and serve until the process exits.
    pub async fn serve(self) -> Result<(), MetricsServerError> {
        let addr = self.addr();
        let app = Router::new()
            .route("/metrics", get(export))
            .route("/health", get(healthcheck))
            .with_state(self.collector);

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| MetricsServerError::Bind(addr.clone(), e.to_string()))?;

        info!(%addr, "metrics exporter listening");

        axum::serve(listener, app)
            .await
            .map_err(|e| MetricsServerError::Serve(e.to_string()))
    }
}

async fn export(State(collector): State<Arc<MetricsCollector>>) -> Response {
    match collector.export_metrics() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

async fn healthcheck() -> impl IntoResponse {
    StatusCode::OK
}

#[derive(Debug, thiserror::Error)]
pub enum MetricsServerError {
    #[error("failed to bind {0}: {1}")]
    Bind(String, String),

    #[error("exporter stopped: {0}")]
    Serve(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addr_built_from_config_parts() {
        let server = MetricsServer::new(Arc::new(MetricsCollector::new()), "127.0.0.1", 9464);
        assert_eq!(server.addr(), "127.0.0.1:9464");
    }

    #[tokio::test]
    async fn test_serve_reports_unbindable_address() {
        let server =
            MetricsServer::new(Arc::new(MetricsCollector::new()), "definitely-not-an-ip", 9464);
        assert!(matches!(
            server.serve().await,
            Err(MetricsServerError::Bind(..))
        ));
    }
}
