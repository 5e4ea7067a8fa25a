use axum::{extract::State, response::Json, routing::get, Router};
use std::io::ErrorKind;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::i18n::Lang;
use crate::services::AvailabilityMonitor;

pub struct HealthState {
    pub monitor: Arc<AvailabilityMonitor>,
    pub started: Instant,
}

/// GET /health
async fn health(State(state): State<Arc<HealthState>>) -> Json<serde_json::Value> {
    let availability = state.monitor.current_status();
    let languages: Vec<&str> = Lang::ALL.iter().map(|l| l.code()).collect();

    Json(serde_json::json!({
        "status": "healthy",
        "bot": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime": state.started.elapsed().as_secs_f64(),
        "languages": languages,
        "server_status": availability.status.as_str(),
        "last_check": availability.last_checked.to_rfc3339(),
    }))
}

pub fn create_health_router(state: Arc<HealthState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `host:port`, falling back to `port + 1` when the port is taken.
pub async fn bind(config: &ServerConfig) -> std::io::Result<TcpListener> {
    let addr = format!("{}:{}", config.host, config.port);
    match TcpListener::bind(&addr).await {
        Ok(listener) => Ok(listener),
        Err(e) if e.kind() == ErrorKind::AddrInUse => {
            let next = config.port.checked_add(1).ok_or(e)?;
            tracing::warn!("⚠️  Port {} already in use, trying {}", config.port, next);
            TcpListener::bind(format!("{}:{}", config.host, next)).await
        }
        Err(e) => Err(e),
    }
}

pub async fn serve(config: ServerConfig, state: Arc<HealthState>) -> std::io::Result<()> {
    let listener = bind(&config).await?;
    tracing::info!("🏥 Health check server running on {}", listener.local_addr()?);
    axum::serve(listener, create_health_router(state)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::test_server::{self, Silent};
    use crate::sources::{AvailabilityProbe, SourceError};
    use async_trait::async_trait;

    struct Down;

    #[async_trait]
    impl AvailabilityProbe for Down {
        fn target(&self) -> &str {
            "https://down.test"
        }

        async fn probe(&self) -> Result<(), SourceError> {
            Err(SourceError::UpstreamUnavailable("down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_health_reports_bot_and_server_status() {
        let monitor = Arc::new(AvailabilityMonitor::new(Arc::new(Down), Arc::new(Silent)));
        monitor.check().await;
        let state = Arc::new(HealthState { monitor, started: Instant::now() });
        let base = test_server::spawn(create_health_router(state)).await;

        let body: serde_json::Value = reqwest::get(format!("{}/health", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["bot"], "running");
        assert_eq!(body["server_status"], "offline");
        assert_eq!(body["languages"], serde_json::json!(["en", "es", "pt"]));
    }

    #[tokio::test]
    async fn test_taken_port_falls_back_to_next() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();
        let config = ServerConfig { host: "127.0.0.1".to_string(), port };

        match bind(&config).await {
            Ok(listener) => assert_eq!(listener.local_addr().unwrap().port(), port + 1),
            // port + 1 may itself be in use on a busy machine
            Err(e) => assert_eq!(e.kind(), ErrorKind::AddrInUse),
        }
    }
}
