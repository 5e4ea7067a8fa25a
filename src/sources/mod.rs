pub mod hoops;
pub mod website;

use async_trait::async_trait;
use crate::models::PoolRecord;

/// Upstream that provides raw pool statistics.
#[async_trait]
pub trait PoolSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch_pools(&self) -> Result<Vec<PoolRecord>, SourceError>;
}

/// Upstream whose reachability is tracked by the availability monitor.
#[async_trait]
pub trait AvailabilityProbe: Send + Sync {
    fn target(&self) -> &str;
    async fn probe(&self) -> Result<(), SourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SourceError::UpstreamUnavailable(format!("timed out: {}", e))
        } else if e.is_decode() {
            SourceError::Parse(e.to_string())
        } else {
            SourceError::UpstreamUnavailable(e.to_string())
        }
    }
}

#[cfg(test)]
pub(crate) mod test_server {
    use async_trait::async_trait;
    use axum::Router;
    use std::net::SocketAddr;

    use super::{PoolSource, SourceError};
    use crate::models::{AvailabilityState, PoolRecord, StatusTransition};
    use crate::services::monitor::StatusSink;

    /// Pool source that always returns the same records.
    pub struct StaticPools(pub Vec<PoolRecord>);

    #[async_trait]
    impl PoolSource for StaticPools {
        fn name(&self) -> &'static str {
            "Static"
        }

        async fn fetch_pools(&self) -> Result<Vec<PoolRecord>, SourceError> {
            Ok(self.0.clone())
        }
    }

    /// Status sink that drops every transition.
    pub struct Silent;

    #[async_trait]
    impl StatusSink for Silent {
        async fn on_transition(&self, _transition: StatusTransition, _state: AvailabilityState) {}
    }

    /// Serves `app` on an ephemeral local port and returns its base URL.
    pub async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    /// A base URL on which nothing is listening.
    pub async fn closed_url() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }
}
