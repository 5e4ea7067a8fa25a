use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use super::{AvailabilityProbe, SourceError};

/// Reachability check of a website root. Only the status code matters.
pub struct WebsiteProbe {
    client: Client,
    url: String,
}

impl WebsiteProbe {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, SourceError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl AvailabilityProbe for WebsiteProbe {
    fn target(&self) -> &str {
        &self.url
    }

    async fn probe(&self) -> Result<(), SourceError> {
        let resp = self.client.get(&self.url).send().await?;

        if !resp.status().is_success() {
            return Err(SourceError::UpstreamUnavailable(format!("HTTP {}", resp.status())));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::test_server;
    use axum::{http::StatusCode, routing::get, Router};

    fn probe(url: &str) -> WebsiteProbe {
        WebsiteProbe::new(url, Duration::from_millis(500)).unwrap()
    }

    #[tokio::test]
    async fn test_success_status_is_reachable() {
        let base = test_server::spawn(Router::new().route("/", get(|| async { "<html></html>" }))).await;
        assert!(probe(&base).probe().await.is_ok());
    }

    #[tokio::test]
    async fn test_error_status_is_unreachable() {
        let app = Router::new().route("/", get(|| async { StatusCode::SERVICE_UNAVAILABLE }));
        let base = test_server::spawn(app).await;
        assert!(probe(&base).probe().await.is_err());
    }

    #[tokio::test]
    async fn test_refused_connection_is_unreachable() {
        let base = test_server::closed_url().await;
        let err = probe(&base).probe().await.unwrap_err();
        assert!(matches!(err, SourceError::UpstreamUnavailable(_)));
    }
}
