use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use crate::models::PoolRecord;
use super::{PoolSource, SourceError};

/// Served when the statistics endpoint cannot be reached.
pub const FALLBACK_POOLS: [FallbackPool; 2] = [
    FallbackPool {
        market: "native/USDx",
        apr: "1.35%",
        trending_apr: "0.00%",
        total_value_locked: "1868990.77",
        volume: "0",
        protocol: "soroswap",
        fees: "0",
        utilization: "0.00%",
    },
    FallbackPool {
        market: "native/EURC",
        apr: "0.80%",
        trending_apr: "1.08%",
        total_value_locked: "623489.11",
        volume: "183882.84",
        protocol: "soroswap",
        fees: "551.65",
        utilization: "29.49%",
    },
];

#[derive(Debug, Clone, Copy)]
pub struct FallbackPool {
    pub market: &'static str,
    pub apr: &'static str,
    pub trending_apr: &'static str,
    pub total_value_locked: &'static str,
    pub volume: &'static str,
    pub protocol: &'static str,
    pub fees: &'static str,
    pub utilization: &'static str,
}

impl From<&FallbackPool> for PoolRecord {
    fn from(p: &FallbackPool) -> Self {
        Self {
            market: Some(p.market.to_string()),
            apr: Some(p.apr.to_string()),
            trending_apr: Some(p.trending_apr.to_string()),
            total_value_locked: Some(p.total_value_locked.to_string()),
            volume: Some(p.volume.to_string()),
            protocol: Some(p.protocol.to_string()),
            fees: Some(p.fees.to_string()),
            utilization: Some(p.utilization.to_string()),
        }
    }
}

pub fn fallback_records() -> Vec<PoolRecord> {
    FALLBACK_POOLS.iter().map(PoolRecord::from).collect()
}

/// Fetches from `source`, degrading to [`FALLBACK_POOLS`] on any error.
pub async fn fetch_or_fallback(source: &dyn PoolSource) -> Vec<PoolRecord> {
    match source.fetch_pools().await {
        Ok(records) => {
            tracing::debug!("📥 {} returned {} pool records", source.name(), records.len());
            records
        }
        Err(e) => {
            tracing::warn!("❌ {} failed, serving fallback pools: {}", source.name(), e);
            fallback_records()
        }
    }
}

/// Client for the Hoops Finance statistics API.
pub struct HoopsApi {
    client: Client,
    base_url: String,
}

impl HoopsApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SourceError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PoolSource for HoopsApi {
    fn name(&self) -> &'static str {
        "HoopsFinance"
    }

    async fn fetch_pools(&self) -> Result<Vec<PoolRecord>, SourceError> {
        let url = format!("{}/getstatistics", self.base_url);

        let resp = self.client.get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(SourceError::UpstreamUnavailable(format!("HTTP {}", resp.status())));
        }

        // Elements that are not objects become empty records and fall out at the filter
        let values: Vec<serde_json::Value> = resp.json().await?;
        let records = values.into_iter()
            .map(|v| serde_json::from_value(v).unwrap_or_default())
            .collect();

        Ok(records)
    }
}
