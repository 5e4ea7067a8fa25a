use serde::{Deserialize, Deserializer, Serialize};

/// One element of the `/getstatistics` array, as delivered upstream.
///
/// Every field is optional and numeric fields stay as text; parsing happens
/// in the ranker so that malformed values are excluded instead of rejected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PoolRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub market: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub apr: Option<String>,
    #[serde(default, rename = "trendingapr", deserialize_with = "lenient_text")]
    pub trending_apr: Option<String>,
    #[serde(default, rename = "totalValueLocked", deserialize_with = "lenient_text")]
    pub total_value_locked: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub volume: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub protocol: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub fees: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub utilization: Option<String>,
}

/// Accepts strings, numbers and booleans as text; anything else reads as absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Display-ready pool, produced only by the ranker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPool {
    pub name: String,
    pub apr: String,
    pub trending: String,
    pub tvl: String,
    pub volume: String,
    pub protocol: String,
    pub fees: String,
    pub utilization: String,
}
