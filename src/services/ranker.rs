use crate::models::{PoolRecord, RankedPool};
use crate::sources::{hoops, PoolSource};
use super::filter::{parse_field, PoolFilter};
use super::format::format_usd;

/// Number of pools kept after sorting.
pub const TOP_POOLS: usize = 5;

/// Filters out inactive pools, sorts the rest by APR (highest first) and
/// keeps the top [`TOP_POOLS`].
pub fn rank(records: &[PoolRecord]) -> Vec<RankedPool> {
    let filter = PoolFilter::new();

    let mut active: Vec<(f64, &PoolRecord)> = records
        .iter()
        .filter(|r| filter.is_active(r))
        .filter_map(|r| parse_field(r.apr.as_deref()).map(|apr| (apr, r)))
        .collect();

    active.sort_by(|a, b| b.0.total_cmp(&a.0));
    active.truncate(TOP_POOLS);

    active.into_iter().map(|(_, r)| to_ranked(r)).collect()
}

fn to_ranked(record: &PoolRecord) -> RankedPool {
    let text = |field: &Option<String>| field.clone().unwrap_or_default();
    let usd = |field: &Option<String>| format_usd(Some(parse_field(field.as_deref()).unwrap_or(f64::NAN)));

    RankedPool {
        name: text(&record.market),
        apr: text(&record.apr),
        trending: text(&record.trending_apr),
        tvl: usd(&record.total_value_locked),
        volume: usd(&record.volume),
        protocol: text(&record.protocol),
        fees: usd(&record.fees),
        utilization: text(&record.utilization),
    }
}

/// Fetch, fall back if needed, and rank.
pub async fn best_pools(source: &dyn PoolSource) -> Vec<RankedPool> {
    let records = hoops::fetch_or_fallback(source).await;
    let ranked = rank(&records);
    tracing::info!("🏊 Ranked {} of {} pools", ranked.len(), records.len());
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::SourceError;
    use async_trait::async_trait;

    fn record(market: &str, apr: &str, tvl: &str) -> PoolRecord {
        PoolRecord {
            market: Some(market.to_string()),
            apr: Some(apr.to_string()),
            total_value_locked: Some(tvl.to_string()),
            ..Default::default()
        }
    }

    /// Reads a formatted currency string back into the upstream shape.
    fn unformat(usd: &str) -> String {
        usd.trim_start_matches('$').replace(',', "")
    }

    fn back_to_records(pools: &[RankedPool]) -> Vec<PoolRecord> {
        pools
            .iter()
            .map(|p| PoolRecord {
                market: Some(p.name.clone()),
                apr: Some(p.apr.clone()),
                trending_apr: Some(p.trending.clone()),
                total_value_locked: Some(unformat(&p.tvl)),
                volume: Some(unformat(&p.volume)),
                protocol: Some(p.protocol.clone()),
                fees: Some(unformat(&p.fees)),
                utilization: Some(p.utilization.clone()),
            })
            .collect()
    }

    #[test]
    fn test_only_funded_and_yielding_pools_survive() {
        let records = vec![
            record("A/B", "5.0", "100"),
            record("C/D", "10.0", "0"),
            record("E/F", "0", "50"),
        ];
        let ranked = rank(&records);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].name, "A/B");
        assert_eq!(ranked[0].apr, "5.0");
        assert_eq!(ranked[0].tvl, "$100.00");
    }

    #[test]
    fn test_sorted_by_numeric_apr_descending() {
        let records = vec![record("LOW", "8.5", "10"), record("HIGH", "12.0", "10")];
        let names: Vec<String> = rank(&records).into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["HIGH", "LOW"]);

        let records = vec![record("NINE", "9.5%", "10"), record("TEN", "10.0%", "10")];
        assert_eq!(rank(&records)[0].name, "TEN");
    }

    #[test]
    fn test_output_is_bounded_and_ordered() {
        let records: Vec<PoolRecord> = (1..=20)
            .map(|i| record(&format!("P{}", i), &format!("{}.25%", (i * 7) % 23), "1000"))
            .collect();
        let ranked = rank(&records);
        assert_eq!(ranked.len(), TOP_POOLS);

        let aprs: Vec<f64> = ranked
            .iter()
            .map(|p| parse_field(Some(&p.apr)).unwrap())
            .collect();
        assert!(aprs.windows(2).all(|w| w[0] >= w[1]));
        assert!(ranked.iter().all(|p| parse_field(Some(&p.apr)).unwrap() > 0.0));
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(rank(&[]).is_empty());
    }

    #[test]
    fn test_missing_numeric_fields_render_as_nan() {
        let ranked = rank(&[record("A/B", "3", "10")]);
        assert_eq!(ranked[0].volume, "$NaN");
        assert_eq!(ranked[0].fees, "$NaN");
        assert_eq!(ranked[0].trending, "");
    }

    #[test]
    fn test_reranking_ranked_output_is_stable() {
        let records = vec![
            record("A", "4.0%", "1200.5"),
            record("B", "11%", "99999.99"),
            record("C", "0.5", "1"),
            record("D", "7.25", "3000000"),
            record("E", "2", "0"),
            record("F", "6", "10"),
            record("G", "3", "10"),
        ];
        let once = rank(&records);
        let twice = rank(&back_to_records(&once));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_fallback_pools_pass_the_filter() {
        let ranked = rank(&hoops::fallback_records());
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].name, "native/USDx");
        assert_eq!(ranked[0].tvl, "$1,868,990.77");
        assert_eq!(ranked[1].name, "native/EURC");
        assert_eq!(ranked[1].volume, "$183,882.84");
        assert_eq!(ranked[1].fees, "$551.65");
    }

    struct Unreachable;

    #[async_trait]
    impl PoolSource for Unreachable {
        fn name(&self) -> &'static str {
            "Unreachable"
        }

        async fn fetch_pools(&self) -> Result<Vec<PoolRecord>, SourceError> {
            Err(SourceError::UpstreamUnavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_best_pools_degrades_to_fallback() {
        let pools = best_pools(&Unreachable).await;
        assert_eq!(pools.len(), 2);
        assert_eq!(pools[0].apr, "1.35%");
    }
}
