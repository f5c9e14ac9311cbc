//! Distribution assembly.
//!
//! [`TemporalAggregator`] runs a validated request through the planner,
//! issues the planned queries against a [`SearchBackend`] and merges the
//! answers into a [`Distribution`].
//!
//! Failure policy: a failing per-bucket count is logged and that bucket is
//! skipped. A failing yearly facet or monthly discovery query fails the
//! whole request.

use std::sync::Arc;

use chrono_tz::Tz;
use futures::future;
use futures::stream::{self, StreamExt};

use govbrnews_search::{Filter, SearchBackend, fields};

use crate::calendar::{Clock, SystemClock};
use crate::distribution::{BucketCount, Distribution, DistributionStats, YearFilters};
use crate::error::TemporalError;
use crate::granularity::Granularity;
use crate::planner::{BucketPlan, PlannedBucket, TemporalBucketPlanner};
use crate::request::{TemporalQuery, TemporalRequest, validate};

/// Default number of bucket queries in flight at once.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Tuning for the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalConfig {
    /// Time zone in which calendar boundaries are computed.
    pub timezone: Tz,
    /// Bucket queries in flight at once (at least 1).
    pub max_concurrency: usize,
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::America::Sao_Paulo,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

/// Builds temporal distributions from a search backend.
#[derive(Clone)]
pub struct TemporalAggregator {
    backend: Arc<dyn SearchBackend>,
    clock: Arc<dyn Clock>,
    planner: TemporalBucketPlanner,
    max_concurrency: usize,
}

impl TemporalAggregator {
    /// Creates an aggregator with default settings and the system clock.
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        let config = TemporalConfig::default();
        Self {
            backend,
            clock: Arc::new(SystemClock),
            planner: TemporalBucketPlanner::new(config.timezone),
            max_concurrency: config.max_concurrency,
        }
    }

    /// Applies time zone and concurrency settings.
    pub fn with_config(mut self, config: TemporalConfig) -> Self {
        self.planner = TemporalBucketPlanner::new(config.timezone);
        self.max_concurrency = config.max_concurrency.max(1);
        self
    }

    /// Replaces the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Validates `request` and builds its distribution.
    ///
    /// # Errors
    ///
    /// Returns a [`TemporalError`] for an invalid granularity or when a query
    /// the whole distribution depends on fails.
    pub async fn analyze(&self, request: &TemporalRequest) -> Result<Distribution, TemporalError> {
        let query = validate(request)?;
        log::info!(
            "Analyzing temporal distribution: query='{}', granularity={}, year_from={:?}, year_to={:?}, max_periods={}",
            query.query,
            query.granularity,
            query.year_from,
            query.year_to,
            query.max_periods
        );

        self.aggregate(&query).await.map_err(|e| {
            log::error!("Error getting temporal distribution: {e}");
            TemporalError::classify(&e, query.granularity, query.query.clone())
        })
    }

    /// Builds the distribution of an already validated query.
    ///
    /// # Errors
    ///
    /// Fails if the yearly facet query or the monthly discovery query fails.
    pub async fn aggregate(&self, query: &TemporalQuery) -> govbrnews_core::Result<Distribution> {
        let now = self.clock.now();
        let plan = match query.granularity {
            Granularity::Yearly => self.planner.plan_yearly(query),
            Granularity::Monthly => {
                let (facets, filter, max_values) = TemporalBucketPlanner::discovery(query);
                let discovery = self
                    .backend
                    .faceted_count(&query.query, &facets, &filter, max_values)
                    .await?;
                self.planner.plan_monthly(query, &discovery, now)
            }
            Granularity::Weekly => self.planner.plan_weekly(query, now),
        };
        self.execute(query, plan).await
    }

    async fn execute(
        &self,
        query: &TemporalQuery,
        plan: BucketPlan,
    ) -> govbrnews_core::Result<Distribution> {
        let (buckets, total_found, window, note) = match plan {
            BucketPlan::YearlyFacet { filter, max_values } => {
                let (buckets, found) = self.count_years(&query.query, &filter, max_values).await?;
                (buckets, found, None, None)
            }
            BucketPlan::Grid {
                buckets,
                total_found,
                window,
                note,
            } => {
                let mut counted = self.count_buckets(&query.query, buckets).await;
                if query.granularity != Granularity::Weekly {
                    counted.retain(|b| b.count > 0);
                }
                let total = total_found.unwrap_or_else(|| counted.iter().map(|b| b.count).sum());
                (counted, total, window, note)
            }
        };

        let buckets = order_and_cap(buckets, query.max_periods as usize);
        let stats = DistributionStats::compute(&buckets);

        Ok(Distribution {
            granularity: query.granularity,
            query: query.query.clone(),
            total_found,
            buckets,
            filters: YearFilters {
                year_from: query.year_from,
                year_to: query.year_to,
            },
            window,
            note,
            stats,
        })
    }

    async fn count_years(
        &self,
        query: &str,
        filter: &Filter,
        max_values: u32,
    ) -> govbrnews_core::Result<(Vec<BucketCount>, u64)> {
        let response = self
            .backend
            .faceted_count(query, &[fields::PUBLISHED_YEAR], filter, max_values)
            .await?;

        let mut buckets = Vec::new();
        if let Some(facet) = response.facet(fields::PUBLISHED_YEAR) {
            for value in facet.counts.iter().filter(|v| v.count > 0) {
                let Ok(year) = value.value.parse::<i32>() else {
                    log::warn!("Ignoring non-numeric year facet value '{}'", value.value);
                    continue;
                };
                if let Some(bucket) = self.planner.year_bucket(year) {
                    buckets.push(BucketCount {
                        bucket,
                        count: value.count,
                    });
                }
            }
        }
        Ok((buckets, response.found))
    }

    /// Counts every planned bucket, skipping those whose query fails.
    async fn count_buckets(&self, query: &str, planned: Vec<PlannedBucket>) -> Vec<BucketCount> {
        let backend = &self.backend;
        stream::iter(planned)
            .map(move |planned| async move {
                match backend.count(query, &planned.filter).await {
                    Ok(count) => Some(BucketCount {
                        bucket: planned.bucket,
                        count,
                    }),
                    Err(e) => {
                        log::warn!(
                            "Error getting count for {}: {e}",
                            planned.bucket.period_key
                        );
                        None
                    }
                }
            })
            .buffered(self.max_concurrency.max(1))
            .filter_map(future::ready)
            .collect()
            .await
    }
}

/// Sorts buckets chronologically and keeps the most recent `max_periods`.
///
/// Ordering by `start` equals ordering by `period_key` for the yearly,
/// monthly and weekly key formats; the key only breaks ties.
fn order_and_cap(mut buckets: Vec<BucketCount>, max_periods: usize) -> Vec<BucketCount> {
    buckets.sort_by(|a, b| {
        a.bucket
            .start
            .cmp(&b.bucket.start)
            .then_with(|| a.bucket.period_key.cmp(&b.bucket.period_key))
    });
    if buckets.len() > max_periods {
        buckets.drain(..buckets.len() - max_periods);
    }
    buckets
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::calendar::FixedClock;
    use crate::error::TemporalErrorKind;
    use chrono::{TimeZone, Utc};
    use govbrnews_search::{MockSearchBackend, SearchParams, SearchResponse};
    use std::time::Duration;

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2025, 6, 18, 15, 0, 0).unwrap()))
    }

    fn aggregator(backend: &MockSearchBackend) -> TemporalAggregator {
        TemporalAggregator::new(Arc::new(backend.clone())).with_clock(clock())
    }

    fn is_discovery(p: &SearchParams) -> bool {
        p.facet_by.as_deref() == Some("published_year,published_month")
    }

    fn has_clause(p: &SearchParams, clause: &str) -> bool {
        p.filter_by
            .as_deref()
            .is_some_and(|f| f.split(" && ").any(|c| c == clause))
    }

    fn keys(d: &Distribution) -> Vec<String> {
        d.buckets.iter().map(|b| b.bucket.period_key.clone()).collect()
    }

    fn assert_ascending_unique(d: &Distribution) {
        let keys = keys(d);
        let mut sorted = keys.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(keys, sorted);
    }

    // ------------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_invalid_granularity_makes_no_backend_call() {
        let backend = MockSearchBackend::new();
        let err = aggregator(&backend)
            .analyze(&TemporalRequest::new("saúde", "daily"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, TemporalErrorKind::InvalidInput);
        assert_eq!(backend.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_max_periods_clamped_before_backend_call() {
        let backend = MockSearchBackend::new();
        aggregator(&backend)
            .analyze(&TemporalRequest::new("*", "yearly").with_max_periods(1000))
            .await
            .unwrap();
        let calls = backend.calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].max_facet_values, Some(50));

        let backend = MockSearchBackend::new();
        let d = aggregator(&backend)
            .analyze(&TemporalRequest::new("*", "weekly").with_max_periods(1000))
            .await
            .unwrap();
        assert_eq!(d.buckets.len(), 52);
        assert_eq!(backend.call_count().await, 52);
    }

    #[tokio::test]
    async fn test_monthly_clamped_to_sixty() {
        let years: Vec<(i32, u64)> = (2015..=2025).map(|y| (y, 100)).collect();
        let backend = MockSearchBackend::new()
            .respond_when(
                is_discovery,
                SearchResponse::with_found(1100).with_facet("published_year", &years),
            )
            .with_fallback(SearchResponse::with_found(3));
        let d = aggregator(&backend)
            .analyze(&TemporalRequest::new("*", "monthly").with_max_periods(1000))
            .await
            .unwrap();
        assert_eq!(d.buckets.len(), 60);
        assert_eq!(d.buckets.last().unwrap().bucket.period_key, "2025-12");
        assert!(d.note.unwrap().contains("60 períodos"));
    }

    // ------------------------------------------------------------------------
    // Yearly
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_yearly_single_year_example() {
        let backend = MockSearchBackend::new().respond_when(
            |p| p.facet_by.as_deref() == Some("published_year"),
            SearchResponse::with_found(5000).with_facet("published_year", &[(2024, 5000)]),
        );
        let request =
            TemporalRequest::new("educação", "yearly").with_years(Some(2024), Some(2024));
        let d = aggregator(&backend).analyze(&request).await.unwrap();

        assert_eq!(d.granularity, Granularity::Yearly);
        assert_eq!(d.total_found, 5000);
        assert_eq!(keys(&d), vec!["2024"]);
        assert_eq!(d.stats.mean, Some(5000.0));
        assert_eq!(d.stats.max.as_ref().unwrap().bucket.period_key, "2024");
        assert_eq!(d.stats.min.as_ref().unwrap().count, 5000);
        assert!(d.note.is_none());

        let calls = backend.calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].filter_by.as_deref(),
            Some("published_year:>=2024 && published_year:<=2024")
        );
        assert_eq!(calls[0].per_page, 0);
    }

    #[tokio::test]
    async fn test_yearly_sorted_numerically_and_zero_dropped() {
        let backend = MockSearchBackend::new().with_fallback(
            SearchResponse::with_found(60).with_facet(
                "published_year",
                &[("2024", 30), ("2019", 20), ("2021", 0), ("2022", 10)],
            ),
        );
        let d = aggregator(&backend)
            .analyze(&TemporalRequest::new("*", "yearly"))
            .await
            .unwrap();
        assert_eq!(keys(&d), vec!["2019", "2022", "2024"]);
        assert_ascending_unique(&d);
    }

    #[tokio::test]
    async fn test_yearly_failure_is_total_error() {
        let backend = MockSearchBackend::new().fail_when(|_| true, "connection refused");
        let err = aggregator(&backend)
            .analyze(&TemporalRequest::new("saúde", "yearly"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, TemporalErrorKind::Backend);
        assert_eq!(err.granularity, "yearly");
        assert_eq!(err.query, "saúde");
        assert!(err.message.contains("connection refused"));
    }

    // ------------------------------------------------------------------------
    // Monthly
    // ------------------------------------------------------------------------

    fn monthly_backend() -> MockSearchBackend {
        MockSearchBackend::new()
            .respond_when(
                is_discovery,
                SearchResponse::with_found(780).with_facet("published_year", &[(2024, 780)]),
            )
            .respond_when(
                |p| has_clause(p, "published_month:=2"),
                SearchResponse::with_found(0),
            )
            .with_fallback(SearchResponse::with_found(65))
    }

    #[tokio::test]
    async fn test_monthly_drops_zero_months() {
        let backend = monthly_backend();
        let d = aggregator(&backend)
            .analyze(&TemporalRequest::new("*", "monthly").with_max_periods(12))
            .await
            .unwrap();

        assert_eq!(d.total_found, 780);
        assert_eq!(d.buckets.len(), 11);
        assert!(!keys(&d).contains(&"2024-02".to_string()));
        assert_eq!(d.buckets[0].bucket.label, "Janeiro/2024");
        assert_ascending_unique(&d);
        // discovery + 12 months
        assert_eq!(backend.call_count().await, 13);
    }

    #[tokio::test]
    async fn test_monthly_bucket_failure_is_partial() {
        let backend = MockSearchBackend::new()
            .respond_when(
                is_discovery,
                SearchResponse::with_found(1200).with_facet("published_year", &[(2024, 1200)]),
            )
            .fail_when(|p| has_clause(p, "published_month:=7"), "timeout")
            .with_fallback(SearchResponse::with_found(100));

        let d = aggregator(&backend)
            .analyze(&TemporalRequest::new("*", "monthly").with_max_periods(12))
            .await
            .unwrap();
        assert!(d.buckets.len() <= 11);
        assert!(!keys(&d).contains(&"2024-07".to_string()));
    }

    #[tokio::test]
    async fn test_monthly_discovery_failure_is_total_error() {
        let backend = MockSearchBackend::new()
            .fail_when(is_discovery, "engine down")
            .with_fallback(SearchResponse::with_found(5));
        let err = aggregator(&backend)
            .analyze(&TemporalRequest::new("*", "monthly"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, TemporalErrorKind::Backend);
        assert_eq!(backend.call_count().await, 1);
    }

    #[tokio::test]
    async fn test_monthly_tail_truncated_to_most_recent() {
        let backend = MockSearchBackend::new()
            .respond_when(
                is_discovery,
                SearchResponse::with_found(900)
                    .with_facet("published_year", &[(2023, 300), (2024, 300), (2025, 300)]),
            )
            .with_fallback(SearchResponse::with_found(10));
        let d = aggregator(&backend)
            .analyze(&TemporalRequest::new("*", "monthly").with_max_periods(6))
            .await
            .unwrap();
        assert_eq!(
            keys(&d),
            vec!["2025-07", "2025-08", "2025-09", "2025-10", "2025-11", "2025-12"]
        );
    }

    #[tokio::test]
    async fn test_monthly_empty_dataset_queries_current_year() {
        let backend = MockSearchBackend::new();
        let d = aggregator(&backend)
            .analyze(&TemporalRequest::new("inexistente", "monthly"))
            .await
            .unwrap();
        assert!(d.is_empty());
        assert_eq!(d.total_found, 0);
        let calls = backend.calls().await;
        assert_eq!(calls.len(), 13);
        assert!(has_clause(&calls[1], "published_year:=2025"));
    }

    // ------------------------------------------------------------------------
    // Weekly
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_weekly_keeps_zero_counts() {
        let backend = MockSearchBackend::new();
        for n in [1, 7, 52] {
            let d = aggregator(&backend)
                .analyze(&TemporalRequest::new("*", "weekly").with_max_periods(n))
                .await
                .unwrap();
            assert_eq!(d.buckets.len(), n as usize);
            assert!(d.buckets.iter().all(|b| b.count == 0));
            assert_ascending_unique(&d);
        }
    }

    #[tokio::test]
    async fn test_weekly_statistics_example() {
        let backend = MockSearchBackend::new();
        let agg = aggregator(&backend);
        let query = validate(&TemporalRequest::new("*", "weekly").with_max_periods(4)).unwrap();
        let BucketPlan::Grid { buckets, .. } = agg.planner.plan_weekly(&query, clock().now()) else {
            unreachable!()
        };
        let counts = [10, 30, 30, 5];
        let mut backend = MockSearchBackend::new();
        for (planned, count) in buckets.iter().zip(counts) {
            let filter = planned.filter.to_string();
            backend = backend.respond_when(
                move |p| p.filter_by.as_deref() == Some(filter.as_str()),
                SearchResponse::with_found(count),
            );
        }

        let d = aggregator(&backend).aggregate(&query).await.unwrap();
        assert_eq!(d.total_found, 75);
        assert_eq!(d.stats.mean, Some(18.75));
        assert_eq!(d.stats.max.as_ref().unwrap().bucket, buckets[1].bucket);
        assert_eq!(d.stats.min.as_ref().unwrap().bucket, buckets[3].bucket);
        assert!(d.window.is_some());
        assert!(d.note.unwrap().contains("4 semanas"));
    }

    #[tokio::test]
    async fn test_weekly_bucket_failure_skipped() {
        let backend = MockSearchBackend::new()
            .fail_when(|_| true, "boom")
            .with_fallback(SearchResponse::with_found(1));
        let d = aggregator(&backend)
            .analyze(&TemporalRequest::new("*", "weekly").with_max_periods(3))
            .await
            .unwrap();
        assert!(d.is_empty());
        assert_eq!(d.total_found, 0);
    }

    // ------------------------------------------------------------------------
    // Concurrency
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_bucket_queries_bounded() {
        let backend = MockSearchBackend::new().with_latency(Duration::from_millis(5));
        let agg = aggregator(&backend).with_config(TemporalConfig {
            max_concurrency: 3,
            ..TemporalConfig::default()
        });
        let d = agg
            .analyze(&TemporalRequest::new("*", "weekly").with_max_periods(12))
            .await
            .unwrap();
        assert_eq!(d.buckets.len(), 12);
        assert!(backend.peak_in_flight() <= 3);
        assert_ascending_unique(&d);
    }

    #[test]
    fn test_order_and_cap_keeps_tail() {
        let planner = TemporalBucketPlanner::new(chrono_tz::America::Sao_Paulo);
        let buckets: Vec<BucketCount> = [2025, 2023, 2024]
            .into_iter()
            .map(|y| BucketCount {
                bucket: planner.year_bucket(y).unwrap(),
                count: 1,
            })
            .collect();
        let kept = order_and_cap(buckets, 2);
        let keys: Vec<_> = kept.iter().map(|b| b.bucket.period_key.as_str()).collect();
        assert_eq!(keys, vec!["2024", "2025"]);
    }

    #[test]
    fn test_order_and_cap_matches_period_key_order() {
        let planner = TemporalBucketPlanner::new(chrono_tz::America::Sao_Paulo);
        let buckets: Vec<BucketCount> = [(2024, 12), (2023, 1), (2024, 2), (2023, 11)]
            .into_iter()
            .map(|(y, m)| BucketCount {
                bucket: planner.month_bucket(y, m).unwrap(),
                count: 1,
            })
            .collect();
        let mut by_key: Vec<String> = buckets.iter().map(|b| b.bucket.period_key.clone()).collect();
        by_key.sort();

        let kept = order_and_cap(buckets, 10);
        let keys: Vec<String> = kept.iter().map(|b| b.bucket.period_key.clone()).collect();
        assert_eq!(keys, by_key);
        assert_eq!(keys[0], "2023-01");
    }
}
