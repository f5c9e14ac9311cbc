//! Buckets, distributions and their summary statistics.

use chrono::DateTime;
use chrono_tz::Tz;

use crate::granularity::Granularity;

/// A labelled half-open time range `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeBucket {
    /// Sort and identity key (`2024`, `2024-03`, `2024-W09`).
    pub period_key: String,
    /// Display label (`2024`, `Março/2024`, `Semana de 26/02/2024`).
    pub label: String,
    /// Inclusive start.
    pub start: DateTime<Tz>,
    /// Exclusive end.
    pub end: DateTime<Tz>,
}

/// Number of matching documents in a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketCount {
    /// The bucket.
    pub bucket: TimeBucket,
    /// Matching documents.
    pub count: u64,
}

/// Year bounds supplied by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YearFilters {
    /// Inclusive lower bound.
    pub year_from: Option<i32>,
    /// Inclusive upper bound.
    pub year_to: Option<i32>,
}

impl YearFilters {
    /// True if neither bound is set.
    pub fn is_empty(&self) -> bool {
        self.year_from.is_none() && self.year_to.is_none()
    }
}

/// Summary statistics over the buckets of a distribution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistributionStats {
    /// Number of buckets.
    pub period_count: usize,
    /// Mean count per bucket; `None` without buckets.
    pub mean: Option<f64>,
    /// Bucket with the highest count; the earliest wins ties.
    pub max: Option<BucketCount>,
    /// Bucket with the lowest count; the earliest wins ties.
    pub min: Option<BucketCount>,
}

impl DistributionStats {
    /// Computes statistics over buckets already in ascending order.
    pub fn compute(buckets: &[BucketCount]) -> Self {
        let Some(first) = buckets.first() else {
            return Self::default();
        };

        let mut max = first;
        let mut min = first;
        let mut sum: u64 = 0;
        for entry in buckets {
            sum += entry.count;
            if entry.count > max.count {
                max = entry;
            }
            if entry.count < min.count {
                min = entry;
            }
        }

        Self {
            period_count: buckets.len(),
            mean: Some(sum as f64 / buckets.len() as f64),
            max: Some(max.clone()),
            min: Some(min.clone()),
        }
    }
}

/// An ordered, capped histogram of matching documents over time.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    /// Bucket width.
    pub granularity: Granularity,
    /// Query the counts were computed for.
    pub query: String,
    /// Total matching documents reported for the whole request.
    pub total_found: u64,
    /// Buckets, ascending by `period_key`.
    pub buckets: Vec<BucketCount>,
    /// Year bounds as requested.
    pub filters: YearFilters,
    /// Range walked by weekly distributions.
    pub window: Option<(DateTime<Tz>, DateTime<Tz>)>,
    /// Advisory note shown above the table.
    pub note: Option<String>,
    /// Summary statistics over `buckets`.
    pub stats: DistributionStats,
}

impl Distribution {
    /// True if there are no buckets to show.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::Sao_Paulo;

    fn entry(key: &str, count: u64) -> BucketCount {
        let instant = Sao_Paulo.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        BucketCount {
            bucket: TimeBucket {
                period_key: key.to_string(),
                label: key.to_string(),
                start: instant,
                end: instant,
            },
            count,
        }
    }

    #[test]
    fn test_stats_empty() {
        let stats = DistributionStats::compute(&[]);
        assert_eq!(stats.period_count, 0);
        assert!(stats.mean.is_none());
        assert!(stats.max.is_none());
        assert!(stats.min.is_none());
    }

    #[test]
    fn test_stats_weekly_example() {
        let buckets = [entry("w1", 10), entry("w2", 30), entry("w3", 30), entry("w4", 5)];
        let stats = DistributionStats::compute(&buckets);
        assert_eq!(stats.period_count, 4);
        assert_eq!(stats.mean, Some(18.75));
        assert_eq!(stats.max.unwrap().bucket.period_key, "w2");
        assert_eq!(stats.min.unwrap().bucket.period_key, "w4");
    }

    #[test]
    fn test_stats_ties_take_first() {
        let buckets = [entry("a", 7), entry("b", 7), entry("c", 7)];
        let stats = DistributionStats::compute(&buckets);
        assert_eq!(stats.max.unwrap().bucket.period_key, "a");
        assert_eq!(stats.min.unwrap().bucket.period_key, "a");
    }

    #[test]
    fn test_stats_single_bucket() {
        let stats = DistributionStats::compute(&[entry("2024", 5000)]);
        assert_eq!(stats.mean, Some(5000.0));
        assert_eq!(stats.max.as_ref().unwrap().count, 5000);
        assert_eq!(stats.min.as_ref().unwrap().count, 5000);
    }

    #[test]
    fn test_year_filters_empty() {
        assert!(YearFilters::default().is_empty());
        let filters = YearFilters {
            year_from: Some(2020),
            year_to: None,
        };
        assert!(!filters.is_empty());
    }
}
