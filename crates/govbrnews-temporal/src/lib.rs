//! Temporal distribution of GovBRNews search results.
//!
//! Splits the documents matching a query into yearly, monthly or weekly
//! buckets and summarises the counts. The pipeline is:
//!
//! 1. [`request::validate`] normalises the request.
//! 2. [`planner::TemporalBucketPlanner`] decides which queries are needed.
//! 3. [`aggregator::TemporalAggregator`] runs them and merges the counts.
//! 4. [`presenter`] renders the result as Markdown.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use govbrnews_search::MockSearchBackend;
//! use govbrnews_temporal::{TemporalAggregator, TemporalRequest, presenter};
//!
//! # async fn run() {
//! let aggregator = TemporalAggregator::new(Arc::new(MockSearchBackend::new()));
//! let request = TemporalRequest::new("educação", "monthly").with_years(Some(2024), None);
//! let markdown = presenter::render(&aggregator.analyze(&request).await);
//! # }
//! ```

pub mod aggregator;
pub mod calendar;
pub mod distribution;
pub mod error;
pub mod granularity;
pub mod planner;
pub mod presenter;
pub mod request;

pub use aggregator::{TemporalAggregator, TemporalConfig};
pub use calendar::{Clock, FixedClock, SystemClock};
pub use distribution::{BucketCount, Distribution, DistributionStats, TimeBucket, YearFilters};
pub use error::{TemporalError, TemporalErrorKind};
pub use granularity::Granularity;
pub use planner::{BucketPlan, PlannedBucket, TemporalBucketPlanner};
pub use request::{TemporalQuery, TemporalRequest, validate};
