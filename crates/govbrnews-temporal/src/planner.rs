//! Bucket planning.
//!
//! The planner decides which queries a distribution needs. Yearly
//! distributions need a single faceted count; monthly and weekly ones need
//! one count per bucket, described by a [`PlannedBucket`]. Monthly planning
//! depends on which years the collection actually has, so it takes the
//! response of the discovery query (see [`TemporalBucketPlanner::discovery`]).
//!
//! Planning never reads the clock; `now` is always passed in.

use chrono::{DateTime, Datelike, TimeDelta, Utc};
use chrono_tz::Tz;

use govbrnews_search::{Filter, SearchResponse, fields};

use crate::calendar::{self, month_name};
use crate::distribution::TimeBucket;
use crate::request::TemporalQuery;

/// Facet values requested by the monthly discovery query.
pub const DISCOVERY_FACET_VALUES: u32 = 50;

/// A bucket together with the filter selecting its documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedBucket {
    /// The bucket.
    pub bucket: TimeBucket,
    /// Bucket predicate combined with the request's year bounds.
    pub filter: Filter,
}

/// The queries a distribution needs.
#[derive(Debug, Clone, PartialEq)]
pub enum BucketPlan {
    /// One faceted count on `published_year`.
    YearlyFacet {
        /// Year bounds.
        filter: Filter,
        /// Maximum number of years returned.
        max_values: u32,
    },
    /// One count per bucket, in chronological order.
    Grid {
        /// Buckets to count.
        buckets: Vec<PlannedBucket>,
        /// Total reported by discovery, if it ran.
        total_found: Option<u64>,
        /// Range walked, for weekly plans.
        window: Option<(DateTime<Tz>, DateTime<Tz>)>,
        /// Advisory note for the presenter.
        note: Option<String>,
    },
}

/// Plans buckets in a fixed time zone.
#[derive(Debug, Clone, Copy)]
pub struct TemporalBucketPlanner {
    timezone: Tz,
}

impl TemporalBucketPlanner {
    /// Creates a planner whose calendar boundaries fall in `timezone`.
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// The planning time zone.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// `published_year` bounds of a request.
    pub fn year_bounds(query: &TemporalQuery) -> Filter {
        Filter::new().between(
            fields::PUBLISHED_YEAR,
            query.year_from.map(i64::from),
            query.year_to.map(i64::from),
        )
    }

    // ------------------------------------------------------------------------
    // Yearly
    // ------------------------------------------------------------------------

    /// Plans a yearly distribution.
    pub fn plan_yearly(&self, query: &TemporalQuery) -> BucketPlan {
        BucketPlan::YearlyFacet {
            filter: Self::year_bounds(query),
            max_values: query.max_periods,
        }
    }

    /// Bucket covering calendar year `year`.
    pub fn year_bucket(&self, year: i32) -> Option<TimeBucket> {
        Some(TimeBucket {
            period_key: year.to_string(),
            label: year.to_string(),
            start: calendar::year_start(self.timezone, year)?,
            end: calendar::year_start(self.timezone, year + 1)?,
        })
    }

    // ------------------------------------------------------------------------
    // Monthly
    // ------------------------------------------------------------------------

    /// Facet fields, filter and facet cap of the monthly discovery query.
    pub fn discovery(query: &TemporalQuery) -> ([&'static str; 2], Filter, u32) {
        (
            [fields::PUBLISHED_YEAR, fields::PUBLISHED_MONTH],
            Self::year_bounds(query),
            DISCOVERY_FACET_VALUES,
        )
    }

    /// Plans a monthly distribution from the discovery response.
    pub fn plan_monthly(
        &self,
        query: &TemporalQuery,
        discovery: &SearchResponse,
        now: DateTime<Utc>,
    ) -> BucketPlan {
        let discovered: Vec<i32> = discovery
            .facet(fields::PUBLISHED_YEAR)
            .map(|facet| {
                facet
                    .counts
                    .iter()
                    .filter_map(|v| v.value.parse::<i32>().ok())
                    .collect()
            })
            .unwrap_or_default();

        let current_year = now.with_timezone(&self.timezone).year();
        let years = select_years(
            discovered,
            query.year_from,
            query.year_to,
            query.max_periods,
            current_year,
        );
        log::debug!("Monthly plan covers years {years:?}");

        let bounds = Self::year_bounds(query);
        let buckets = years
            .iter()
            .flat_map(|&year| (1..=12).map(move |month| (year, month)))
            .filter_map(|(year, month)| {
                let bucket = self.month_bucket(year, month)?;
                let filter = Filter::new()
                    .equals(fields::PUBLISHED_YEAR, i64::from(year))
                    .equals(fields::PUBLISHED_MONTH, i64::from(month))
                    .and(&bounds);
                Some(PlannedBucket { bucket, filter })
            })
            .collect();

        BucketPlan::Grid {
            buckets,
            total_found: Some(discovery.found),
            window: None,
            note: Some(format!(
                "Distribuição mensal limitada a {} períodos mais recentes",
                query.max_periods
            )),
        }
    }

    /// Bucket covering `month` of `year`.
    pub fn month_bucket(&self, year: i32, month: u32) -> Option<TimeBucket> {
        Some(TimeBucket {
            period_key: format!("{year}-{month:02}"),
            label: format!("{}/{year}", month_name(month)),
            start: calendar::month_start(self.timezone, year, month)?,
            end: calendar::next_month_start(self.timezone, year, month)?,
        })
    }

    // ------------------------------------------------------------------------
    // Weekly
    // ------------------------------------------------------------------------

    /// Plans a weekly distribution ending at `now`.
    ///
    /// Walks up to `max_periods` seven-day windows starting `max_periods`
    /// weeks before `now`. A `year_from` later than that start moves the
    /// start to January 1st; a `year_to` earlier than `now` moves the end to
    /// December 31st. The last window is cut at the end.
    pub fn plan_weekly(&self, query: &TemporalQuery, now: DateTime<Utc>) -> BucketPlan {
        let weeks = query.max_periods;
        let mut end = now.with_timezone(&self.timezone);
        let mut start = end - TimeDelta::weeks(i64::from(weeks));

        if let Some(year_from) = query.year_from
            && start.year() < year_from
            && let Some(floor) = calendar::year_start(self.timezone, year_from)
        {
            start = floor;
        }
        if let Some(year_to) = query.year_to
            && end.year() > year_to
            && let Some(cap) = calendar::year_end(self.timezone, year_to)
        {
            end = cap;
        }

        let bounds = Self::year_bounds(query);
        let mut buckets = Vec::new();
        let mut current = start;
        while current < end && buckets.len() < weeks as usize {
            let next = (current + TimeDelta::days(7)).min(end);
            let filter = Filter::new()
                .half_open(fields::PUBLISHED_AT, current.timestamp(), next.timestamp())
                .and(&bounds);
            buckets.push(PlannedBucket {
                bucket: TimeBucket {
                    period_key: current.format("%Y-W%W").to_string(),
                    label: format!("Semana de {}", current.format("%d/%m/%Y")),
                    start: current,
                    end: next,
                },
                filter,
            });
            current = next;
        }

        BucketPlan::Grid {
            buckets,
            total_found: None,
            window: Some((start, end)),
            note: Some(format!(
                "Distribuição semanal limitada a {weeks} semanas. Recomendado: <= 26 semanas"
            )),
        }
    }
}

/// Chooses the years a monthly distribution covers.
///
/// Years outside the bounds are dropped. When the remaining years hold more
/// months than `max_periods`, only the `ceil(max_periods / 12) + 1` most
/// recent are kept. An empty selection falls back to `current_year`.
pub fn select_years(
    mut discovered: Vec<i32>,
    year_from: Option<i32>,
    year_to: Option<i32>,
    max_periods: u32,
    current_year: i32,
) -> Vec<i32> {
    discovered.sort_unstable();
    discovered.dedup();
    discovered.retain(|&y| year_from.is_none_or(|from| y >= from) && year_to.is_none_or(|to| y <= to));

    if discovered.is_empty() {
        return vec![current_year];
    }

    if discovered.len() * 12 > max_periods as usize {
        let keep = (max_periods as usize).div_ceil(12) + 1;
        if discovered.len() > keep {
            discovered.drain(..discovered.len() - keep);
        }
    }
    discovered
}
