//! Request normalisation.
//!
//! [`validate`] turns a raw [`TemporalRequest`] into a [`TemporalQuery`]
//! the planner can trust: the granularity is parsed and `max_periods` is
//! clamped to the granularity's cap. Clamping is logged, never an error.

use crate::error::TemporalError;
use crate::granularity::Granularity;

/// Number of periods returned when the caller does not say.
pub const DEFAULT_MAX_PERIODS: i64 = 24;

/// A temporal analysis as requested by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalRequest {
    /// Search query; `*` matches everything.
    pub query: String,
    /// Requested granularity name.
    pub granularity: String,
    /// Inclusive lower year bound.
    pub year_from: Option<i32>,
    /// Inclusive upper year bound.
    pub year_to: Option<i32>,
    /// Requested number of periods.
    pub max_periods: Option<i64>,
}

impl TemporalRequest {
    /// Creates a request with no year bounds and the default period count.
    pub fn new(query: impl Into<String>, granularity: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            granularity: granularity.into(),
            year_from: None,
            year_to: None,
            max_periods: None,
        }
    }

    /// Sets the year bounds.
    pub fn with_years(mut self, year_from: Option<i32>, year_to: Option<i32>) -> Self {
        self.year_from = year_from;
        self.year_to = year_to;
        self
    }

    /// Sets the requested number of periods.
    pub fn with_max_periods(mut self, max_periods: i64) -> Self {
        self.max_periods = Some(max_periods);
        self
    }
}

/// A validated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalQuery {
    /// Search query, never empty.
    pub query: String,
    /// Parsed granularity.
    pub granularity: Granularity,
    /// Inclusive lower year bound.
    pub year_from: Option<i32>,
    /// Inclusive upper year bound.
    pub year_to: Option<i32>,
    /// Effective number of periods, within `1..=granularity.period_cap()`.
    pub max_periods: u32,
}

/// Validates and normalises a request.
///
/// A blank query becomes `*`.
///
/// # Errors
///
/// Returns an invalid-input [`TemporalError`] if the granularity is unknown.
pub fn validate(request: &TemporalRequest) -> Result<TemporalQuery, TemporalError> {
    let granularity: Granularity = request.granularity.parse().map_err(|e| {
        TemporalError::invalid_input(
            format!("{e}"),
            request.granularity.clone(),
            request.query.clone(),
        )
    })?;

    let query = match request.query.trim() {
        "" => "*".to_string(),
        q => q.to_string(),
    };

    let requested = request.max_periods.unwrap_or(DEFAULT_MAX_PERIODS);
    let max_periods = clamp_periods(granularity, requested);

    Ok(TemporalQuery {
        query,
        granularity,
        year_from: request.year_from,
        year_to: request.year_to,
        max_periods,
    })
}

/// Clamps `requested` into `1..=granularity.period_cap()`.
pub fn clamp_periods(granularity: Granularity, requested: i64) -> u32 {
    let cap = granularity.period_cap();
    let clamped = requested.clamp(1, i64::from(cap));
    if clamped != requested {
        log::warn!("max_periods ajustado de {requested} para {clamped} ({granularity})");
    }
    // Within 1..=cap, so the conversion cannot fail.
    u32::try_from(clamped).unwrap_or(cap)
}
