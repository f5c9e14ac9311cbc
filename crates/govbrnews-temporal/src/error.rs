//! Aggregation-level failures.

use std::fmt;

/// What kind of failure ended a temporal analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalErrorKind {
    /// The request was rejected before any backend call.
    InvalidInput,
    /// A query the whole distribution depends on failed.
    Backend,
}

/// A temporal analysis that produced no distribution.
///
/// Carries the requested granularity and query verbatim so the error block
/// can echo exactly what the caller asked for.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TemporalError {
    /// Failure kind.
    pub kind: TemporalErrorKind,
    /// Human-readable message.
    pub message: String,
    /// Granularity as requested.
    pub granularity: String,
    /// Query as requested.
    pub query: String,
}

impl TemporalError {
    /// Creates an invalid-input error.
    pub fn invalid_input(
        message: impl Into<String>,
        granularity: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            kind: TemporalErrorKind::InvalidInput,
            message: message.into(),
            granularity: granularity.into(),
            query: query.into(),
        }
    }

    /// Classifies a workspace error raised while aggregating.
    ///
    /// Invalid input stays invalid input; everything else is reported as a
    /// backend failure.
    pub fn classify(
        error: &govbrnews_core::Error,
        granularity: impl fmt::Display,
        query: impl Into<String>,
    ) -> Self {
        let kind = if error.is_invalid_input() {
            TemporalErrorKind::InvalidInput
        } else {
            TemporalErrorKind::Backend
        };
        Self {
            kind,
            message: error.to_string(),
            granularity: granularity.to_string(),
            query: query.into(),
        }
    }

    /// True if the request itself was at fault.
    pub fn is_invalid_input(&self) -> bool {
        self.kind == TemporalErrorKind::InvalidInput
    }
}
