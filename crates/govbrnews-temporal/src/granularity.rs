//! Time granularity of a distribution.

use std::fmt;
use std::str::FromStr;

/// Width of the buckets a distribution is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    /// One bucket per calendar year.
    Yearly,
    /// One bucket per calendar month.
    Monthly,
    /// One bucket per seven-day window.
    Weekly,
}

impl Granularity {
    /// Every granularity, in the order they are documented to users.
    pub const ALL: [Granularity; 3] = [Self::Yearly, Self::Monthly, Self::Weekly];

    /// Wire name (`yearly`, `monthly`, `weekly`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yearly => "yearly",
            Self::Monthly => "monthly",
            Self::Weekly => "weekly",
        }
    }

    /// Upper bound on `max_periods`.
    pub fn period_cap(self) -> u32 {
        match self {
            Self::Yearly => 50,
            Self::Monthly => 60,
            Self::Weekly => 52,
        }
    }

    /// Short Portuguese description shown in help and error output.
    pub fn description(self) -> &'static str {
        match self {
            Self::Yearly => "Distribuição anual",
            Self::Monthly => "Distribuição mensal (recomendado)",
            Self::Weekly => "Distribuição semanal (máx 52 semanas)",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no granularity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Granularidade inválida: {0}. Use 'yearly', 'monthly' ou 'weekly'")]
pub struct UnknownGranularity(pub String);

impl FromStr for Granularity {
    type Err = UnknownGranularity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yearly" => Ok(Self::Yearly),
            "monthly" => Ok(Self::Monthly),
            "weekly" => Ok(Self::Weekly),
            other => Err(UnknownGranularity(other.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        for g in Granularity::ALL {
            assert_eq!(g.as_str().parse::<Granularity>().unwrap(), g);
        }
    }

    #[test]
    fn test_parse_invalid() {
        let err = "daily".parse::<Granularity>().unwrap_err();
        assert_eq!(err.0, "daily");
        assert!(err.to_string().contains("daily"));
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("Monthly".parse::<Granularity>().is_err());
    }

    #[test]
    fn test_period_caps() {
        assert_eq!(Granularity::Yearly.period_cap(), 50);
        assert_eq!(Granularity::Monthly.period_cap(), 60);
        assert_eq!(Granularity::Weekly.period_cap(), 52);
    }
}
