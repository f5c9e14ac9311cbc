//! Builder for Typesense `filter_by` expressions.
//!
//! A [`Filter`] is a conjunction of clauses. Each clause is a numeric
//! comparison, an exact match or a disjunction of exact matches on one
//! field. Rendering joins clauses with ` && ` and wraps disjunctions in
//! parentheses:
//!
//! ```
//! use govbrnews_search::filter::Filter;
//!
//! let filter = Filter::new()
//!     .any_of("agency", ["MEC", "MS"])
//!     .at_least("published_year", 2023);
//!
//! assert_eq!(
//!     filter.render().as_deref(),
//!     Some("(agency:=MEC || agency:=MS) && published_year:>=2023"),
//! );
//! ```

use std::fmt;

/// Numeric comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// `:=`
    Eq,
    /// `:>=`
    Ge,
    /// `:<=`
    Le,
    /// `:<`
    Lt,
}

impl Comparison {
    fn as_str(self) -> &'static str {
        match self {
            Comparison::Eq => ":=",
            Comparison::Ge => ":>=",
            Comparison::Le => ":<=",
            Comparison::Lt => ":<",
        }
    }
}

/// A single filter clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// Numeric comparison on a field.
    Numeric {
        /// Field name.
        field: String,
        /// Operator.
        op: Comparison,
        /// Right-hand side.
        value: i64,
    },
    /// Exact string match.
    Exact {
        /// Field name.
        field: String,
        /// Escaped value.
        value: String,
    },
    /// Any of several exact string matches on one field.
    AnyOf {
        /// Field name.
        field: String,
        /// Escaped values.
        values: Vec<String>,
    },
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Numeric { field, op, value } => write!(f, "{field}{}{value}", op.as_str()),
            Clause::Exact { field, value } => write!(f, "{field}:={value}"),
            Clause::AnyOf { field, values } => {
                let alternatives: Vec<String> =
                    values.iter().map(|v| format!("{field}:={v}")).collect();
                write!(f, "({})", alternatives.join(" || "))
            }
        }
    }
}

/// Escape a string value for use on the right-hand side of `:=`.
pub fn escape_value(value: &str) -> String {
    value.replace(':', "\\:")
}

/// A conjunction of filter clauses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    clauses: Vec<Clause>,
}

impl Filter {
    /// Creates an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no clause was added.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// The clauses in insertion order.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    fn numeric(mut self, field: &str, op: Comparison, value: i64) -> Self {
        self.clauses.push(Clause::Numeric {
            field: field.to_string(),
            op,
            value,
        });
        self
    }

    /// `field:=value` for numeric fields.
    pub fn equals(self, field: &str, value: i64) -> Self {
        self.numeric(field, Comparison::Eq, value)
    }

    /// `field:>=value`.
    pub fn at_least(self, field: &str, value: i64) -> Self {
        self.numeric(field, Comparison::Ge, value)
    }

    /// `field:<=value`.
    pub fn at_most(self, field: &str, value: i64) -> Self {
        self.numeric(field, Comparison::Le, value)
    }

    /// `field:<value`.
    pub fn less_than(self, field: &str, value: i64) -> Self {
        self.numeric(field, Comparison::Lt, value)
    }

    /// Half-open range `start <= field < end`.
    pub fn half_open(self, field: &str, start: i64, end: i64) -> Self {
        self.at_least(field, start).less_than(field, end)
    }

    /// Inclusive bounds; `None` on either side leaves it open.
    pub fn between(self, field: &str, from: Option<i64>, to: Option<i64>) -> Self {
        let mut filter = self;
        if let Some(from) = from {
            filter = filter.at_least(field, from);
        }
        if let Some(to) = to {
            filter = filter.at_most(field, to);
        }
        filter
    }

    /// `field:=value` for string fields, escaping `:`.
    pub fn matches(mut self, field: &str, value: &str) -> Self {
        self.clauses.push(Clause::Exact {
            field: field.to_string(),
            value: escape_value(value),
        });
        self
    }

    /// `(field:=a || field:=b ...)`; no clause is added for an empty list.
    pub fn any_of<I, S>(mut self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let values: Vec<String> = values
            .into_iter()
            .map(|v| escape_value(v.as_ref()))
            .collect();
        if !values.is_empty() {
            self.clauses.push(Clause::AnyOf {
                field: field.to_string(),
                values,
            });
        }
        self
    }

    /// Appends every clause of `other`.
    pub fn and(mut self, other: &Filter) -> Self {
        self.clauses.extend(other.clauses.iter().cloned());
        self
    }

    /// Renders the expression, or `None` when empty.
    pub fn render(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.to_string())
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(" && ")?;
            }
            write!(f, "{clause}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_renders_none() {
        assert!(Filter::new().is_empty());
        assert_eq!(Filter::new().render(), None);
    }

    #[test]
    fn test_year_bounds() {
        let filter = Filter::new().between("published_year", Some(2020), Some(2024));
        assert_eq!(
            filter.to_string(),
            "published_year:>=2020 && published_year:<=2024"
        );
    }

    #[test]
    fn test_between_open_ends() {
        let only_from = Filter::new().between("published_year", Some(2020), None);
        assert_eq!(only_from.to_string(), "published_year:>=2020");
        let neither = Filter::new().between("published_year", None, None);
        assert!(neither.is_empty());
    }

    #[test]
    fn test_half_open_timestamp_window() {
        let filter = Filter::new().half_open("published_at", 1_700_000_000, 1_700_604_800);
        assert_eq!(
            filter.to_string(),
            "published_at:>=1700000000 && published_at:<1700604800"
        );
    }

    #[test]
    fn test_any_of_escapes_colons() {
        let filter = Filter::new().any_of("theme_1_level_1", ["Saúde: SUS", "Educação"]);
        assert_eq!(
            filter.to_string(),
            "(theme_1_level_1:=Saúde\\: SUS || theme_1_level_1:=Educação)"
        );
    }

    #[test]
    fn test_any_of_empty_is_noop() {
        let filter = Filter::new().any_of("agency", Vec::<String>::new());
        assert!(filter.is_empty());
    }

    #[test]
    fn test_monthly_bucket_filter() {
        let bounds = Filter::new().between("published_year", Some(2023), Some(2024));
        let filter = Filter::new()
            .equals("published_year", 2024)
            .equals("published_month", 3)
            .and(&bounds);
        assert_eq!(
            filter.to_string(),
            "published_year:=2024 && published_month:=3 && published_year:>=2023 && published_year:<=2024"
        );
        assert_eq!(filter.clauses().len(), 4);
    }

    #[test]
    fn test_matches() {
        let filter = Filter::new().matches("agency", "mec");
        assert_eq!(filter.render().as_deref(), Some("agency:=mec"));
    }
}
