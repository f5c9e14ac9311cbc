//! Common types for talking to the search engine.
//!
//! These mirror the subset of the Typesense search API the server uses:
//! request parameters, the search response (hits and facet counts), the
//! news document schema and collection metadata.

use serde::{Deserialize, Serialize};

use crate::filter::Filter;

// ============================================================================
// Schema
// ============================================================================

/// Field names of the `news` collection.
pub mod fields {
    /// Document title (full-text).
    pub const TITLE: &str = "title";
    /// Document body (full-text).
    pub const CONTENT: &str = "content";
    /// Publishing agency (facetable).
    pub const AGENCY: &str = "agency";
    /// Publication instant, unix seconds.
    pub const PUBLISHED_AT: &str = "published_at";
    /// Publication year (facetable).
    pub const PUBLISHED_YEAR: &str = "published_year";
    /// Publication month, 1-12 (facetable).
    pub const PUBLISHED_MONTH: &str = "published_month";
    /// Top-level theme (facetable).
    pub const THEME: &str = "theme_1_level_1";
    /// Publication category (facetable).
    pub const CATEGORY: &str = "category";
}

/// Fields matched by free-text queries.
pub const DEFAULT_QUERY_BY: &str = "title,content";

// ============================================================================
// Request
// ============================================================================

/// Ordering applied to search hits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Engine relevance ranking.
    #[default]
    Relevant,
    /// Most recent first.
    Newest,
    /// Oldest first.
    Oldest,
}

impl SortOrder {
    /// The `sort_by` expression for this order, if any.
    pub fn sort_by(self) -> Option<&'static str> {
        match self {
            SortOrder::Relevant => None,
            SortOrder::Newest => Some("published_at:desc"),
            SortOrder::Oldest => Some("published_at:asc"),
        }
    }
}

/// Parameters for a single search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Query text; `*` matches everything.
    pub q: String,

    /// Comma-separated fields the query is matched against.
    pub query_by: String,

    /// Rendered `filter_by` expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_by: Option<String>,

    /// Comma-separated facet fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facet_by: Option<String>,

    /// Hits per page; 0 returns only counts.
    pub per_page: u32,

    /// Maximum values returned per facet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_facet_values: Option<u32>,

    /// Sort expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
}

impl SearchParams {
    /// Creates search parameters for `query` with engine defaults.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            q: query.into(),
            query_by: DEFAULT_QUERY_BY.to_string(),
            filter_by: None,
            facet_by: None,
            per_page: 10,
            max_facet_values: None,
            sort_by: None,
        }
    }

    /// Applies a filter; empty filters leave `filter_by` unset.
    pub fn with_filter(mut self, filter: &Filter) -> Self {
        self.filter_by = filter.render();
        self
    }

    /// Requests facet counts for the given fields.
    pub fn with_facets(mut self, facet_fields: &[&str]) -> Self {
        if !facet_fields.is_empty() {
            self.facet_by = Some(facet_fields.join(","));
        }
        self
    }

    /// Sets the number of hits returned.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Caps the number of values per facet.
    pub fn with_max_facet_values(mut self, max: u32) -> Self {
        self.max_facet_values = Some(max);
        self
    }

    /// Sets the ordering of hits.
    pub fn with_sort(mut self, order: SortOrder) -> Self {
        self.sort_by = order.sort_by().map(str::to_string);
        self
    }

    /// Query-string pairs for the HTTP search endpoint.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("q", self.q.clone()),
            ("query_by", self.query_by.clone()),
            ("per_page", self.per_page.to_string()),
        ];
        if let Some(filter) = &self.filter_by {
            pairs.push(("filter_by", filter.clone()));
        }
        if let Some(facets) = &self.facet_by {
            pairs.push(("facet_by", facets.clone()));
        }
        if let Some(max) = self.max_facet_values {
            pairs.push(("max_facet_values", max.to_string()));
        }
        if let Some(sort) = &self.sort_by {
            pairs.push(("sort_by", sort.clone()));
        }
        pairs
    }
}

// ============================================================================
// Response
// ============================================================================

/// A news document as stored in the collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsDocument {
    /// Engine document ID.
    pub id: String,
    /// Stable identifier from the scraper.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
    /// Headline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Full body text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Publishing agency.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agency: Option<String>,
    /// Publication instant, unix seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<i64>,
    /// Publication year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,
    /// Publication month (1-12).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_month: Option<u32>,
    /// Category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Top-level theme.
    #[serde(rename = "theme_1_level_1", skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    /// Canonical URL on gov.br.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Lead image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl NewsDocument {
    /// Creates a document with only an ID set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// One search hit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// The matched document.
    #[serde(default)]
    pub document: NewsDocument,
}

/// One value of a facet histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetValue {
    /// Facet value; the engine reports every value as a string.
    pub value: String,
    /// Number of matching documents with this value.
    pub count: u64,
}

/// Facet histogram for one field, ordered by descending count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCounts {
    /// Field the histogram was computed on.
    pub field_name: String,
    /// Value counts.
    #[serde(default)]
    pub counts: Vec<FacetValue>,
}

/// Result of a search request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResponse {
    /// Total number of matching documents.
    pub found: u64,
    /// Returned page of hits.
    pub hits: Vec<SearchHit>,
    /// Facet histograms, one per requested field.
    pub facet_counts: Vec<FacetCounts>,
}

impl SearchResponse {
    /// A response that only reports a total.
    pub fn with_found(found: u64) -> Self {
        Self {
            found,
            ..Default::default()
        }
    }

    /// Appends a facet histogram.
    pub fn with_facet<V: ToString>(mut self, field: &str, counts: &[(V, u64)]) -> Self {
        self.facet_counts.push(FacetCounts {
            field_name: field.to_string(),
            counts: counts
                .iter()
                .map(|(value, count)| FacetValue {
                    value: value.to_string(),
                    count: *count,
                })
                .collect(),
        });
        self
    }

    /// Appends a hit.
    pub fn with_hit(mut self, document: NewsDocument) -> Self {
        self.hits.push(SearchHit { document });
        self
    }

    /// The histogram computed for `field`, if the engine returned one.
    pub fn facet(&self, field: &str) -> Option<&FacetCounts> {
        self.facet_counts.iter().find(|f| f.field_name == field)
    }
}

/// Collection metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionInfo {
    /// Collection name.
    pub name: String,
    /// Number of indexed documents.
    pub num_documents: u64,
}

// ============================================================================
// Tests
// ============================================================================
