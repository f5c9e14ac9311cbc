//! GovBRNews search layer.
//!
//! Everything the server knows about the search engine lives here: the
//! [`SearchBackend`] trait, the Typesense implementation, a scripted
//! backend for tests, and the request/response types.
//!
//! # Modules
//!
//! - [`backend`]: The `SearchBackend` trait and its provided count helpers
//! - [`filter`]: `filter_by` expression builder
//! - [`types`]: Search parameters, responses and the news document schema
//! - [`typesense`]: HTTP client for a Typesense node
//! - [`mock`]: Scripted backend with call recording

pub mod backend;
pub mod filter;
pub mod mock;
pub mod types;
pub mod typesense;

pub use backend::SearchBackend;
pub use filter::Filter;
pub use mock::MockSearchBackend;
pub use types::{
    CollectionInfo, FacetCounts, FacetValue, NewsDocument, SearchHit, SearchParams,
    SearchResponse, SortOrder, fields,
};
pub use typesense::TypesenseClient;
