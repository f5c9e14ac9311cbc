//! Typesense HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use govbrnews_core::{ConfigProvider, Error, Result};

use crate::backend::SearchBackend;
use crate::types::{CollectionInfo, NewsDocument, SearchParams, SearchResponse};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "X-TYPESENSE-API-KEY";

/// Search backend talking to a single Typesense node.
#[derive(Clone)]
pub struct TypesenseClient {
    base_url: Url,
    api_key: String,
    collection: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for TypesenseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypesenseClient")
            .field("base_url", &self.base_url.as_str())
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}

impl TypesenseClient {
    /// Creates a client for `collection` on the node at `base_url`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Node URL, e.g. `http://localhost:8108`
    /// * `api_key` - Key sent with every request
    /// * `collection` - Collection searched by this client
    /// * `connect_timeout` - Timeout for establishing connections
    ///
    /// # Errors
    ///
    /// Fails when `base_url` is not an HTTP(S) URL or the HTTP client cannot
    /// be built.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        collection: impl Into<String>,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        let base_url = base_url.into();
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| Error::config(format!("Invalid Typesense URL: {base_url}")))?;
        let collection = collection.into();
        log::info!("Typesense client initialized: {base_url} (collection '{collection}')");

        Ok(Self {
            base_url,
            api_key: api_key.into(),
            collection,
            client,
        })
    }

    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Fails when the URL or API key is not configured.
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.typesense_url()?,
            config.api_key()?,
            config.collection(),
            config.connection_timeout(),
        )
    }

    /// The collection this client searches.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Appends `segments` to the node URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::config(format!("Invalid Typesense URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn collection_url(&self, segments: &[&str]) -> Result<Url> {
        let mut path = vec!["collections", self.collection.as_str()];
        path.extend_from_slice(segments);
        self.endpoint(&path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
        resource: (&str, &str),
    ) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::backend(format!("Failed to reach Typesense: {e}")))?;

        let response = check_status(response, resource).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| Error::serialization(format!("Invalid Typesense response: {e}")))
    }
}

/// Maps non-success statuses onto the error taxonomy.
async fn check_status(response: Response, resource: (&str, &str)) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    let (resource_type, id) = resource;
    Err(match status {
        StatusCode::NOT_FOUND => {
            log::warn!("{resource_type} '{id}' not found");
            Error::not_found(resource_type, id)
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            log::error!("Unauthorized access to Typesense: {body}");
            Error::unauthorized(body)
        }
        other => {
            log::error!("Typesense error {other}: {body}");
            Error::backend_status(other.as_u16(), body)
        }
    })
}

#[async_trait]
impl SearchBackend for TypesenseClient {
    async fn search(&self, params: &SearchParams) -> Result<SearchResponse> {
        log::debug!(
            "Searching collection '{}' with params: {:?}",
            self.collection,
            params
        );
        let url = self.collection_url(&["documents", "search"])?;
        let response: SearchResponse = self
            .get_json(
                url,
                &params.to_query_pairs(),
                ("collection", self.collection.as_str()),
            )
            .await?;
        log::debug!("Search returned {} results", response.found);
        Ok(response)
    }

    async fn get_document(&self, id: &str) -> Result<NewsDocument> {
        log::debug!("Getting document '{id}' from '{}'", self.collection);
        // Dot segments would be resolved away by URL normalisation.
        if id.is_empty() || id == "." || id == ".." {
            return Err(Error::not_found("document", id));
        }
        let url = self.collection_url(&["documents", id])?;
        self.get_json(url, &[], ("document", id)).await
    }

    async fn collection_info(&self) -> Result<CollectionInfo> {
        log::debug!("Getting info for collection '{}'", self.collection);
        let url = self.collection_url(&[])?;
        self.get_json(url, &[], ("collection", self.collection.as_str()))
            .await
    }

    async fn health(&self) -> bool {
        let result: Result<serde_json::Value> = match self.endpoint(&["health"]) {
            Ok(url) => self.get_json(url, &[], ("endpoint", "health")).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(body) => {
                let ok = body.get("ok").and_then(|v| v.as_bool()).unwrap_or(false);
                log::debug!("Health check: {}", if ok { "OK" } else { "FAILED" });
                ok
            }
            Err(e) => {
                log::error!("Health check failed: {e}");
                false
            }
        }
    }
}
