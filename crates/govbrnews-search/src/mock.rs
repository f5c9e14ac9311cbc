//! Scripted search backend for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use govbrnews_core::{Error, Result};

use crate::backend::SearchBackend;
use crate::types::{CollectionInfo, NewsDocument, SearchParams, SearchResponse};

type Predicate = Arc<dyn Fn(&SearchParams) -> bool + Send + Sync>;

#[derive(Clone)]
enum Outcome {
    Respond(SearchResponse),
    Fail(String),
}

#[derive(Clone)]
struct Rule {
    predicate: Predicate,
    outcome: Outcome,
}

#[derive(Default)]
struct MockState {
    rules: Vec<Rule>,
    fallback: SearchResponse,
    documents: HashMap<String, NewsDocument>,
    collection: Option<CollectionInfo>,
    unhealthy: bool,
    calls: Vec<SearchParams>,
}

/// Search backend answering from scripted rules.
///
/// Rules are checked in the order they were added; the first whose
/// predicate accepts the request decides the outcome. Requests no rule
/// accepts get the fallback response (empty unless set). Every search
/// request is recorded and can be inspected with [`calls`](Self::calls).
///
/// # Examples
///
/// ```
/// use govbrnews_search::{MockSearchBackend, SearchResponse};
///
/// let backend = MockSearchBackend::new()
///     .respond_when(|p| p.q == "saúde", SearchResponse::with_found(12))
///     .fail_when(|p| p.q == "boom", "engine down");
/// ```
#[derive(Clone, Default)]
pub struct MockSearchBackend {
    state: Arc<Mutex<MockState>>,
    latency: Option<Duration>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

impl MockSearchBackend {
    /// Creates a backend that answers every search with an empty response.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(self, apply: impl FnOnce(&mut MockState)) -> Self {
        apply(&mut self.lock_state());
        self
    }

    fn push_rule(self, predicate: Predicate, outcome: Outcome) -> Self {
        self.update(|state| state.rules.push(Rule { predicate, outcome }))
    }

    /// Answers requests accepted by `predicate` with `response`.
    pub fn respond_when<F>(self, predicate: F, response: SearchResponse) -> Self
    where
        F: Fn(&SearchParams) -> bool + Send + Sync + 'static,
    {
        self.push_rule(Arc::new(predicate), Outcome::Respond(response))
    }

    /// Fails requests accepted by `predicate` with a backend error.
    pub fn fail_when<F>(self, predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&SearchParams) -> bool + Send + Sync + 'static,
    {
        self.push_rule(Arc::new(predicate), Outcome::Fail(message.into()))
    }

    /// Answers requests no rule accepts with `response`.
    pub fn with_fallback(self, response: SearchResponse) -> Self {
        self.update(|state| state.fallback = response)
    }

    /// Makes `document` retrievable by its ID.
    pub fn with_document(self, document: NewsDocument) -> Self {
        self.update(|state| {
            state.documents.insert(document.id.clone(), document);
        })
    }

    /// Sets the collection metadata.
    pub fn with_collection_info(self, info: CollectionInfo) -> Self {
        self.update(|state| state.collection = Some(info))
    }

    /// Reports the engine as unhealthy.
    pub fn unhealthy(self) -> Self {
        self.update(|state| state.unhealthy = true)
    }

    /// Delays every search by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Search requests received so far, in arrival order.
    pub async fn calls(&self) -> Vec<SearchParams> {
        self.lock_state().calls.clone()
    }

    /// Number of search requests received so far.
    pub async fn call_count(&self) -> usize {
        self.lock_state().calls.len()
    }

    /// Highest number of searches that were in progress at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchBackend for MockSearchBackend {
    async fn search(&self, params: &SearchParams) -> Result<SearchResponse> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        let outcome = {
            let mut state = self.lock_state();
            state.calls.push(params.clone());
            state
                .rules
                .iter()
                .find(|rule| (rule.predicate)(params))
                .map(|rule| rule.outcome.clone())
                .unwrap_or_else(|| Outcome::Respond(state.fallback.clone()))
        };

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match outcome {
            Outcome::Respond(response) => Ok(response),
            Outcome::Fail(message) => Err(Error::backend(message)),
        }
    }

    async fn get_document(&self, id: &str) -> Result<NewsDocument> {
        self.lock_state()
            .documents
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found("document", id))
    }

    async fn collection_info(&self) -> Result<CollectionInfo> {
        self.lock_state()
            .collection
            .clone()
            .ok_or_else(|| Error::not_found("collection", "news"))
    }

    async fn health(&self) -> bool {
        !self.lock_state().unhealthy
    }
}
