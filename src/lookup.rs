/*!
 * Search-as-you-type and detail selection coordination.
 *
 * Each new request supersedes the previous one. A superseded search never
 * reaches the store if it is still waiting out its debounce delay, and any
 * result that arrives after a newer request has started is discarded.
 */

use log::debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::dictionary::{Dictionary, TermDetail, TermList};
use crate::errors::RepositoryError;

/// Pause after the last keystroke before a search is issued
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Outcome of a coordinated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// Still the most recent request
    Current(T),
    /// A newer request started first; the result was dropped
    Superseded,
}

impl<T> Lookup<T> {
    pub fn into_current(self) -> Option<T> {
        match self {
            Self::Current(value) => Some(value),
            Self::Superseded => None,
        }
    }
}

/// Identifies one request handed out by [`LatestOnly`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Last-write-wins generation counter
#[derive(Debug, Clone, Default)]
pub struct LatestOnly {
    current: Arc<AtomicU64>,
}

impl LatestOnly {
    /// Start a request, superseding every earlier one
    pub fn begin(&self) -> Ticket {
        Ticket(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.current.load(Ordering::SeqCst) == ticket.0
    }
}

/// Debounced term search
#[derive(Clone)]
pub struct DebouncedSearch {
    dictionary: Dictionary,
    delay: Duration,
    latest: LatestOnly,
}

impl DebouncedSearch {
    pub fn new(dictionary: Dictionary, delay: Duration) -> Self {
        Self {
            dictionary,
            delay,
            latest: LatestOnly::default(),
        }
    }

    /// Search once the input has been quiet for the debounce delay
    pub async fn search(&self, query: &str) -> Result<Lookup<TermList>, RepositoryError> {
        let ticket = self.latest.begin();

        tokio::time::sleep(self.delay).await;
        if !self.latest.is_current(ticket) {
            debug!("Search for {:?} superseded before dispatch", query);
            return Ok(Lookup::Superseded);
        }

        let query = Some(query).filter(|q| !q.is_empty());
        let terms = self.dictionary.list_terms(query).await?;

        if !self.latest.is_current(ticket) {
            debug!("Discarding stale results for {:?}", query);
            return Ok(Lookup::Superseded);
        }
        Ok(Lookup::Current(terms))
    }
}

/// Detail lookup where only the most recent selection is shown
#[derive(Clone)]
pub struct DetailSelector {
    dictionary: Dictionary,
    latest: LatestOnly,
}

impl DetailSelector {
    pub fn new(dictionary: Dictionary) -> Self {
        Self {
            dictionary,
            latest: LatestOnly::default(),
        }
    }

    /// Resolve `term` unless another selection overtakes it
    pub async fn select(&self, term: &str) -> Result<Lookup<Option<TermDetail>>, RepositoryError> {
        let ticket = self.latest.begin();
        let detail = self.dictionary.resolve_detail(term).await?;

        if !self.latest.is_current(ticket) {
            debug!("Discarding stale detail for {:?}", term);
            return Ok(Lookup::Superseded);
        }
        Ok(Lookup::Current(detail))
    }
}
