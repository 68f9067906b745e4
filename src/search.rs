//! Debounced, stale-proof catalog search.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tokio::time::Duration;
use tracing::{debug, warn};

use crate::catalog::CatalogApi;
use crate::entity::BookRecord;

/// Tuning knobs for one search surface.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Quiescence interval input must survive before a request fires.
    pub debounce: Duration,
    /// Minimum trimmed query length that triggers a request.
    pub min_query_len: usize,
    /// Result cap applied after decoding; `None` keeps all rows.
    pub max_results: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            min_query_len: 1,
            max_results: None,
        }
    }
}

impl SearchConfig {
    /// Preset for type-ahead suggestion dropdowns: shorter debounce,
    /// two-character minimum, five rows.
    pub fn suggestions() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            min_query_len: 2,
            max_results: Some(5),
        }
    }
}

/// The latest settled result set for a search surface.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchResults {
    /// Query the rows answer; empty when cleared.
    pub query: String,
    /// Matching books.
    pub books: Vec<BookRecord>,
}

struct PipelineState {
    catalog: Arc<dyn CatalogApi>,
    config: SearchConfig,
    // Sequence of the newest input; a response applies only while its
    // own sequence is still the newest, so a stale slow response can
    // never overwrite a newer fast one.
    issued: AtomicU64,
    apply_lock: Mutex<()>,
    results_tx: watch::Sender<SearchResults>,
}

impl PipelineState {
    fn apply(&self, seq: u64, results: SearchResults) {
        let _guard = self.apply_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if self.issued.load(Ordering::SeqCst) != seq {
            debug!(seq, "discarding stale search response");
            return;
        }
        let _ = self.results_tx.send(results);
    }
}

/// Converts keystrokes into debounced catalog searches.
///
/// One pipeline per search surface. Each call to [`input`] supersedes
/// the previous one: only input that survives the quiescence interval
/// reaches the catalog, and only the response for the newest input is
/// rendered. Dropping the pipeline cancels outstanding work, so nothing
/// mutates results after the consuming view unmounts.
///
/// [`input`]: SearchPipeline::input
pub struct SearchPipeline {
    state: Arc<PipelineState>,
    results_rx: watch::Receiver<SearchResults>,
}

impl SearchPipeline {
    /// Creates a pipeline over `catalog` with `config`.
    pub fn new(catalog: Arc<dyn CatalogApi>, config: SearchConfig) -> Self {
        let (results_tx, results_rx) = watch::channel(SearchResults::default());
        Self {
            state: Arc::new(PipelineState {
                catalog,
                config,
                issued: AtomicU64::new(0),
                apply_lock: Mutex::new(()),
                results_tx,
            }),
            results_rx,
        }
    }

    /// Feeds one keystroke's worth of raw input.
    ///
    /// Empty, whitespace-only, or too-short input clears the results
    /// immediately, cancels any pending debounced request, and issues
    /// no network call.
    pub fn input(&self, raw: &str) {
        let query = raw.trim().to_string();
        let seq = self.state.issued.fetch_add(1, Ordering::SeqCst) + 1;
        if query.len() < self.state.config.min_query_len.max(1) {
            self.state.apply(seq, SearchResults::default());
            return;
        }
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            tokio::time::sleep(state.config.debounce).await;
            if state.issued.load(Ordering::SeqCst) != seq {
                // Superseded while waiting out the quiescence interval.
                return;
            }
            debug!(%query, "issuing catalog search");
            match state.catalog.search_books(&query).await {
                Ok(mut books) => {
                    if let Some(cap) = state.config.max_results {
                        books.truncate(cap);
                    }
                    state.apply(seq, SearchResults { query, books });
                }
                Err(err) => warn!(%query, error = %err, "search failed"),
            }
        });
    }

    /// Clears results and cancels pending or in-flight work.
    pub fn clear(&self) {
        let seq = self.state.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.apply(seq, SearchResults::default());
    }

    /// Watch handle yielding the latest settled result set.
    pub fn results(&self) -> watch::Receiver<SearchResults> {
        self.results_rx.clone()
    }

    /// Current settled result set.
    pub fn current(&self) -> SearchResults {
        self.results_rx.borrow().clone()
    }
}

impl Drop for SearchPipeline {
    fn drop(&mut self) {
        // Outstanding tasks observe a newer sequence and exit without
        // applying anything.
        self.state.issued.fetch_add(1, Ordering::SeqCst);
    }
}
