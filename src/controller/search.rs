//! Search session controller
//!
//! Owns one `SearchState`. Every mutation goes through the state mutex:
//! lock, compute the next state, release. Only `search` suspends, and it
//! never holds the lock across the network call. Each search is tagged with
//! a sequence number; a response whose number is no longer the latest is
//! dropped so a slow earlier search cannot overwrite a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::model::{
    is_example_server, CodecCapabilityProbe, ContentFilter, QualityFilter, SearchApi,
    SearchError, SearchHistoryEntry, SearchHistoryStore, SearchResult, SearchState, SearchType,
    SettingsStore,
};

#[derive(Clone)]
pub struct SearchSession {
    state: Arc<Mutex<SearchState>>,
    latest_search: Arc<AtomicU64>,
    api: Arc<dyn SearchApi>,
    settings: SettingsStore,
    history: SearchHistoryStore,
    probe: Arc<CodecCapabilityProbe>,
    preference_listener: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl SearchSession {
    pub fn new(
        api: Arc<dyn SearchApi>,
        settings: SettingsStore,
        history: SearchHistoryStore,
        probe: Arc<CodecCapabilityProbe>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(SearchState::new(&probe))),
            latest_search: Arc::new(AtomicU64::new(0)),
            api,
            settings,
            history,
            probe,
            preference_listener: Arc::new(Mutex::new(None)),
        }
    }

    pub fn probe(&self) -> &CodecCapabilityProbe {
        &self.probe
    }

    pub fn history(&self) -> &SearchHistoryStore {
        &self.history
    }

    pub async fn snapshot(&self) -> SearchState {
        self.state.lock().await.clone()
    }

    /// Makes any in-flight search stale
    fn invalidate_in_flight(&self) -> u64 {
        self.latest_search.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_latest(&self, seq: u64) -> bool {
        self.latest_search.load(Ordering::SeqCst) == seq
    }

    // ========================================================================
    // Preference subscription
    // ========================================================================

    /// Starts following the reveal-unsupported preference. Every emitted
    /// value recomputes offered tags, prunes stale ones and refreshes the
    /// filtered view. Calling again replaces the previous listener.
    pub async fn start_preference_listener(&self) {
        let mut stream = Box::pin(self.settings.show_unsupported_formats_stream());
        let state = self.state.clone();
        let probe = self.probe.clone();

        tracing::info!("Starting reveal-unsupported preference listener");
        let handle = tokio::spawn(async move {
            while let Some(show) = stream.next().await {
                tracing::debug!(show_unsupported_formats = show, "Preference changed");
                state.lock().await.set_show_unsupported_formats(show, &probe);
            }
            tracing::debug!("Preference stream ended");
        });

        if let Some(previous) = self.preference_listener.lock().await.replace(handle) {
            previous.abort();
        }
    }

    /// Tears the listener down; must be called when the session ends
    pub async fn stop_preference_listener(&self) {
        if let Some(handle) = self.preference_listener.lock().await.take() {
            handle.abort();
            tracing::debug!("Preference listener stopped");
        }
    }

    // ========================================================================
    // Query, type and filters
    // ========================================================================

    /// Every edit discards the search in flight
    async fn edit_query(&self, edit: impl FnOnce(&mut String)) {
        let mut state = self.state.lock().await;
        let mut query = state.query.clone();
        edit(&mut query);
        self.invalidate_in_flight();
        state.set_query(query);
    }

    pub async fn set_query(&self, query: String) {
        self.edit_query(|q| *q = query).await;
    }

    pub async fn push_query_char(&self, c: char) {
        self.edit_query(|q| q.push(c)).await;
    }

    pub async fn pop_query_char(&self) {
        self.edit_query(|q| {
            q.pop();
        })
        .await;
    }

    /// Changes the search type and re-runs the search when a query is present
    pub async fn set_search_type(&self, search_type: SearchType) {
        let should_search = self.state.lock().await.set_search_type(search_type);
        if should_search {
            self.search().await;
        }
    }

    pub async fn add_quality_filter(&self, quality: QualityFilter) {
        self.state.lock().await.add_quality_filter(quality);
    }

    pub async fn remove_quality_filter(&self, quality: QualityFilter) {
        self.state.lock().await.remove_quality_filter(quality);
    }

    pub async fn add_content_filter(&self, filter: ContentFilter) {
        self.state.lock().await.add_content_filter(filter);
    }

    pub async fn remove_content_filter(&self, filter: ContentFilter) {
        self.state.lock().await.remove_content_filter(filter);
    }

    pub async fn clear_search(&self) {
        self.invalidate_in_flight();
        self.state.lock().await.clear();
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Runs one search for the current query and type. Failures end up in
    /// the state, never in the caller.
    pub async fn search(&self) {
        let (request, seq) = {
            let mut state = self.state.lock().await;
            let Some(request) = state.begin_search() else {
                return;
            };
            (request, self.invalidate_in_flight())
        };

        let query = request.query.as_str();
        let search_type = request.search_type;
        tracing::debug!(query, ?search_type, seq, "Performing search");

        let server_url = self.settings.server_url().await;
        let outcome = if is_example_server(&server_url) {
            tracing::warn!(server_url = %server_url, "Example server configured, skipping request");
            Err(SearchError::MisconfiguredServer)
        } else {
            self.api.search(query, search_type).await
        };

        match outcome {
            Ok(results) => {
                let entry = SearchHistoryEntry::now(query, search_type);
                if let Err(e) = self.history.upsert(entry).await {
                    tracing::warn!(error = %e, "Failed to record search history");
                }

                let mut state = self.state.lock().await;
                if !self.is_latest(seq) {
                    tracing::debug!(query, seq, "Discarding stale search response");
                    return;
                }
                tracing::info!(query, ?search_type, results = results.len(), "Search completed successfully");
                state.apply_results(results);
            }
            Err(e) => {
                let mut state = self.state.lock().await;
                if !self.is_latest(seq) {
                    tracing::debug!(query, seq, "Discarding stale search failure");
                    return;
                }
                tracing::error!(query, error = %e, "Search failed");
                state.apply_failure(&e, &server_url);
            }
        }
    }

    /// Re-runs a history entry with its own type
    pub async fn search_from_history(&self, entry: &SearchHistoryEntry) {
        {
            let mut state = self.state.lock().await;
            state.set_query(entry.query.clone());
            state.set_search_type(entry.search_type);
        }
        self.search().await;
    }

    pub async fn album_tracks(&self, album_id: i64) -> Result<Vec<SearchResult>, SearchError> {
        let server_url = self.settings.server_url().await;
        if is_example_server(&server_url) {
            return Err(SearchError::MisconfiguredServer);
        }
        self.api.get_album_tracks(album_id).await
    }

    pub async fn recent_history(&self) -> Vec<SearchHistoryEntry> {
        let search_type = self.state.lock().await.search_type;
        self.history.recent(search_type).await
    }
}
