//! Search session state and its transitions
//!
//! Every transition here is synchronous. `filtered_results` is only ever
//! written through `refresh_filtered`, so it always equals the filter engine
//! applied to `results`.

use super::codec::CodecCapabilityProbe;
use super::content::SearchResult;
use super::errors::{is_example_server, SearchError, EXAMPLE_SERVER_ADVISORY};
use super::filter::{filter_results, ContentFilter, QualityFilter, SearchFilter};
use super::types::{SearchStatus, SearchType};

/// Parameters of one search round trip
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub search_type: SearchType,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub search_type: SearchType,
    pub filter: SearchFilter,
    pub results: Vec<SearchResult>,
    pub filtered_results: Vec<SearchResult>,
    pub status: SearchStatus,
    pub error: Option<String>,
    /// Set when the error is the placeholder-server advisory
    pub show_server_recommendation: bool,
    pub show_unsupported_formats: bool,
    /// Quality tags the user may pick from
    pub available_qualities: Vec<QualityFilter>,
}

impl SearchState {
    pub fn new(probe: &CodecCapabilityProbe) -> Self {
        Self {
            query: String::new(),
            search_type: SearchType::default(),
            filter: SearchFilter::default(),
            results: Vec::new(),
            filtered_results: Vec::new(),
            status: SearchStatus::Empty,
            error: None,
            show_server_recommendation: false,
            show_unsupported_formats: false,
            available_qualities: QualityFilter::offered(false, probe),
        }
    }

    fn refresh_filtered(&mut self) {
        self.filtered_results =
            filter_results(&self.results, &self.filter, self.show_unsupported_formats);
    }

    /// Filter changes only touch the view when there is something to filter;
    /// otherwise they are picked up by the next successful search.
    fn replace_filter(&mut self, filter: SearchFilter) {
        self.filter = filter;
        if !self.results.is_empty() {
            self.refresh_filtered();
        }
    }

    pub fn set_query(&mut self, query: String) {
        self.status = if query.is_empty() {
            SearchStatus::Empty
        } else {
            SearchStatus::Ready
        };
        self.query = query;
    }

    /// Switches the search type. Returns true when a search should follow.
    pub fn set_search_type(&mut self, search_type: SearchType) -> bool {
        self.search_type = search_type;
        !self.query.is_empty()
    }

    /// Enters `Loading`. Previous results stay visible until the outcome is
    /// applied. Returns `None` when there is no query to search for.
    pub fn begin_search(&mut self) -> Option<SearchRequest> {
        if self.query.is_empty() {
            return None;
        }
        self.status = SearchStatus::Loading;
        Some(SearchRequest {
            query: self.query.clone(),
            search_type: self.search_type,
        })
    }

    pub fn apply_results(&mut self, results: Vec<SearchResult>) {
        self.status = if results.is_empty() {
            SearchStatus::NoResults
        } else {
            SearchStatus::Success
        };
        self.results = results;
        self.refresh_filtered();
        self.error = None;
        self.show_server_recommendation = false;
    }

    /// Maps a failed search into the `Error` state. The placeholder server is
    /// recognised from the error kind, the error text or the configured URL.
    pub fn apply_failure(&mut self, error: &SearchError, server_url: &str) {
        let misconfigured = error.is_misconfigured_server() || is_example_server(server_url);

        self.status = SearchStatus::Error;
        self.error = Some(if misconfigured {
            EXAMPLE_SERVER_ADVISORY.to_string()
        } else {
            error.to_string()
        });
        self.show_server_recommendation = misconfigured;
        self.results.clear();
        self.refresh_filtered();
    }

    pub fn add_quality_filter(&mut self, quality: QualityFilter) {
        self.replace_filter(self.filter.with_quality(quality));
    }

    pub fn remove_quality_filter(&mut self, quality: QualityFilter) {
        self.replace_filter(self.filter.without_quality(quality));
    }

    pub fn add_content_filter(&mut self, filter: ContentFilter) {
        self.replace_filter(self.filter.with_content(filter));
    }

    pub fn remove_content_filter(&mut self, filter: ContentFilter) {
        self.replace_filter(self.filter.without_content(filter));
    }

    /// Applies a new reveal-unsupported preference. Hiding unsupported
    /// formats again prunes active quality tags the device cannot decode;
    /// revealing them never drops a tag.
    pub fn set_show_unsupported_formats(&mut self, show: bool, probe: &CodecCapabilityProbe) {
        self.show_unsupported_formats = show;
        self.available_qualities = QualityFilter::offered(show, probe);

        let filter = if show {
            self.filter.clone()
        } else {
            self.filter.retain_supported(probe)
        };
        self.replace_filter(filter);
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.results.clear();
        self.filtered_results.clear();
        self.error = None;
        self.status = SearchStatus::Empty;
        self.show_server_recommendation = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::codec::StaticInventory;
    use crate::model::content::sample_result;
    use pretty_assertions::assert_eq;

    fn bare_probe() -> CodecCapabilityProbe {
        CodecCapabilityProbe::new(StaticInventory::default())
    }

    fn ids(results: &[SearchResult]) -> Vec<i64> {
        results.iter().map(|r| r.id).collect()
    }

    fn assert_view_consistent(state: &SearchState) {
        assert_eq!(
            state.filtered_results,
            filter_results(&state.results, &state.filter, state.show_unsupported_formats)
        );
    }

    #[test]
    fn query_edits_move_between_empty_and_ready() {
        let mut state = SearchState::new(&bare_probe());
        assert_eq!(state.status, SearchStatus::Empty);

        state.set_query("abc".to_string());
        assert_eq!(state.status, SearchStatus::Ready);

        state.set_query(String::new());
        assert_eq!(state.status, SearchStatus::Empty);
        assert_eq!(state.begin_search(), None);
    }

    #[test]
    fn loading_keeps_previous_results_visible() {
        let mut state = SearchState::new(&bare_probe());
        state.set_query("q".to_string());
        state.begin_search();
        state.apply_results(vec![sample_result(1, false, &["LOSSLESS"])]);

        state.set_query("q2".to_string());
        let request = state.begin_search().unwrap();
        assert_eq!(request.query, "q2");
        assert_eq!(state.status, SearchStatus::Loading);
        assert_eq!(ids(&state.filtered_results), vec![1]);
    }

    #[test]
    fn empty_response_is_no_results() {
        let mut state = SearchState::new(&bare_probe());
        state.set_query("nothing".to_string());
        state.begin_search();
        state.apply_results(Vec::new());
        assert_eq!(state.status, SearchStatus::NoResults);
        assert_eq!(state.error, None);
    }

    #[test]
    fn failure_clears_results_and_keeps_raw_message() {
        let mut state = SearchState::new(&bare_probe());
        state.set_query("q".to_string());
        state.apply_results(vec![sample_result(1, false, &[])]);

        state.apply_failure(
            &SearchError::Network("connection refused".to_string()),
            "https://music.lan",
        );
        assert_eq!(state.status, SearchStatus::Error);
        assert_eq!(state.error.as_deref(), Some("connection refused"));
        assert!(!state.show_server_recommendation);
        assert!(state.results.is_empty());
        assert_view_consistent(&state);
    }

    #[test]
    fn failure_against_placeholder_shows_advisory() {
        let mut state = SearchState::new(&bare_probe());
        state.set_query("q".to_string());
        state.apply_failure(
            &SearchError::Network("timeout".to_string()),
            "https://example.com/api/echoir",
        );
        assert!(state.show_server_recommendation);
        assert_eq!(state.error.as_deref(), Some(EXAMPLE_SERVER_ADVISORY));

        state.apply_results(vec![sample_result(1, false, &[])]);
        assert!(!state.show_server_recommendation);
    }

    #[test]
    fn filter_changes_keep_status_and_view_consistent() {
        let mut state = SearchState::new(&bare_probe());
        state.set_query("q".to_string());
        state.apply_results(vec![
            sample_result(1, true, &["LOSSLESS"]),
            sample_result(2, false, &["HIRES_LOSSLESS"]),
        ]);

        state.add_quality_filter(QualityFilter::Lossless);
        assert_eq!(state.status, SearchStatus::Success);
        assert_eq!(ids(&state.filtered_results), vec![1]);

        state.add_content_filter(ContentFilter::Clean);
        assert!(state.filtered_results.is_empty());

        state.remove_content_filter(ContentFilter::Clean);
        state.remove_quality_filter(QualityFilter::Lossless);
        assert_eq!(ids(&state.filtered_results), vec![1, 2]);
        assert_view_consistent(&state);
    }

    #[test]
    fn filter_before_results_applies_on_next_search() {
        let mut state = SearchState::new(&bare_probe());
        state.add_quality_filter(QualityFilter::HiRes);
        assert!(state.filtered_results.is_empty());

        state.set_query("q".to_string());
        state.begin_search();
        state.apply_results(vec![
            sample_result(1, false, &["LOSSLESS"]),
            sample_result(2, false, &["HIRES_LOSSLESS"]),
        ]);
        assert_eq!(ids(&state.filtered_results), vec![2]);
    }

    #[test]
    fn search_type_change_requests_search_only_with_query() {
        let mut state = SearchState::new(&bare_probe());
        assert!(!state.set_search_type(SearchType::Albums));
        state.set_query("q".to_string());
        assert!(state.set_search_type(SearchType::Tracks));
    }

    #[test]
    fn hiding_unsupported_prunes_active_tags() {
        let probe = bare_probe();
        let mut state = SearchState::new(&probe);
        assert_eq!(
            state.available_qualities,
            vec![QualityFilter::HiRes, QualityFilter::Lossless]
        );

        state.set_show_unsupported_formats(true, &probe);
        assert_eq!(state.available_qualities, QualityFilter::ALL.to_vec());

        state.apply_results(vec![
            sample_result(1, false, &["DOLBY_ATMOS"]),
            sample_result(2, false, &["LOSSLESS"]),
        ]);
        state.add_quality_filter(QualityFilter::Atmos);
        state.add_quality_filter(QualityFilter::Lossless);
        assert_eq!(ids(&state.filtered_results), vec![1, 2]);

        state.set_show_unsupported_formats(true, &probe);
        assert_eq!(state.filter.qualities.len(), 2);

        state.set_show_unsupported_formats(false, &probe);
        assert!(!state.filter.qualities.contains(&QualityFilter::Atmos));
        assert!(state.filter.qualities.contains(&QualityFilter::Lossless));
        assert_eq!(ids(&state.filtered_results), vec![2]);
        assert_view_consistent(&state);
    }

    #[test]
    fn clear_resets_to_empty() {
        let mut state = SearchState::new(&bare_probe());
        state.set_query("q".to_string());
        state.apply_failure(&SearchError::MisconfiguredServer, "");
        state.clear();
        assert_eq!(state.status, SearchStatus::Empty);
        assert_eq!(state.error, None);
        assert!(!state.show_server_recommendation);
        assert!(state.query.is_empty());
    }
}
