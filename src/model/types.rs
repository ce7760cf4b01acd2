//! Core type definitions for the application

use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::content::SearchResult;
use super::download_options::DownloadOptions;
use super::filter::FilterChip;

/// What a search looks for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SearchType {
    #[default]
    Tracks,
    Albums,
}

impl SearchType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Tracks => "Tracks",
            Self::Albums => "Albums",
        }
    }

    /// Value of the `type` query parameter
    pub fn as_param(self) -> &'static str {
        match self {
            Self::Tracks => "tracks",
            Self::Albums => "albums",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::Tracks => Self::Albums,
            Self::Albums => Self::Tracks,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SearchStatus {
    /// No query typed
    #[default]
    Empty,
    /// Query present, waiting for the user to search
    Ready,
    Loading,
    Success,
    NoResults,
    Error,
}

/// Which section of the UI is currently active/focused
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ActiveSection {
    #[default]
    Search,
    Filters,
    Results,
    History,
}

impl ActiveSection {
    pub fn next(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::Filters,
            ActiveSection::Filters => ActiveSection::Results,
            ActiveSection::Results => ActiveSection::History,
            ActiveSection::History => ActiveSection::Search,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::History,
            ActiveSection::Filters => ActiveSection::Search,
            ActiveSection::Results => ActiveSection::Filters,
            ActiveSection::History => ActiveSection::Results,
        }
    }
}

/// Track list of an opened album
#[derive(Clone, Debug)]
pub struct AlbumView {
    pub album: SearchResult,
    pub tracks: Vec<SearchResult>,
    pub selected: usize,
}

/// Quality picker for one track
#[derive(Clone, Debug)]
pub struct OptionsPopup {
    pub track: SearchResult,
    pub options: DownloadOptions,
    pub selected: usize,
}

/// UI state for the application
#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub active_section: ActiveSection,
    pub filter_selected: usize,
    /// Chips the filter cursor was placed over
    pub filter_chips: Vec<FilterChip>,
    pub results_selected: usize,
    pub history_selected: usize,
    pub album: Option<AlbumView>,
    pub options_popup: Option<OptionsPopup>,
    /// Server URL being edited, if the editor is open
    pub server_editor: Option<String>,
    pub notice: Option<String>,
    pub notice_timestamp: Option<Instant>,
    pub show_help_popup: bool,
}
