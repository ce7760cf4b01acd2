//! Model module - Application state and data types
//!
//! Organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (enums, UI state, etc.)
//! - `codec`: Decoder inventory and the memoized capability probe
//! - `quality`: Quality tier catalog and the tier resolver
//! - `content`: Search result records
//! - `filter`: Quality and content filters over search results
//! - `search_state`: Search session state and transitions
//! - `download_options`: Quality picker for a single track
//! - `settings` / `history`: Persisted preferences and recent searches
//! - `search_client`: HTTP client for the search service
//! - `downloads`: Download requests and the pending queue
//! - `app_model`: UI state management

mod types;
mod codec;
mod quality;
mod content;
mod filter;
mod errors;
mod settings;
mod history;
mod search_state;
mod download_options;
mod search_client;
mod downloads;
mod app_model;

pub use types::{ActiveSection, AlbumView, SearchStatus, SearchType, UiState};

pub use codec::CodecCapabilityProbe;

pub use content::SearchResult;

pub use quality::QUALITY_CATALOG;

pub use filter::{ContentFilter, FilterChip, QualityFilter};

pub use errors::{is_example_server, SearchError, StoreError};

pub use settings::SettingsStore;

pub use history::{SearchHistoryEntry, SearchHistoryStore};

pub use search_state::SearchState;

pub use download_options::DownloadOptions;

pub use search_client::{EchoirClient, SearchApi};

pub use downloads::{DownloadDispatch, DownloadQueue, DownloadRequest};

pub use app_model::AppModel;

#[cfg(test)]
pub(crate) use codec::StaticInventory;
#[cfg(test)]
pub(crate) use content::sample_result;
#[cfg(test)]
pub(crate) use errors::EXAMPLE_SERVER_ADVISORY;
#[cfg(test)]
pub(crate) use quality::QualityKey;
#[cfg(test)]
pub(crate) use settings::{FileNamingFormat, DEFAULT_SERVER_URL};
