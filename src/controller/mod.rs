//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input
//! and coordinates between the model and view. It is organized into
//! submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `search`: Search session (query, filters, preference listener)
//! - `navigation`: History, album drill-down and the download picker

mod input;
mod navigation;
mod search;

pub use search::SearchSession;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::model::{AppModel, DownloadDispatch, SearchError, SettingsStore, StoreError};

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    pub(crate) session: SearchSession,
    pub(crate) settings: SettingsStore,
    pub(crate) downloads: Arc<dyn DownloadDispatch>,
}

impl AppController {
    pub fn new(
        model: Arc<Mutex<AppModel>>,
        session: SearchSession,
        settings: SettingsStore,
        downloads: Arc<dyn DownloadDispatch>,
    ) -> Self {
        Self {
            model,
            session,
            settings,
            downloads,
        }
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    /// Runs the current search on its own task so input stays responsive
    pub(crate) fn spawn_search(&self) {
        let session = self.session.clone();
        tokio::spawn(async move {
            session.search().await;
        });
    }

    pub(crate) async fn notify(&self, message: String) {
        self.model.lock().await.set_notice(message).await;
    }

    pub(crate) async fn notify_store_error(&self, action: &str, error: &StoreError) {
        tracing::error!(error = %error, "{} failed", action);
        self.notify(format!("{} failed: {}", action, error)).await;
    }

    pub(crate) fn format_error(error: &SearchError) -> String {
        match error {
            SearchError::Server { status: 404, .. } => "Nothing found for this item.".to_string(),
            SearchError::Server { status: 429, .. } => "Rate limited. Please wait a moment.".to_string(),
            SearchError::Server { status, .. } if *status >= 500 => {
                "The server is having trouble. Try again later.".to_string()
            }
            SearchError::MisconfiguredServer => "Set a server URL first (press S).".to_string(),
            other => format!("Error: {}", other),
        }
    }
}
