//! Navigation-related controller methods (results, albums, history, downloads)

use crate::model::{
    ActiveSection, DownloadOptions, DownloadRequest, FilterChip, SearchResult, SearchType,
};
use super::AppController;

const NO_VIABLE_NOTICE: &str =
    "No quality of this track plays on this device. Press U to show unsupported formats.";

impl AppController {
    /// Enter on the results pane: albums open their track list, tracks open
    /// the quality picker
    pub async fn open_selected_result(&self) {
        let state = self.session.snapshot().await;
        let selected = self.model.lock().await.get_ui_state().await.results_selected;
        let Some(item) = state.filtered_results.get(selected).cloned() else {
            return;
        };

        match state.search_type {
            SearchType::Albums => self.open_album(item).await,
            SearchType::Tracks => self.open_download_options(item).await,
        }
    }

    pub async fn open_album(&self, album: SearchResult) {
        tracing::debug!(album_id = album.id, title = %album.title, "Opening album");
        match self.session.album_tracks(album.id).await {
            Ok(tracks) => {
                tracing::info!(album_id = album.id, tracks = tracks.len(), "Album tracks loaded");
                self.model.lock().await.open_album(album, tracks).await;
            }
            Err(e) => {
                tracing::error!(album_id = album.id, error = %e, "Failed to load album tracks");
                self.notify(Self::format_error(&e)).await;
            }
        }
    }

    pub async fn open_download_options(&self, track: SearchResult) {
        let show_unsupported = self.settings.show_unsupported_formats().await;
        let mut options = DownloadOptions::new(show_unsupported);
        options.update(track.modes.as_deref(), track.formats.as_deref());

        let no_viable = options.take_no_viable_notice(self.session.probe());
        tracing::debug!(
            track_id = track.id,
            options = options.options().len(),
            no_viable,
            "Opening download options"
        );

        let model = self.model.lock().await;
        model.show_options_popup(track, options).await;
        if no_viable {
            model.set_notice(NO_VIABLE_NOTICE.to_string()).await;
        }
    }

    /// Enter in the quality picker: hand the chosen tier to the downloader
    pub async fn confirm_download(&self) {
        let model = self.model.lock().await;
        let Some(popup) = model.get_options_popup().await else {
            return;
        };
        let visible = popup.options.visible(self.session.probe());
        let Some(tier) = model.get_selected_option(&visible).await else {
            return;
        };
        model.hide_options_popup().await;
        drop(model);

        let request = DownloadRequest::build(popup.track, tier, &self.settings).await;
        let file_name = request.file_name.clone();
        match self.downloads.dispatch(request).await {
            Ok(()) => self.notify(format!("Queued {} ({})", file_name, tier.label)).await,
            Err(e) => {
                tracing::error!(error = %e, "Failed to queue download");
                self.notify(format!("Download failed: {}", e)).await;
            }
        }
    }

    // ========================================================================
    // Filters & preferences
    // ========================================================================

    pub async fn toggle_selected_filter(&self) {
        let state = self.session.snapshot().await;
        let selected = self.model.lock().await.get_ui_state().await.filter_selected;
        let Some(chip) = FilterChip::chips(&state.available_qualities).get(selected).copied() else {
            return;
        };
        match (chip, chip.is_active(&state.filter)) {
            (FilterChip::Quality(q), true) => self.session.remove_quality_filter(q).await,
            (FilterChip::Quality(q), false) => self.session.add_quality_filter(q).await,
            (FilterChip::Content(c), true) => self.session.remove_content_filter(c).await,
            (FilterChip::Content(c), false) => self.session.add_content_filter(c).await,
        }
    }

    /// Flips the reveal-unsupported preference. The session follows through
    /// its listener; an open quality picker is updated here.
    pub async fn toggle_show_unsupported(&self) {
        let show = !self.settings.show_unsupported_formats().await;
        if let Err(e) = self.settings.set_show_unsupported_formats(show).await {
            self.notify_store_error("Saving preference", &e).await;
            return;
        }
        tracing::info!(show_unsupported_formats = show, "Preference toggled");
        let model = self.model.lock().await;
        if model.set_options_show_unsupported(show, self.session.probe()).await {
            model.set_notice(NO_VIABLE_NOTICE.to_string()).await;
        }
    }

    pub async fn cycle_file_naming_format(&self) {
        let next = self.settings.file_naming_format().await.next();
        match self.settings.set_file_naming_format(next).await {
            Ok(()) => {
                let example = next.format("Artist", "Title");
                self.notify(format!("Files will be named \"{}.flac\"", example)).await;
            }
            Err(e) => self.notify_store_error("Saving file naming", &e).await,
        }
    }

    pub async fn reset_settings(&self) {
        match self.settings.reset().await {
            Ok(()) => {
                tracing::info!("Settings reset to defaults");
                self.notify("Settings reset".to_string()).await;
            }
            Err(e) => self.notify_store_error("Resetting settings", &e).await,
        }
    }

    pub async fn toggle_search_type(&self) {
        let next = self.session.snapshot().await.search_type.toggle();
        let session = self.session.clone();
        tokio::spawn(async move {
            session.set_search_type(next).await;
        });
    }

    pub async fn save_server_url(&self, url: String) {
        if url.trim().is_empty() {
            self.notify("Server URL unchanged".to_string()).await;
            return;
        }
        match self.settings.set_server_url(url.trim()).await {
            Ok(()) => self.notify("Server URL saved".to_string()).await,
            Err(e) => self.notify_store_error("Saving server URL", &e).await,
        }
    }

    // ========================================================================
    // History
    // ========================================================================

    pub async fn run_selected_history(&self) {
        let history = self.session.recent_history().await;
        let model = self.model.lock().await;
        let selected = model.get_ui_state().await.history_selected;
        let Some(entry) = history.get(selected).cloned() else {
            return;
        };
        model.set_active_section(ActiveSection::Results).await;
        drop(model);

        tracing::debug!(query = %entry.query, "Re-running search from history");
        let session = self.session.clone();
        tokio::spawn(async move {
            session.search_from_history(&entry).await;
        });
    }

    pub async fn delete_selected_history(&self) {
        let history = self.session.recent_history().await;
        let selected = self.model.lock().await.get_ui_state().await.history_selected;
        let Some(entry) = history.get(selected) else {
            return;
        };
        if let Err(e) = self.session.history().delete(&entry.query, entry.search_type).await {
            self.notify_store_error("Deleting history entry", &e).await;
        }
    }

    pub async fn clear_history(&self) {
        match self.session.history().delete_all().await {
            Ok(()) => self.notify("Search history cleared".to_string()).await,
            Err(e) => self.notify_store_error("Clearing history", &e).await,
        }
    }

    /// Keeps the model's cursors valid for the current lists
    pub async fn sync_selections(&self) {
        let state = self.session.snapshot().await;
        let history = self.session.recent_history().await;
        let chips = FilterChip::chips(&state.available_qualities);
        self.model
            .lock()
            .await
            .clamp_selections(&chips, state.filtered_results.len(), history.len())
            .await;
    }

    /// Lengths of the Filters, Results and History lists
    pub async fn list_lengths(&self) -> (usize, usize, usize) {
        let state = self.session.snapshot().await;
        let history = self.session.recent_history().await;
        (
            FilterChip::chips(&state.available_qualities).len(),
            state.filtered_results.len(),
            history.len(),
        )
    }
}
