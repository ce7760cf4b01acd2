//! Main application model with UI state management

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

use super::codec::CodecCapabilityProbe;
use super::content::SearchResult;
use super::download_options::DownloadOptions;
use super::filter::FilterChip;
use super::quality::QualityTier;
use super::types::{ActiveSection, AlbumView, OptionsPopup, UiState};

/// Seconds a notice stays on screen
const NOTICE_TTL_SECS: u64 = 5;

/// Main application model containing the UI state. Search state lives in
/// the search session; this only tracks what the terminal shows around it.
pub struct AppModel {
    pub ui_state: Arc<Mutex<UiState>>,
    pub should_quit: Arc<Mutex<bool>>,
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new()
    }
}

impl AppModel {
    pub fn new() -> Self {
        Self {
            ui_state: Arc::new(Mutex::new(UiState::default())),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    // ========================================================================
    // Sections & Selection
    // ========================================================================

    pub async fn cycle_section_forward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.next();
    }

    pub async fn cycle_section_backward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.prev();
    }

    pub async fn set_active_section(&self, section: ActiveSection) {
        let mut state = self.ui_state.lock().await;
        state.active_section = section;
    }

    pub async fn move_selection_up(&self) {
        let mut state = self.ui_state.lock().await;
        let selected = match state.active_section {
            ActiveSection::Filters => &mut state.filter_selected,
            ActiveSection::Results => &mut state.results_selected,
            ActiveSection::History => &mut state.history_selected,
            ActiveSection::Search => return,
        };
        *selected = selected.saturating_sub(1);
    }

    /// `len` is the length of the list shown in the active section
    pub async fn move_selection_down(&self, len: usize) {
        let mut state = self.ui_state.lock().await;
        let selected = match state.active_section {
            ActiveSection::Filters => &mut state.filter_selected,
            ActiveSection::Results => &mut state.results_selected,
            ActiveSection::History => &mut state.history_selected,
            ActiveSection::Search => return,
        };
        if *selected < len.saturating_sub(1) {
            *selected += 1;
        }
    }

    /// Keeps every cursor inside its list after the lists change. A new set
    /// of filter chips moves the filter cursor back to the first one.
    pub async fn clamp_selections(&self, filter_chips: &[FilterChip], results: usize, history: usize) {
        let mut state = self.ui_state.lock().await;
        if state.filter_chips != filter_chips {
            state.filter_chips = filter_chips.to_vec();
            state.filter_selected = 0;
        }
        state.results_selected = state.results_selected.min(results.saturating_sub(1));
        state.history_selected = state.history_selected.min(history.saturating_sub(1));
    }

    // ========================================================================
    // Notices
    // ========================================================================

    pub async fn set_notice(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.notice = Some(message);
        state.notice_timestamp = Some(Instant::now());
    }

    pub async fn clear_notice(&self) {
        let mut state = self.ui_state.lock().await;
        state.notice = None;
        state.notice_timestamp = None;
    }

    pub async fn has_notice(&self) -> bool {
        self.ui_state.lock().await.notice.is_some()
    }

    pub async fn auto_clear_old_notices(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.notice_timestamp {
            if timestamp.elapsed().as_secs() > NOTICE_TTL_SECS {
                state.notice = None;
                state.notice_timestamp = None;
            }
        }
    }

    // ========================================================================
    // Help
    // ========================================================================

    pub async fn show_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = true;
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }

    // ========================================================================
    // Album drill-down
    // ========================================================================

    pub async fn open_album(&self, album: SearchResult, tracks: Vec<SearchResult>) {
        let mut state = self.ui_state.lock().await;
        state.album = Some(AlbumView {
            album,
            tracks,
            selected: 0,
        });
    }

    pub async fn close_album(&self) -> bool {
        self.ui_state.lock().await.album.take().is_some()
    }

    pub async fn album_move_up(&self) {
        if let Some(album) = self.ui_state.lock().await.album.as_mut() {
            album.selected = album.selected.saturating_sub(1);
        }
    }

    pub async fn album_move_down(&self) {
        if let Some(album) = self.ui_state.lock().await.album.as_mut() {
            if album.selected < album.tracks.len().saturating_sub(1) {
                album.selected += 1;
            }
        }
    }

    pub async fn get_selected_album_track(&self) -> Option<SearchResult> {
        let state = self.ui_state.lock().await;
        let album = state.album.as_ref()?;
        album.tracks.get(album.selected).cloned()
    }

    // ========================================================================
    // Download options popup
    // ========================================================================

    pub async fn show_options_popup(&self, track: SearchResult, options: DownloadOptions) {
        let mut state = self.ui_state.lock().await;
        state.options_popup = Some(OptionsPopup {
            track,
            options,
            selected: 0,
        });
    }

    pub async fn hide_options_popup(&self) {
        self.ui_state.lock().await.options_popup = None;
    }

    #[cfg(test)]
    pub async fn is_options_popup_open(&self) -> bool {
        self.ui_state.lock().await.options_popup.is_some()
    }

    pub async fn options_move_up(&self) {
        if let Some(popup) = self.ui_state.lock().await.options_popup.as_mut() {
            popup.selected = popup.selected.saturating_sub(1);
        }
    }

    /// `visible` is the number of tiers the popup currently lists
    pub async fn options_move_down(&self, visible: usize) {
        if let Some(popup) = self.ui_state.lock().await.options_popup.as_mut() {
            if popup.selected < visible.saturating_sub(1) {
                popup.selected += 1;
            }
        }
    }

    /// Re-applies the reveal preference to an open popup. True when that
    /// left the track with no visible tier and the user has not been told yet.
    pub async fn set_options_show_unsupported(&self, show: bool, probe: &CodecCapabilityProbe) -> bool {
        let mut state = self.ui_state.lock().await;
        let Some(popup) = state.options_popup.as_mut() else {
            return false;
        };
        popup.options.set_show_unsupported_formats(show);
        popup.selected = 0;
        popup.options.take_no_viable_notice(probe)
    }

    pub async fn get_options_popup(&self) -> Option<OptionsPopup> {
        self.ui_state.lock().await.options_popup.clone()
    }

    /// Tier under the cursor among `visible`
    pub async fn get_selected_option(&self, visible: &[QualityTier]) -> Option<QualityTier> {
        let state = self.ui_state.lock().await;
        let popup = state.options_popup.as_ref()?;
        visible.get(popup.selected).copied()
    }

    // ========================================================================
    // Server URL editor
    // ========================================================================

    pub async fn open_server_editor(&self, current: String) {
        self.ui_state.lock().await.server_editor = Some(current);
    }

    pub async fn is_server_editor_open(&self) -> bool {
        self.ui_state.lock().await.server_editor.is_some()
    }

    pub async fn server_editor_push(&self, c: char) {
        if let Some(text) = self.ui_state.lock().await.server_editor.as_mut() {
            text.push(c);
        }
    }

    pub async fn server_editor_pop(&self) {
        if let Some(text) = self.ui_state.lock().await.server_editor.as_mut() {
            text.pop();
        }
    }

    /// Closes the editor, returning what was typed
    pub async fn take_server_editor(&self) -> Option<String> {
        self.ui_state.lock().await.server_editor.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::content::sample_result;
    use crate::model::filter::QualityFilter;
    use crate::model::quality::{AAC_320, LOSSLESS};

    #[tokio::test]
    async fn selection_stays_within_list() {
        let model = AppModel::new();
        model.set_active_section(ActiveSection::Results).await;
        model.move_selection_up().await;
        assert_eq!(model.get_ui_state().await.results_selected, 0);

        for _ in 0..5 {
            model.move_selection_down(3).await;
        }
        assert_eq!(model.get_ui_state().await.results_selected, 2);

        model.clamp_selections(&[], 1, 0).await;
        assert_eq!(model.get_ui_state().await.results_selected, 0);
    }

    #[tokio::test]
    async fn filter_cursor_resets_when_chips_change() {
        let model = AppModel::new();
        let with_atmos = FilterChip::chips(&[QualityFilter::Lossless, QualityFilter::Atmos]);
        model.clamp_selections(&with_atmos, 0, 0).await;
        model.set_active_section(ActiveSection::Filters).await;
        model.move_selection_down(with_atmos.len()).await;
        model.move_selection_down(with_atmos.len()).await;
        assert_eq!(model.get_ui_state().await.filter_selected, 2);

        model.clamp_selections(&with_atmos, 0, 0).await;
        assert_eq!(model.get_ui_state().await.filter_selected, 2);

        let without_atmos = FilterChip::chips(&[QualityFilter::Lossless]);
        model.clamp_selections(&without_atmos, 0, 0).await;
        assert_eq!(model.get_ui_state().await.filter_selected, 0);
    }

    #[tokio::test]
    async fn search_section_has_no_cursor() {
        let model = AppModel::new();
        model.move_selection_down(4).await;
        let state = model.get_ui_state().await;
        assert_eq!(state.filter_selected, 0);
        assert_eq!(state.results_selected, 0);
        assert_eq!(state.history_selected, 0);
    }

    #[tokio::test]
    async fn server_editor_returns_typed_text() {
        let model = AppModel::new();
        model.open_server_editor("https://a".to_string()).await;
        model.server_editor_pop().await;
        model.server_editor_push('b').await;
        assert!(model.is_server_editor_open().await);
        assert_eq!(model.take_server_editor().await.as_deref(), Some("https://b"));
        assert!(!model.is_server_editor_open().await);
    }

    #[tokio::test]
    async fn options_cursor_picks_visible_tier() {
        let model = AppModel::new();
        model
            .show_options_popup(sample_result(1, false, &["LOSSLESS"]), DownloadOptions::new(false))
            .await;
        let visible = [LOSSLESS, AAC_320];
        model.options_move_down(visible.len()).await;
        model.options_move_down(visible.len()).await;
        assert_eq!(model.get_selected_option(&visible).await, Some(AAC_320));

        model.hide_options_popup().await;
        assert_eq!(model.get_selected_option(&visible).await, None);
    }

    #[tokio::test]
    async fn album_view_navigation() {
        let model = AppModel::new();
        let album = sample_result(9, false, &[]);
        let tracks = vec![sample_result(1, false, &[]), sample_result(2, false, &[])];
        model.open_album(album, tracks).await;
        model.album_move_down().await;
        model.album_move_down().await;
        assert_eq!(model.get_selected_album_track().await.map(|t| t.id), Some(2));
        assert!(model.close_album().await);
        assert!(!model.close_album().await);
    }
}
