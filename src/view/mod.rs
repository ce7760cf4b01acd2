//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (styles, column widths, scrollable lists)
//! - `layout`: Top bar, filter bar, history sidebar and status line
//! - `content`: Results pane and album track list
//! - `overlays`: Modal overlays (notice, quality picker, server editor, help)

mod utils;
mod layout;
mod content;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{CodecCapabilityProbe, SearchHistoryEntry, SearchState, UiState};

/// Everything one frame draws, captured before rendering starts
pub struct ViewSnapshot {
    pub search: SearchState,
    pub ui_state: UiState,
    pub history: Vec<SearchHistoryEntry>,
    pub server_url: String,
    /// Downloads waiting for the downloader
    pub queued: usize,
}

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, snapshot: &ViewSnapshot, probe: &CodecCapabilityProbe) {
        let ViewSnapshot {
            search,
            ui_state,
            history,
            server_url,
            queued,
        } = snapshot;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search bar + server
                Constraint::Length(3), // Filters
                Constraint::Min(0),    // Results + history
                Constraint::Length(1), // Status line
            ])
            .split(frame.area());

        layout::render_top_bar(frame, chunks[0], search, ui_state, server_url);
        layout::render_filter_bar(frame, chunks[1], search, ui_state);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(72), // Results
                Constraint::Percentage(28), // History
            ])
            .split(chunks[2]);

        content::render_results(frame, main_chunks[0], search, ui_state, probe);
        layout::render_history(frame, main_chunks[1], history, ui_state);
        layout::render_status_line(frame, chunks[3], search, *queued);

        if ui_state.options_popup.is_some() {
            overlays::render_options_popup(frame, ui_state, probe);
        }

        if ui_state.server_editor.is_some() {
            overlays::render_server_editor(frame, ui_state);
        }

        if ui_state.notice.is_some() {
            overlays::render_notice(frame, ui_state);
        }

        if ui_state.show_help_popup {
            overlays::render_help_popup(frame, probe);
        }
    }
}
