//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::ActiveSection;
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let model = self.model.lock().await;

        // Help popup blocks everything else
        if model.is_help_popup_open().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H')) {
                model.hide_help_popup().await;
            }
            return Ok(());
        }

        // Server URL editor captures all typing
        if model.is_server_editor_open().await {
            match key.code {
                KeyCode::Enter => {
                    let url = model.take_server_editor().await.unwrap_or_default();
                    drop(model);
                    self.save_server_url(url).await;
                }
                KeyCode::Esc => {
                    model.take_server_editor().await;
                }
                KeyCode::Backspace => model.server_editor_pop().await,
                KeyCode::Char(c) => model.server_editor_push(c).await,
                _ => {}
            }
            return Ok(());
        }

        // Quality picker
        if let Some(popup) = model.get_options_popup().await {
            match key.code {
                KeyCode::Up => model.options_move_up().await,
                KeyCode::Down => {
                    let visible = popup.options.visible(self.session.probe()).len();
                    model.options_move_down(visible).await;
                }
                KeyCode::Enter => {
                    drop(model);
                    self.confirm_download().await;
                }
                KeyCode::Char('u') | KeyCode::Char('U') => {
                    drop(model);
                    self.toggle_show_unsupported().await;
                }
                KeyCode::Esc | KeyCode::Backspace => model.hide_options_popup().await,
                _ => {}
            }
            return Ok(());
        }

        // Notices are dismissed by Esc before anything else sees it
        if key.code == KeyCode::Esc && model.has_notice().await {
            model.clear_notice().await;
            return Ok(());
        }

        let ui_state = model.get_ui_state().await;

        // Handle search input when in search section
        if ui_state.active_section == ActiveSection::Search {
            match key.code {
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        model.cycle_section_backward().await;
                    } else {
                        model.cycle_section_forward().await;
                    }
                    return Ok(());
                }
                KeyCode::BackTab => {
                    model.cycle_section_backward().await;
                    return Ok(());
                }
                KeyCode::Enter => {
                    model.set_active_section(ActiveSection::Results).await;
                    drop(model);
                    self.spawn_search();
                    return Ok(());
                }
                KeyCode::Esc => {
                    drop(model);
                    self.session.clear_search().await;
                    return Ok(());
                }
                KeyCode::Backspace => {
                    drop(model);
                    self.session.pop_query_char().await;
                    return Ok(());
                }
                KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    drop(model);
                    self.session.set_query(String::new()).await;
                    return Ok(());
                }
                KeyCode::Char(c) => {
                    // Q still quits even in search mode when Ctrl is pressed
                    if (c == 'q' || c == 'Q') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        model.set_should_quit(true).await;
                        return Ok(());
                    }
                    drop(model);
                    self.session.push_query_char(c).await;
                    return Ok(());
                }
                _ => {}
            }
        }

        // Album track list replaces the results pane while open
        if ui_state.active_section == ActiveSection::Results && ui_state.album.is_some() {
            match key.code {
                KeyCode::Up => {
                    model.album_move_up().await;
                    return Ok(());
                }
                KeyCode::Down => {
                    model.album_move_down().await;
                    return Ok(());
                }
                KeyCode::Enter => {
                    let track = model.get_selected_album_track().await;
                    drop(model);
                    if let Some(track) = track {
                        self.open_download_options(track).await;
                    }
                    return Ok(());
                }
                KeyCode::Backspace | KeyCode::Esc => {
                    model.close_album().await;
                    return Ok(());
                }
                _ => {}
            }
        }

        if ui_state.active_section == ActiveSection::History {
            match key.code {
                KeyCode::Enter => {
                    drop(model);
                    self.run_selected_history().await;
                    return Ok(());
                }
                KeyCode::Delete => {
                    drop(model);
                    self.delete_selected_history().await;
                    return Ok(());
                }
                KeyCode::Char('c') | KeyCode::Char('C') => {
                    drop(model);
                    self.clear_history().await;
                    return Ok(());
                }
                _ => {}
            }
        }

        // Global keybindings
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit(true).await;
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    model.cycle_section_backward().await;
                } else {
                    model.cycle_section_forward().await;
                }
            }
            KeyCode::BackTab => {
                model.cycle_section_backward().await;
            }
            KeyCode::Up => {
                model.move_selection_up().await;
            }
            KeyCode::Down => {
                drop(model);
                let (filters, results, history) = self.list_lengths().await;
                let len = match ui_state.active_section {
                    ActiveSection::Filters => filters,
                    ActiveSection::Results => results,
                    ActiveSection::History => history,
                    ActiveSection::Search => 0,
                };
                self.model.lock().await.move_selection_down(len).await;
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                drop(model);
                match ui_state.active_section {
                    ActiveSection::Filters => self.toggle_selected_filter().await,
                    ActiveSection::Results => self.open_selected_result().await,
                    _ => {}
                }
            }
            // Reveal unsupported formats
            KeyCode::Char('u') | KeyCode::Char('U') => {
                drop(model);
                self.toggle_show_unsupported().await;
            }
            // Tracks / Albums
            KeyCode::Char('t') | KeyCode::Char('T') => {
                drop(model);
                self.toggle_search_type().await;
            }
            // Edit server URL
            KeyCode::Char('s') | KeyCode::Char('S') => {
                let current = self.settings.server_url().await;
                model.open_server_editor(current).await;
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                drop(model);
                self.cycle_file_naming_format().await;
            }
            // Uppercase only
            KeyCode::Char('R') => {
                drop(model);
                self.reset_settings().await;
            }
            // Focus search
            KeyCode::Char('g') | KeyCode::Char('G') | KeyCode::Char('/') => {
                model.set_active_section(ActiveSection::Search).await;
            }
            // Show help popup
            KeyCode::Char('h') | KeyCode::Char('H') => {
                model.show_help_popup().await;
            }
            _ => {}
        }
        Ok(())
    }
}
