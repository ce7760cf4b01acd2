//! Layout rendering (top bar, filter bar, history sidebar, status line)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Paragraph},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{
    ActiveSection, FilterChip, SearchHistoryEntry, SearchState, SearchStatus, UiState,
};
use super::utils::{border_style, item_style, render_scrollable_list, truncate_string};

pub fn render_top_bar(frame: &mut Frame, area: Rect, search: &SearchState, ui_state: &UiState, server_url: &str) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Search input
            Constraint::Length(40), // Server
        ])
        .split(area);

    let is_focused = ui_state.active_section == ActiveSection::Search;
    let search_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    };

    let search_text = if search.query.is_empty() {
        "Type to search..."
    } else {
        &search.query
    };

    let search_box = Paragraph::new(search_text)
        .style(search_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Search {} (T) ", search.search_type.label()))
                .padding(Padding::horizontal(1))
                .border_style(border_style(is_focused)),
        );
    frame.render_widget(search_box, chunks[0]);

    let server_style = if search.show_server_recommendation {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let inner_width = chunks[1].width.saturating_sub(4) as usize;
    let server = Paragraph::new(truncate_string(server_url, inner_width))
        .style(server_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Server (S) ")
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(server, chunks[1]);
}

pub fn render_filter_bar(frame: &mut Frame, area: Rect, search: &SearchState, ui_state: &UiState) {
    let is_focused = ui_state.active_section == ActiveSection::Filters;
    let chips = FilterChip::chips(&search.available_qualities);

    let mut spans = Vec::new();
    for (i, chip) in chips.iter().enumerate() {
        let active = chip.is_active(&search.filter);
        let marker = if active { "●" } else { "○" };
        let mut style = if active {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::White)
        };
        if is_focused && i == ui_state.filter_selected {
            style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
        }
        spans.push(Span::styled(format!(" {} {} ", marker, chip.label()), style));
        spans.push(Span::raw(" "));
    }

    let reveal = if search.show_unsupported_formats {
        "unsupported shown (U)"
    } else {
        "unsupported hidden (U)"
    };
    spans.push(Span::styled(reveal, Style::default().fg(Color::DarkGray)));

    let title = if search.filter.is_empty() {
        " Filters ".to_string()
    } else {
        format!(
            " Filters ({} active) ",
            search.filter.qualities.len() + search.filter.content_filters.len()
        )
    };

    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border_style(is_focused)),
    );
    frame.render_widget(bar, area);
}

pub fn render_history(frame: &mut Frame, area: Rect, history: &[SearchHistoryEntry], ui_state: &UiState) {
    let is_focused = ui_state.active_section == ActiveSection::History;
    let inner_width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = history
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let style = item_style(i == ui_state.history_selected, is_focused);
            ListItem::new(truncate_string(&entry.query, inner_width)).style(style)
        })
        .collect();

    let title = if is_focused {
        " History (Del, C) "
    } else {
        " History "
    };

    render_scrollable_list(
        frame,
        area,
        items,
        ui_state.history_selected,
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .padding(Padding::horizontal(1))
            .border_style(border_style(is_focused)),
    );
}

pub fn render_status_line(frame: &mut Frame, area: Rect, search: &SearchState, queued: usize) {
    let (text, color) = match search.status {
        SearchStatus::Empty => ("Type a query".to_string(), Color::DarkGray),
        SearchStatus::Ready => ("Press Enter to search".to_string(), Color::DarkGray),
        SearchStatus::Loading => ("Searching...".to_string(), Color::Yellow),
        SearchStatus::Success => (
            format!(
                "{} of {} results shown",
                search.filtered_results.len(),
                search.results.len()
            ),
            Color::Green,
        ),
        SearchStatus::NoResults => ("No results".to_string(), Color::DarkGray),
        SearchStatus::Error => ("Search failed".to_string(), Color::Red),
    };

    let mut spans = vec![Span::styled(format!(" {} ", text), Style::default().fg(color))];
    if queued > 0 {
        spans.push(Span::styled(
            format!("  {} queued", queued),
            Style::default().fg(Color::Cyan),
        ));
    }
    spans.push(Span::styled("  H help · Q quit", Style::default().fg(Color::DarkGray)));
    let line = Line::from(spans);
    frame.render_widget(Paragraph::new(line), area);
}
