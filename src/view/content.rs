//! Results pane rendering (search results, album track list, messages)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, ListItem, Paragraph, Wrap},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{
    ActiveSection, AlbumView, CodecCapabilityProbe, SearchResult, SearchState, SearchStatus, UiState,
};
use super::utils::{
    border_style, calculate_result_column_widths, format_badges, item_style,
    render_scrollable_list, truncate_string,
};

pub fn render_results(
    frame: &mut Frame,
    area: Rect,
    search: &SearchState,
    ui_state: &UiState,
    probe: &CodecCapabilityProbe,
) {
    let is_focused = ui_state.active_section == ActiveSection::Results;

    if let Some(album) = &ui_state.album {
        render_album(frame, area, album, is_focused, probe);
        return;
    }

    let message = match search.status {
        SearchStatus::Empty | SearchStatus::Ready if search.results.is_empty() => Some((
            "Type in search and press Enter to find music\n\nUse Tab to navigate between sections\nUse ↑/↓ to select items\nPress Enter to pick a quality".to_string(),
            Color::DarkGray,
        )),
        SearchStatus::Loading if search.results.is_empty() => {
            Some(("Loading...".to_string(), Color::Yellow))
        }
        SearchStatus::NoResults => Some((format!("No results for \"{}\"", search.query), Color::DarkGray)),
        SearchStatus::Error => {
            let color = if search.show_server_recommendation {
                Color::Yellow
            } else {
                Color::Red
            };
            Some((search.error.clone().unwrap_or_default(), color))
        }
        _ if search.filtered_results.is_empty() => Some((
            "No results match the active filters".to_string(),
            Color::DarkGray,
        )),
        _ => None,
    };

    if let Some((text, color)) = message {
        let content = Paragraph::new(text)
            .style(Style::default().fg(color))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Results ")
                    .padding(Padding::horizontal(1))
                    .border_style(border_style(is_focused)),
            );
        frame.render_widget(content, area);
        return;
    }

    let title = if search.status == SearchStatus::Loading {
        " Results (searching...) ".to_string()
    } else {
        format!(" {} ({}) ", search.search_type.label(), search.filtered_results.len())
    };

    let content_width = area.width.saturating_sub(4) as usize;
    let items = result_items(
        &search.filtered_results,
        ui_state.results_selected,
        is_focused,
        content_width,
        probe,
    );

    render_scrollable_list(
        frame,
        area,
        items,
        ui_state.results_selected + 1, // +1 for header
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .padding(Padding::horizontal(1))
            .border_style(border_style(is_focused)),
    );
}

fn render_album(
    frame: &mut Frame,
    area: Rect,
    album: &AlbumView,
    is_focused: bool,
    probe: &CodecCapabilityProbe,
) {
    let content_width = area.width.saturating_sub(4) as usize;
    let items = result_items(&album.tracks, album.selected, is_focused, content_width, probe);
    let title = format!(" {} - {} (Esc to go back) ", album.album.title, album.album.artist_line());

    render_scrollable_list(
        frame,
        area,
        items,
        album.selected + 1,
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .padding(Padding::horizontal(1))
            .border_style(border_style(is_focused)),
    );
}

fn result_items(
    results: &[SearchResult],
    selected_index: usize,
    is_focused: bool,
    content_width: usize,
    probe: &CodecCapabilityProbe,
) -> Vec<ListItem<'static>> {
    let (num_width, title_width, artist_width, tags_width, duration_width) =
        calculate_result_column_widths(content_width, results.len());

    let header = ListItem::new(format!(
        " {:<num_width$}   {}   {}   {}   {:>duration_width$}",
        "#",
        truncate_string("Title", title_width),
        truncate_string("Artist", artist_width),
        truncate_string("Quality", tags_width),
        "Time",
    ))
    .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let rows = results.iter().enumerate().map(|(i, result)| {
        let badges = format_badges(result.formats.as_deref(), result.explicit);
        let selected = i == selected_index;
        let mut style = item_style(selected, is_focused);
        // Nothing in this row plays here
        if !selected && result.formats.is_some() && !result.has_supported_format(probe) {
            style = style.fg(Color::DarkGray);
        }
        ListItem::new(format!(
            " {:<num_width$}   {}   {}   {}   {:>duration_width$}",
            i + 1,
            truncate_string(&result.title, title_width),
            truncate_string(&result.artist_line(), artist_width),
            truncate_string(&badges, tags_width),
            result.duration,
        ))
        .style(style)
    });

    std::iter::once(header).chain(rows).collect()
}
