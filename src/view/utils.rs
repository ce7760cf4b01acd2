//! Utility functions for rendering UI components

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, List, ListItem, ListState},
    Frame,
};

pub fn render_scrollable_list(
    frame: &mut Frame,
    area: Rect,
    items: Vec<ListItem>,
    selected_index: usize,
    block: Block,
) {
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default()); // Highlight handled by item styles

    let mut list_state = ListState::default();
    list_state.select(Some(selected_index));

    frame.render_stateful_widget(list, area, &mut list_state);
}

pub fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    }
}

pub fn item_style(is_selected: bool, is_focused: bool) -> Style {
    if is_selected && is_focused {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else if is_selected {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

/// Calculate width needed for index column (log10(n) + padding)
pub fn calculate_num_width(item_count: usize) -> usize {
    if item_count == 0 {
        2
    } else {
        let digits = (item_count as f64).log10().floor() as usize + 1;
        digits + 1
    }
}

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() > max_width {
        let truncated: String = s.chars().take(max_width.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_width)
    } else {
        format!("{:<width$}", s, width = max_width)
    }
}

/// Column widths for result rows
/// Returns (num_width, title_width, artist_width, tags_width, duration_width)
pub fn calculate_result_column_widths(content_width: usize, item_count: usize) -> (usize, usize, usize, usize, usize) {
    // Format: " {num}   {title}   {artist}   {tags}   {duration}"
    let num_width = calculate_num_width(item_count);
    let tags_width = 12;
    let duration_width = 6;
    let fixed_width = 1 + num_width + 3 + 3 + 3 + tags_width + 3 + duration_width;
    let remaining_width = content_width.saturating_sub(fixed_width);
    let title_width = (remaining_width * 55) / 100;
    let artist_width = remaining_width.saturating_sub(title_width);

    (num_width, title_width, artist_width, tags_width, duration_width)
}

/// Short badge for the formats a result carries
pub fn format_badges(formats: Option<&[String]>, explicit: bool) -> String {
    let mut badges = Vec::new();
    if explicit {
        badges.push("E");
    }
    for format in formats.unwrap_or_default() {
        match format.as_str() {
            "HIRES_LOSSLESS" => badges.push("HR"),
            "LOSSLESS" => badges.push("LL"),
            "DOLBY_ATMOS" => badges.push("ATM"),
            _ => {}
        }
    }
    badges.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_pads_to_width() {
        assert_eq!(truncate_string("abc", 5), "abc  ");
        assert_eq!(truncate_string("abcdefgh", 6), "abc...");
    }

    #[test]
    fn num_width_grows_with_count() {
        assert_eq!(calculate_num_width(0), 2);
        assert_eq!(calculate_num_width(9), 2);
        assert_eq!(calculate_num_width(10), 3);
    }

    #[test]
    fn badges_list_known_formats() {
        let formats = vec!["LOSSLESS".to_string(), "DOLBY_ATMOS".to_string(), "MQA".to_string()];
        assert_eq!(format_badges(Some(&formats), true), "E LL ATM");
        assert_eq!(format_badges(None, false), "");
    }
}
