//! Overlay rendering (notice, quality picker, server editor, help popup)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::model::{CodecCapabilityProbe, UiState, QUALITY_CATALOG};

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    Rect {
        x: area.width.saturating_sub(width) / 2,
        y: area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

pub fn render_notice(frame: &mut Frame, ui_state: &UiState) {
    if let Some(ref message) = ui_state.notice {
        let area = frame.area();

        let popup_width = 52.min(area.width.saturating_sub(4));
        let inner_width = popup_width.saturating_sub(4).max(1) as usize;
        let line_count = message.chars().count().div_ceil(inner_width) as u16;

        // Top border (1) + message lines + bottom border (1)
        let popup_area = centered(area, popup_width, 2 + line_count.max(1));

        frame.render_widget(Clear, popup_area);

        let notice = Paragraph::new(message.to_string())
            .style(Style::default().fg(Color::Yellow))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow))
                    .title(" Notice (Esc to dismiss) ")
                    .title_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
                    .style(Style::default().bg(Color::Black)),
            );

        frame.render_widget(notice, popup_area);
    }
}

pub fn render_options_popup(frame: &mut Frame, ui_state: &UiState, probe: &CodecCapabilityProbe) {
    let Some(popup) = &ui_state.options_popup else {
        return;
    };
    let area = frame.area();
    let visible = popup.options.visible(probe);

    let popup_height = (visible.len().max(1) as u16 * 2) + 4;
    let popup_area = centered(area, 56, popup_height);

    frame.render_widget(Clear, popup_area);

    let title = format!(" {} (↑↓ Enter Esc) ", popup.track.title);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title)
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(Color::Black));

    if visible.is_empty() {
        let text = if popup.options.options().is_empty() {
            "No download options for this track."
        } else {
            "None of this track's formats play on this device.\nPress U to show unsupported formats."
        };
        let empty = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: false })
            .block(block);
        frame.render_widget(empty, popup_area);
        return;
    }

    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(i, tier)| {
            let style = if i == popup.selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else if tier.is_supported(probe) {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let unsupported = if tier.is_supported(probe) { "" } else { "  (unsupported)" };

            ListItem::new(vec![
                Line::from(format!("{} [{}]{}", tier.label, tier.short_label, unsupported)),
                Line::from(Span::styled(
                    format!("  {}", tier.summary),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .style(style)
        })
        .collect();

    let list = List::new(items).block(block);

    let mut list_state = ListState::default();
    list_state.select(Some(popup.selected));

    frame.render_stateful_widget(list, popup_area, &mut list_state);
}

pub fn render_server_editor(frame: &mut Frame, ui_state: &UiState) {
    let Some(text) = &ui_state.server_editor else {
        return;
    };
    let popup_area = centered(frame.area(), 64, 3);

    frame.render_widget(Clear, popup_area);

    let editor = Paragraph::new(format!("{}▏", text))
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Server URL (Enter to save, Esc to cancel) ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        );
    frame.render_widget(editor, popup_area);
}

pub fn render_help_popup(frame: &mut Frame, probe: &CodecCapabilityProbe) {
    let area = frame.area();

    let mut keybindings: Vec<(&str, String)> = [
        ("", "── Navigation ──"),
        ("Tab / Shift+Tab", "Cycle sections"),
        ("↑ / ↓", "Move selection"),
        ("Enter", "Search / Toggle / Open"),
        ("Backspace / Esc", "Go back"),
        ("G or /", "Focus search"),
        ("", ""),
        ("", "── Search ──"),
        ("Esc", "Clear search (in search box)"),
        ("Ctrl+U", "Clear query text (in search box)"),
        ("T", "Tracks / Albums"),
        ("U", "Show / hide unsupported formats"),
        ("S", "Edit server URL"),
        ("N", "Cycle file naming"),
        ("R", "Reset settings"),
        ("", ""),
        ("", "── History ──"),
        ("Enter", "Search again"),
        ("Delete", "Remove entry"),
        ("C", "Clear history"),
        ("", ""),
        ("", "── General ──"),
        ("H", "Toggle this help"),
        ("Q", "Quit (Ctrl+Q in search box)"),
        ("", ""),
        ("", "── Quality tiers ──"),
    ]
    .into_iter()
    .map(|(key, desc)| (key, desc.to_string()))
    .collect();

    for tier in QUALITY_CATALOG {
        let playable = if tier.is_supported(probe) { "" } else { ", not on this device" };
        let variant = if tier.alternate_codec { ", newer codec" } else { "" };
        keybindings.push((tier.short_label, format!("{}{}{}", tier.label, variant, playable)));
    }

    let popup_area = centered(area, 76, keybindings.len() as u16 + 2);

    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = keybindings
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                // Section header or empty line
                Line::from(Span::styled(
                    format!("{:^38}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>18}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc.to_string(), Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help (H or Esc to close) ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help_text, popup_area);
}
