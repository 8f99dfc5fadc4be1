//! Terminal UI components
//!
//! Built with ratatui for a neon aesthetic.
//! Keyboard-first navigation throughout.

pub mod episodes;
pub mod feed;
pub mod player;
pub mod search;
pub mod theme;
pub mod view;

pub use theme::Theme;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Pane};

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(Style::default().bg(Theme::BACKGROUND)), area);

    // Header, content, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    let search_area = search::render_header(frame, chunks[0], app);
    render_body(frame, chunks[1], app);
    render_status_bar(frame, chunks[2], app);

    if app.search.panel_visible {
        search::render_autosuggest(frame, search_area, chunks[1], app);
    }
    if app.loading {
        render_loading(frame, area);
    }
    if let Some(alert) = &app.alert {
        render_alert(frame, area, alert);
    }
}

fn render_body(frame: &mut Frame, area: Rect, app: &App) {
    // Fullscreen player takes the whole body
    if app.player.fullscreen && app.player.visible {
        player::render_player(frame, area, app);
        return;
    }

    let has_right = app.picker.visible || app.sources.visible || app.player.visible;
    let columns = if has_right {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area)
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(100)])
            .split(area)
    };

    render_left(frame, columns[0], app);
    if has_right {
        render_right(frame, columns[1], app);
    }
}

fn render_left(frame: &mut Frame, area: Rect, app: &App) {
    match (app.feed.visible, app.search.results.is_some()) {
        (true, true) => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(area);
            feed::render_feed(frame, rows[0], app);
            search::render_results(frame, rows[1], app);
        }
        (true, false) => feed::render_feed(frame, area, app),
        (false, true) => search::render_results(frame, area, app),
        (false, false) => render_welcome(frame, area),
    }
}

fn render_right(frame: &mut Frame, area: Rect, app: &App) {
    let mut constraints = Vec::new();
    if app.picker.visible {
        constraints.push(Constraint::Min(6));
    }
    if app.sources.visible {
        constraints.push(Constraint::Length(player::sources_height(app)));
    }
    if app.player.visible {
        constraints.push(Constraint::Length(6));
    }
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let mut slot = rows.iter().copied();
    if app.picker.visible {
        if let Some(rect) = slot.next() {
            episodes::render_picker(frame, rect, app);
        }
    }
    if app.sources.visible {
        if let Some(rect) = slot.next() {
            player::render_sources(frame, rect, app);
        }
    }
    if app.player.visible {
        if let Some(rect) = slot.next() {
            player::render_player(frame, rect, app);
        }
    }
}

fn render_welcome(frame: &mut Frame, area: Rect) {
    let block = pane_block(" STREAMAGG ", false);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let help = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("Search for a movie or show", Theme::text())),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Ctrl+K ", Theme::keybind()),
            Span::styled("Focus search", Theme::dimmed()),
        ]),
        Line::from(vec![
            Span::styled("  r      ", Theme::keybind()),
            Span::styled("Reload suggestions", Theme::dimmed()),
        ]),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(help, inner);
}

/// Render the status bar: notice, or focus-specific key hints
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let line = match &app.notice {
        Some(notice) => Line::from(Span::styled(format!(" ℹ {}", notice), Theme::accent())),
        None => {
            let hints: &[(&str, &str)] = match app.pane {
                Pane::Search => &[("↵", "search"), ("↓", "suggestions"), ("Esc", "close"), ("Tab", "next")],
                Pane::Feed => &[("←→", "genre"), ("↵", "select"), ("r", "reload"), ("m", "filter")],
                Pane::Sources => &[("1-9", "source"), ("f", "fullscreen"), ("t", "subtitles")],
                _ => &[("↑↓", "move"), ("↵", "select"), ("Tab", "next"), ("q", "quit")],
            };
            let mut spans = vec![Span::styled(
                format!(" [{}] ", app.search.filter),
                Theme::secondary(),
            )];
            for (key, desc) in hints {
                spans.push(Span::styled(format!(" {} ", key), Theme::keybind()));
                spans.push(Span::styled(format!("{} ", desc), Theme::keybind_desc()));
            }
            Line::from(spans)
        }
    };
    frame.render_widget(Paragraph::new(line).style(Theme::status_bar()), area);
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(24, 3, area);
    frame.render_widget(Clear, popup);
    let loading = Paragraph::new("⟳ Loading...")
        .style(Theme::loading())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Theme::border_focused()),
        );
    frame.render_widget(loading, popup);
}

/// Blocking alert popup
fn render_alert(frame: &mut Frame, area: Rect, message: &str) {
    let popup = centered_rect(56, 7, area);
    frame.render_widget(Clear, popup);

    let text = vec![
        Line::from(Span::styled(message.to_string(), Theme::text())),
        Line::from(""),
        Line::from(Span::styled("[Enter] OK", Theme::keybind())),
    ];
    let alert = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Theme::error())
                .title(Span::styled(
                    " ⚠ ALERT ",
                    Style::default().fg(Theme::ERROR).add_modifier(Modifier::BOLD),
                )),
        );
    frame.render_widget(alert, popup);
}

/// Bordered block shared by every region
pub(crate) fn pane_block(title: &str, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            Theme::border_focused()
        } else {
            Theme::border()
        })
        .title(Span::styled(title.to_string(), Theme::title()))
}

/// Fixed-size rect centered in `area`, clamped to fit
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_clamps() {
        let area = Rect::new(0, 0, 20, 5);
        let rect = centered_rect(56, 7, area);
        assert_eq!(rect, Rect::new(0, 0, 20, 5));

        let rect = centered_rect(10, 3, Rect::new(0, 0, 40, 10));
        assert_eq!(rect, Rect::new(15, 3, 10, 3));
    }
}
