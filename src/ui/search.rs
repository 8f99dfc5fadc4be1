//! Search components
//!
//! Header with the search box, the autosuggest overlay and the result grid.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, InputMode, Pane};
use crate::ui::view::{self, ResultsView};
use crate::ui::{pane_block, Theme};

/// Render logo and search box; returns the search box area
pub fn render_header(frame: &mut Frame, area: Rect, app: &App) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(20), Constraint::Min(1)])
        .split(area);

    let logo = Paragraph::new(Line::from(vec![
        Span::styled(
            "STREAM",
            Theme::title(),
        ),
        Span::styled(
            "AGG",
            Theme::secondary().add_modifier(Modifier::BOLD),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border()),
    );
    frame.render_widget(logo, chunks[0]);

    let editing = app.input_mode == InputMode::Editing;
    let search_text = if editing {
        let (before, after) = split_at_cursor(&app.search.query, app.search.cursor);
        // Block cursor over the char under it, or a blank at the end
        let mut rest = after.chars();
        let under = rest.next().map(String::from).unwrap_or_else(|| " ".to_string());
        Line::from(vec![
            Span::raw(format!("⌕ {}", before)),
            Span::styled(under, Theme::input_cursor()),
            Span::raw(rest.as_str().to_string()),
        ])
    } else if app.search.query.is_empty() {
        Line::from("⌕ Ctrl+K to search...")
    } else {
        Line::from(format!("⌕ {}", app.search.query))
    };

    let search_box = Paragraph::new(search_text)
        .style(if editing {
            Theme::input().fg(Theme::PRIMARY)
        } else {
            Theme::input()
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(if editing {
                    Theme::border_focused()
                } else {
                    Theme::border()
                })
                .title(Span::styled(" SEARCH ", Theme::title()))
                .title_bottom(Span::styled(
                    format!(" {} ", app.search.filter),
                    Theme::secondary(),
                )),
        );
    frame.render_widget(search_box, chunks[1]);
    chunks[1]
}

fn split_at_cursor(query: &str, cursor: usize) -> (&str, &str) {
    let at = query
        .char_indices()
        .nth(cursor)
        .map(|(i, _)| i)
        .unwrap_or(query.len());
    query.split_at(at)
}

/// Autosuggest overlay, anchored under the search box
pub fn render_autosuggest(frame: &mut Frame, anchor: Rect, body: Rect, app: &App) {
    let rows = view::autosuggest_rows(&app.search.suggestions);
    if rows.is_empty() {
        return;
    }

    let height = (rows.len() as u16 + 2).min(body.height);
    let area = Rect {
        x: anchor.x,
        y: body.y,
        width: anchor.width,
        height,
    };
    frame.render_widget(Clear, area);

    let focused = app.pane == Pane::Autosuggest;
    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let selected = focused && i == app.search.panel_list.selected;
            ListItem::new(Line::from(vec![
                Span::styled(
                    row.title.clone(),
                    if selected {
                        Theme::highlighted()
                    } else {
                        Theme::text()
                    },
                ),
                Span::raw(" "),
                Span::styled(row.year.clone(), Theme::year()),
            ]))
        })
        .collect();

    let mut block = pane_block(" SUGGESTIONS ", focused);
    if focused {
        if let Some(row) = rows.get(app.search.panel_list.selected) {
            block = block.title_bottom(Line::styled(format!(" {} ", row.thumb_url), Theme::url()));
        }
    }
    let list = List::new(items).style(Theme::input()).block(block);
    frame.render_widget(list, area);
}

/// Render the full search result grid
pub fn render_results(frame: &mut Frame, area: Rect, app: &App) {
    let results = app.search.results.as_deref().unwrap_or_default();
    let focused = app.pane == Pane::Results;
    let block = pane_block(&format!(" RESULTS ({}) ", results.len()), focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let tiles = match view::results_view(results) {
        ResultsView::Empty(message) => {
            let empty = Paragraph::new(message)
                .style(Theme::dimmed())
                .alignment(Alignment::Center);
            frame.render_widget(empty, inner);
            return;
        }
        ResultsView::Tiles(tiles) => tiles,
    };

    let items: Vec<ListItem> = tiles
        .into_iter()
        .enumerate()
        .map(|(i, tile)| {
            let selected = i == app.search.results_list.selected;
            let badge_style = if tile.badge == "TV" {
                Theme::badge_tv()
            } else {
                Theme::badge_movie()
            };
            let headline = Line::from(vec![
                Span::styled(
                    if selected { "▸ " } else { "  " },
                    if selected {
                        Theme::accent()
                    } else {
                        Theme::dimmed()
                    },
                ),
                Span::styled(format!(" {} ", tile.badge), badge_style),
                Span::raw(" "),
                Span::styled(
                    tile.title,
                    if selected && focused {
                        Theme::highlighted()
                    } else {
                        Theme::text()
                    },
                ),
                Span::raw(" "),
                Span::styled(tile.year, Theme::year()),
            ]);
            if selected && focused {
                let poster = Line::from(vec![
                    Span::raw("    "),
                    Span::styled(tile.poster_url, Theme::url()),
                ]);
                ListItem::new(Text::from(vec![headline, poster]))
            } else {
                ListItem::new(headline)
            }
        })
        .collect();

    let mut state = ListState::default().with_selected(Some(app.search.results_list.selected));
    frame.render_stateful_widget(List::new(items), inner, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_at_cursor_multibyte() {
        assert_eq!(split_at_cursor("amélie", 3), ("amé", "lie"));
        assert_eq!(split_at_cursor("dune", 10), ("dune", ""));
        assert_eq!(split_at_cursor("", 0), ("", ""));
    }
}
