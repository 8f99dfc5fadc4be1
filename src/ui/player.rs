//! Source row and player region

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Pane};
use crate::ui::view;
use crate::ui::{pane_block, Theme};

/// Rows needed by the source selector, borders included
pub fn sources_height(app: &App) -> u16 {
    (app.sources.sources.len().max(1) as u16).min(9) + 2
}

pub fn render_sources(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.pane == Pane::Sources;
    let block = pane_block(" 🔗 SOURCES ", focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let buttons = view::source_buttons(&app.sources.sources, &app.player);
    if buttons.is_empty() {
        frame.render_widget(
            Paragraph::new("No streaming sources found.")
                .style(Theme::warning())
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let lines: Vec<Line> = buttons
        .iter()
        .enumerate()
        .map(|(i, button)| {
            let cursor = focused && i == app.sources.list.selected;
            let name_style = if button.active {
                Theme::source_active()
            } else if cursor {
                Theme::selected()
            } else {
                Theme::text()
            };
            let mut spans = vec![
                Span::styled(format!("{} ", i + 1), Theme::keybind()),
                Span::styled(format!(" {} ", button.name), name_style),
                Span::raw(" "),
                Span::styled(button.quality.clone(), Theme::quality_badge()),
            ];
            if button.subtitles {
                spans.push(Span::styled(" CC", Theme::subtitle_marker()));
            }
            Line::from(spans)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

pub fn render_player(frame: &mut Frame, area: Rect, app: &App) {
    let Some(panel) = view::player_panel(&app.player) else {
        return;
    };
    let title = if panel.fullscreen {
        " ▶ PLAYER [FULLSCREEN] "
    } else {
        " ▶ PLAYER "
    };
    let block = pane_block(title, app.pane == Pane::Sources);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = vec![
        Line::from(Span::styled(panel.label, Theme::success())),
        Line::from(Span::styled(panel.url, Theme::url())),
        Line::from(vec![
            Span::styled(" f ", Theme::keybind()),
            Span::styled("fullscreen ", Theme::keybind_desc()),
            Span::styled(" t ", Theme::keybind()),
            Span::styled("subtitles", Theme::keybind_desc()),
        ]),
    ];
    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), inner);
}
