//! Season and episode choosers

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, Pane};
use crate::ui::view;
use crate::ui::{pane_block, Theme};

pub fn render_picker(frame: &mut Frame, area: Rect, app: &App) {
    let title = app
        .selection
        .as_ref()
        .map(|s| format!(" 📺 {} ", s))
        .unwrap_or_else(|| " 📺 EPISODES ".to_string());
    let focused = matches!(app.pane, Pane::Seasons | Pane::Episodes);
    let block = pane_block(&title, focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(inner);

    let seasons: Vec<String> = view::season_options(&app.picker.seasons)
        .into_iter()
        .map(|o| o.label)
        .collect();
    render_options(
        frame,
        columns[0],
        "Select Season",
        &seasons,
        app.picker.season_list.selected,
        app.pane == Pane::Seasons,
    );

    let episodes: Vec<String> = view::episode_options(&app.picker.episodes)
        .into_iter()
        .map(|o| o.label)
        .collect();
    render_options(
        frame,
        columns[1],
        "Select Episode",
        &episodes,
        app.picker.episode_list.selected,
        app.pane == Pane::Episodes,
    );
}

fn render_options(
    frame: &mut Frame,
    area: Rect,
    placeholder: &str,
    labels: &[String],
    selected: usize,
    focused: bool,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    frame.render_widget(
        Paragraph::new(Span::styled(
            placeholder.to_string(),
            if focused {
                Theme::accent()
            } else {
                Theme::dimmed()
            },
        ))
        .alignment(Alignment::Left),
        rows[0],
    );

    let items: Vec<ListItem> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let style = if focused && i == selected {
                Theme::list_item_selected()
            } else {
                Theme::list_item()
            };
            ListItem::new(Line::from(Span::styled(label.clone(), style)))
        })
        .collect();

    let mut state = ListState::default().with_selected(Some(selected));
    frame.render_stateful_widget(List::new(items), rows[1], &mut state);
}
