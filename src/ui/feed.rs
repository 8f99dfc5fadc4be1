//! Suggestion feed
//!
//! Genre tabs over a list of suggestion cards.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{List, ListItem, ListState, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, Pane};
use crate::ui::view::{self, FeedView, SuggestionCard};
use crate::ui::{pane_block, Theme};

pub fn render_feed(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.pane == Pane::Feed;
    let block = pane_block(" ⚡ SUGGESTIONS ", focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let tabs = view::genre_tabs(app.feed.genre);
    let active = tabs.iter().position(|t| t.active);
    let titles: Vec<Line> = tabs.iter().map(|t| Line::from(t.label)).collect();
    // No tab is highlighted until one has been chosen
    let tabs = Tabs::new(titles)
        .style(Theme::dimmed())
        .highlight_style(if active.is_some() {
            Theme::tab_active()
        } else {
            Theme::dimmed()
        })
        .select(active.unwrap_or(0))
        .divider(Span::styled("│", Theme::dimmed()));
    frame.render_widget(tabs, chunks[0]);

    match view::feed_view(&app.feed) {
        FeedView::Loading(message) => {
            frame.render_widget(
                Paragraph::new(message)
                    .style(Theme::loading())
                    .alignment(Alignment::Center),
                chunks[1],
            );
        }
        FeedView::Empty(message) => {
            frame.render_widget(
                Paragraph::new(message)
                    .style(Theme::dimmed())
                    .alignment(Alignment::Center),
                chunks[1],
            );
        }
        FeedView::Error(message) => {
            frame.render_widget(
                Paragraph::new(message)
                    .style(Theme::error())
                    .alignment(Alignment::Center),
                chunks[1],
            );
        }
        FeedView::Cards(cards) => {
            let selected = app.feed.list.selected;
            let items: Vec<ListItem> = cards
                .iter()
                .enumerate()
                .map(|(i, card)| card_item(card, focused && i == selected))
                .collect();
            let mut state = ListState::default().with_selected(Some(selected));
            frame.render_stateful_widget(List::new(items), chunks[1], &mut state);
        }
    }
}

fn card_item(card: &SuggestionCard, selected: bool) -> ListItem<'static> {
    let badge_style = if card.badge == "TV" {
        Theme::badge_tv()
    } else {
        Theme::badge_movie()
    };
    let headline = Line::from(vec![
        Span::styled(format!(" {} ", card.badge), badge_style),
        Span::raw(" "),
        Span::styled(
            card.title.clone(),
            if selected {
                Theme::highlighted()
            } else {
                Theme::text()
            },
        ),
        Span::raw(" "),
        Span::styled(card.year.clone(), Theme::year()),
        Span::raw("  "),
        Span::styled(format!("★ {}", card.rating), Theme::rating(&card.rating)),
    ]);
    if !selected {
        return ListItem::new(headline);
    }
    let poster = Line::from(vec![
        Span::raw("       "),
        Span::styled(card.poster_url.clone(), Theme::url()),
    ]);
    ListItem::new(Text::from(vec![headline, poster]))
}
