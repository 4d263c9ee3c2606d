//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  This makes it easy to change the
//! visual layout without touching business logic.
//!
//! ## For contributors
//!
//! * Layout, top to bottom: the feed URL field, a one-line feedback message,
//!   the feeds and posts panes side by side, and a one-line status bar.
//!   The post detail is drawn as a popup over everything.
//! * Unread posts are bold; seen posts are dimmed.
//! * [`ratatui`] is the TUI framework; see its docs for widget details.

use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus};
use crate::source::Post;
use crate::state::AddFeedStatus;

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [input_area, feedback_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let [feeds_area, posts_area] =
        Layout::horizontal([Constraint::Percentage(30), Constraint::Percentage(70)])
            .areas(main_area);

    draw_input(app, frame, input_area);
    draw_feedback(app, frame, feedback_area);
    draw_feeds(app, frame, feeds_area);
    draw_posts(app, frame, posts_area);
    draw_status_bar(app, frame, status_area);

    if let Some(post) = &app.detail {
        draw_detail(post, frame);
    }
}

fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}

/// Render the feed URL field.
fn draw_input(app: &App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == Focus::Input;
    let text_style = match app.status {
        AddFeedStatus::Sending => Style::default().fg(Color::DarkGray),
        AddFeedStatus::Error => Style::default().fg(Color::Red),
        _ => Style::default(),
    };

    let input = Paragraph::new(app.input.as_str())
        .style(text_style)
        .block(pane_block(" Add RSS feed ", focused));
    frame.render_widget(input, area);

    if focused && app.input_enabled() {
        let x = area.x + 1 + app.input.chars().count() as u16;
        frame.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

/// Render the single feedback message.
fn draw_feedback(app: &App, frame: &mut Frame, area: Rect) {
    let Some(feedback) = app.feedback else {
        return;
    };
    let colour = if feedback.is_error() {
        Color::Red
    } else {
        Color::Green
    };
    let line = Line::from(Span::styled(
        format!(" {feedback}"),
        Style::default().fg(colour),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the subscribed feeds with their descriptions.
fn draw_feeds(app: &App, frame: &mut Frame, area: Rect) {
    let items: Vec<ListItem> = app
        .feeds
        .iter()
        .map(|feed| {
            ListItem::new(Text::from(vec![
                Line::from(Span::styled(
                    feed.title.as_str(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    feed.description.as_str(),
                    Style::default().fg(Color::DarkGray),
                )),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(pane_block(" Feeds ", false)), area);
}

/// Render the scrollable post list.
fn draw_posts(app: &mut App, frame: &mut Frame, area: Rect) {
    let labels: Vec<String> = app
        .posts
        .iter()
        .map(|post| format!("[{}]", app.feed_title(&post.feed_url)))
        .collect();

    let items: Vec<ListItem> = app
        .posts
        .iter()
        .zip(labels)
        .map(|(post, label)| {
            let date_str = post
                .published
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "no date".into());

            let title_style = if post.seen {
                Style::default().fg(Color::Gray)
            } else {
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            };

            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<18}", date_str),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(" "),
                Span::styled(post.title.as_str(), title_style),
                Span::raw("  "),
                Span::styled(label, Style::default().fg(Color::Cyan)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(pane_block(" Posts ", app.focus == Focus::Posts))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let help = match app.focus {
        Focus::Input => "  Enter: add  Tab: posts  Ctrl-C: quit",
        Focus::Posts => "  Enter: open  r: refresh  Tab: add feed  q: quit",
    };
    let status = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} feeds", app.feeds.len()),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{} posts ({} unread)", app.posts.len(), app.unread_count()),
            Style::default().fg(Color::Green),
        ),
        Span::raw(help),
    ]));
    frame.render_widget(status, area);
}

/// Render the post detail popup.
fn draw_detail(post: &Post, frame: &mut Frame) {
    let area = centered(frame.area(), 70, 60);

    let body = Text::from(vec![
        Line::from(post.description.as_str()),
        Line::raw(""),
        Line::from(Span::styled(
            post.link.as_str(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::UNDERLINED),
        )),
    ]);

    let popup = Paragraph::new(body)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(format!(" {} ", post.title))
                .title_bottom(" Esc: close ")
                .borders(Borders::ALL),
        );

    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

/// A rectangle of the given percentage size centred in `area`.
fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [area] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(area);
    area
}

// ---------------------------------------------------------------------------
// Tests (smoke tests)
// ---------------------------------------------------------------------------
