//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).
//!
//! ## Layout
//!
//! ```text
//! ┌ Rivers ───┐┌ <selected river> ─────────────────┐
//! │▸ Tech     ││ Feed title              updated…  │
//! │  News     ││   2024-01-01 11:00  Headline      │
//! │           ││       body text                   │
//! └───────────┘└───────────────────────────────────┘
//!  status  ·  n rivers  ·  key help
//! ```

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::river::{River, RiverContent};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [main_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());
    let [list_area, content_area] =
        Layout::horizontal([Constraint::Percentage(25), Constraint::Min(20)]).areas(main_area);

    draw_river_list(app, frame, list_area);
    draw_content(app, frame, content_area);
    draw_status_bar(app, frame, status_area);
}

fn draw_river_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let items: Vec<ListItem> = app
        .rivers
        .iter()
        .map(|feed| ListItem::new(Line::from(feed.name.as_str())))
        .collect();

    let list = List::new(items)
        .block(Block::default().title(" Rivers ").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn draw_content(app: &App, frame: &mut Frame, area: Rect) {
    let title = match app.selected_feed() {
        Some(feed) => format!(" {} ", feed.name),
        None => " River ".to_string(),
    };

    let lines = match &app.content {
        Some(content) => content_lines(content),
        None if app.rivers.is_empty() => vec![placeholder("No rivers loaded")],
        None => vec![placeholder("Nothing loaded yet")],
    };

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title(title).borders(Borders::ALL))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0));
    frame.render_widget(paragraph, area);
}

fn placeholder(text: &str) -> Line<'_> {
    Line::styled(text, Style::default().fg(Color::DarkGray))
}

/// Lines for the content pane: the river layout when there is one, the raw
/// JSON otherwise.
pub fn content_lines(content: &RiverContent) -> Vec<Line<'_>> {
    match &content.river {
        Some(river) => river_lines(river),
        None => serde_json::to_string_pretty(&content.raw)
            .unwrap_or_default()
            .lines()
            .map(|l| Line::raw(l.to_string()))
            .collect(),
    }
}

fn river_lines(river: &River) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    if !river.metadata.when_gmt.is_empty() {
        lines.push(Line::styled(
            format!("Generated {}", river.metadata.when_gmt),
            Style::default().fg(Color::DarkGray),
        ));
        lines.push(Line::default());
    }
    if river.updates().is_empty() {
        lines.push(placeholder("No updates"));
    }

    for update in river.updates() {
        let mut header = vec![Span::styled(
            update.feed_title.as_str(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )];
        if let Some(when) = update.when_last_update {
            header.push(Span::styled(
                format!("  updated {}", when.format(DATE_FORMAT)),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(header));

        for item in &update.items {
            let date = item
                .published
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_else(|| "no date".into());
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    format!("{date:<17}"),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(" "),
                Span::styled(item.title.as_str(), Style::default().fg(Color::White)),
            ]));
            if !item.body.is_empty() {
                lines.push(Line::styled(
                    format!("      {}", item.body),
                    Style::default().fg(Color::Gray),
                ));
            }
            if !item.link.is_empty() {
                lines.push(Line::styled(
                    format!("      {}", item.link),
                    Style::default().fg(Color::Blue),
                ));
            }
            if let Some(comments) = &item.comments {
                lines.push(Line::styled(
                    format!("      comments: {comments}"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
        }
        lines.push(Line::default());
    }
    lines
}

fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    if app.loading() {
        spans.push(Span::styled(
            "Loading… ",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ));
    }
    spans.extend([
        Span::styled(app.status.as_str(), Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(
            format!("{} rivers", app.rivers.len()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  q: quit  ↑/↓: river  r: refresh  R: manifest  PgUp/PgDn: scroll"),
    ]);
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{FetchMsg, FetchRequest};
    use crate::test_utils::{content, feed};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    const RIVER: &str = r#"{"updatedFeeds": {"updatedFeed": [{
        "feedTitle": "Example News",
        "whenLastUpdate": "Mon, 01 Jan 2024 11:59:00 +00:00",
        "item": [{"title": "Headline A", "body": "Body A", "link": "https://example.com/a",
                  "pubDate": "Mon, 01 Jan 2024 11:00:00 +00:00"}]
    }]}}"#;

    fn render(app: &mut App) -> String {
        let backend = TestBackend::new(120, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();
        let buf = terminal.backend().buffer().clone();
        buf.content()
            .iter()
            .map(|c| c.symbol().chars().next().unwrap_or(' '))
            .collect()
    }

    fn loaded_app() -> App {
        let mut app = App::new();
        let Some(FetchRequest::Manifest { token }) = app.take_requests().pop() else {
            panic!("expected manifest request");
        };
        app.apply(FetchMsg::Manifest {
            token,
            result: Ok(vec![feed("Tech", "tech.json"), feed("News", "news.json")]),
        });
        app
    }

    fn with_content(mut app: App, json: &str) -> App {
        let Some(FetchRequest::River { token, url }) = app.take_requests().pop() else {
            panic!("expected river request");
        };
        app.apply(FetchMsg::River {
            token,
            url,
            result: Ok(content(json)),
        });
        app
    }

    #[test]
    fn draw_does_not_panic_with_nothing_loaded() {
        let mut app = App::new();
        let text = render(&mut app);
        assert!(text.contains("No rivers loaded"));
    }

    #[test]
    fn draw_lists_rivers_and_count() {
        let mut app = loaded_app();
        let text = render(&mut app);
        assert!(text.contains("Tech"));
        assert!(text.contains("News"));
        assert!(text.contains("2 rivers"));
    }

    #[test]
    fn draw_shows_loading_while_in_flight() {
        let mut app = loaded_app();
        assert!(render(&mut app).contains("Loading"));

        let mut app = with_content(app, RIVER);
        assert!(!render(&mut app).contains("Loading"));
    }

    #[test]
    fn draw_renders_river_items() {
        let mut app = with_content(loaded_app(), RIVER);
        let text = render(&mut app);
        assert!(text.contains("Example News"));
        assert!(text.contains("Headline A"));
        assert!(text.contains("2024-01-01 11:00"));
    }

    #[test]
    fn raw_json_is_pretty_printed() {
        let pretty = content(r#"{"hello": "world"}"#);
        let lines = content_lines(&pretty);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].to_string(), r#"  "hello": "world""#);
    }

    #[test]
    fn empty_river_says_so() {
        let empty = content(r#"{"updatedFeeds": {}}"#);
        let lines = content_lines(&empty);
        assert_eq!(lines[0].to_string(), "No updates");
    }
}
