use crate::core::app::App;
use crate::core::message::Message;
use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const SIDEBAR_WIDTH: u16 = 32;

/// Presentation state that lives outside [`App`]: how far the transcript has
/// been scrolled back from the bottom.
#[derive(Debug, Default, Clone, Copy)]
pub struct ViewState {
    pub scroll_back: u16,
}

impl ViewState {
    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_back = self.scroll_back.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_back = self.scroll_back.saturating_sub(lines);
    }

    pub fn follow(&mut self) {
        self.scroll_back = 0;
    }
}

pub fn ui(f: &mut Frame, app: &App, view: &ViewState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(f.area());

    render_sidebar(f, app, columns[0]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(columns[1]);

    render_transcript(f, app, view, rows[0]);
    render_status(f, app, rows[1]);
    render_input(f, app, rows[2]);
}

fn render_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();
    match &app.profile {
        Some(profile) => {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("[{}] ", profile.initials()),
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(profile.display_name.clone()),
            ]));
            lines.push(Line::from(Span::styled(
                profile.email.clone(),
                Style::default().fg(Color::DarkGray),
            )));
        }
        None => lines.push(Line::from(Span::styled(
            "Not signed in (/login)",
            Style::default().fg(Color::DarkGray),
        ))),
    }
    lines.push(Line::from(""));

    for (index, summary) in app.conversations.iter().enumerate() {
        let active = app.active_conversation.as_ref() == Some(&summary.id);
        let style = if active {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:>2}. ", index + 1), Style::default().fg(Color::DarkGray)),
            Span::styled(summary.title.clone(), style),
        ]));
        lines.push(Line::from(Span::styled(
            format!(
                "    {}",
                summary.updated_at.with_timezone(&Local).format("%b %d %H:%M")
            ),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let sidebar = Paragraph::new(lines)
        .block(Block::default().borders(Borders::RIGHT).title("Conversations"))
        .wrap(Wrap { trim: true });
    f.render_widget(sidebar, area);
}

fn message_lines(message: &Message) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let time = message
        .created_at
        .with_timezone(&Local)
        .format("%H:%M")
        .to_string();

    if message.is_user() {
        lines.push(Line::from(vec![
            Span::styled(
                "You: ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(message.content.as_str(), Style::default().fg(Color::Cyan)),
            Span::styled(format!("  {time}"), Style::default().fg(Color::DarkGray)),
        ]));
    } else {
        let style = if message.display_only {
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC)
        } else {
            Style::default().fg(Color::White)
        };
        for content_line in message.content.lines() {
            lines.push(Line::from(Span::styled(content_line, style)));
        }
        if !message.display_only {
            lines.push(Line::from(Span::styled(
                time,
                Style::default().fg(Color::DarkGray),
            )));
        }
    }
    lines.push(Line::from(""));
    lines
}

pub fn build_display_lines(app: &App) -> Vec<Line<'_>> {
    if app.transcript.is_empty() {
        return vec![Line::from(Span::styled(
            "Start a new conversation by typing a message below.",
            Style::default().fg(Color::DarkGray),
        ))];
    }
    app.transcript.iter().flat_map(message_lines).collect()
}

/// Rows the lines occupy once wrapped to `width` columns.
pub fn wrapped_height(lines: &[Line<'_>], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = lines
        .iter()
        .map(|line| {
            let line_width: usize = line
                .spans
                .iter()
                .map(|span| span.content.as_ref().width())
                .sum();
            line_width.div_ceil(width).max(1)
        })
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

fn title(app: &App) -> String {
    let mode = if app.settings.is_live() {
        format!("live ({})", app.settings.version_id)
    } else {
        "mock".to_string()
    };
    format!("Colloquy v{} • {}", env!("CARGO_PKG_VERSION"), mode)
}

fn render_transcript(f: &mut Frame, app: &App, view: &ViewState, area: Rect) {
    let lines = build_display_lines(app);
    let available_height = area.height.saturating_sub(1);
    let total = wrapped_height(&lines, area.width);
    let bottom = total.saturating_sub(available_height);
    let scroll_offset = bottom.saturating_sub(view.scroll_back);

    let transcript = Paragraph::new(lines)
        .block(Block::default().title(title(app)))
        .wrap(Wrap { trim: false })
        .scroll((scroll_offset, 0));
    f.render_widget(transcript, area);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let text = app.status.as_deref().unwrap_or("");
    let style = if app.is_busy() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    f.render_widget(Paragraph::new(Span::styled(text, style)), area);
}

pub fn input_title(app: &App) -> &'static str {
    if app.is_busy() {
        "Waiting for reply... (Ctrl+C to quit)"
    } else {
        "Type your message (Enter to send, /help for commands, Ctrl+C to quit)"
    }
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let input_style = if app.is_busy() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let input = Paragraph::new(app.input.as_str())
        .style(input_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(input_title(app)),
        );
    f.render_widget(input, area);

    let inner_width = area.width.saturating_sub(2);
    let cursor = u16::try_from(app.input.width())
        .unwrap_or(u16::MAX)
        .min(inner_width.saturating_sub(1));
    f.set_cursor_position((area.x + 1 + cursor, area.y + 1));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{create_signed_in_app, create_test_app};

    fn plain(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn empty_transcript_shows_hint() {
        let app = create_test_app();
        let lines = plain(&build_display_lines(&app));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Start a new conversation"));
    }

    #[test]
    fn user_lines_are_prefixed_and_replies_split_by_line() {
        let mut app = create_test_app();
        let pending = app.begin_send("hello").unwrap();
        app.complete_send(pending, Ok("Hi\nthere".to_string()));

        let lines = plain(&build_display_lines(&app));
        assert!(lines[0].starts_with("You: hello"));
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "Hi");
        assert_eq!(lines[3], "there");
    }

    #[test]
    fn placeholder_has_no_timestamp() {
        let mut app = create_signed_in_app();
        let id = app.conversations.nth(0).unwrap().id.clone();
        app.select_conversation(&id);
        let lines = build_display_lines(&app);
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0].spans[0].style.add_modifier,
            Modifier::ITALIC
        );
    }

    #[test]
    fn wrapped_height_accounts_for_long_lines() {
        let lines = vec![
            Line::from("x".repeat(25)),
            Line::from(""),
            Line::from("short"),
        ];
        assert_eq!(wrapped_height(&lines, 10), 3 + 1 + 1);
        assert_eq!(wrapped_height(&lines, 0), 25 + 1 + 5);
    }

    #[test]
    fn input_title_reflects_busy_flag() {
        let mut app = create_test_app();
        assert!(input_title(&app).starts_with("Type your message"));
        let _pending = app.begin_send("hello");
        assert!(input_title(&app).starts_with("Waiting"));
    }

    #[test]
    fn title_shows_mode() {
        let mut app = create_test_app();
        assert!(title(&app).ends_with("mock"));
        app.settings = app.settings.with_api_key(Some("key".into()));
        assert!(title(&app).ends_with("live (production)"));
    }

    #[test]
    fn view_scrolling_saturates() {
        let mut view = ViewState::default();
        view.scroll_down(3);
        assert_eq!(view.scroll_back, 0);
        view.scroll_up(5);
        view.scroll_down(2);
        assert_eq!(view.scroll_back, 3);
        view.follow();
        assert_eq!(view.scroll_back, 0);
    }
}
