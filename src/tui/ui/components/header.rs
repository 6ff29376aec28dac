use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::dao::ServerStatus;
use crate::tui::ui::components::Component;
use crate::tui::ui::events::Message;

/// Top bar: connection health, current location, active filter and the
/// latest notice.
#[derive(Default)]
pub struct Header {
    health: Option<ServerStatus>,
    location: String,
    query: String,
    notice: Option<String>,
    hints: String,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_health(&mut self, health: Option<ServerStatus>) {
        self.health = health;
    }

    pub fn set_location(&mut self, location: String) {
        self.location = location;
    }

    pub fn set_query(&mut self, query: String) {
        self.query = query;
    }

    pub fn set_notice(&mut self, notice: Option<String>) {
        self.notice = notice;
    }

    /// Key hints for the focused component.
    pub fn set_hints(&mut self, hints: String) {
        self.hints = hints;
    }
}

impl Component for Header {
    fn render(&mut self, f: &mut Frame, area: Rect) {
        let status = match &self.health {
            Some(status) => Span::styled(
                format!("up {} ({}s)", status.version, status.uptime_secs),
                Style::default().fg(Color::Green),
            ),
            None => Span::styled("inactive", Style::default().fg(Color::Red)),
        };

        let mut spans = vec![
            status,
            Span::raw("  "),
            Span::styled(self.location.clone(), Style::default().fg(Color::Cyan)),
        ];
        if !self.query.is_empty() {
            spans.push(Span::raw("  filter: "));
            spans.push(Span::styled(
                self.query.clone(),
                Style::default().fg(Color::Yellow),
            ));
        }
        if let Some(notice) = &self.notice {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                notice.clone(),
                Style::default().fg(Color::Magenta),
            ));
        }

        let clock = chrono::Local::now().format("%H:%M:%S").to_string();
        let lines = vec![
            Line::from(spans),
            Line::from(Span::styled(
                self.hints.clone(),
                Style::default().fg(Color::DarkGray),
            )),
        ];
        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("mongotui  {clock}")),
        );
        f.render_widget(paragraph, area);
    }

    fn handle_key(&mut self, _key: KeyEvent) -> Option<Message> {
        None
    }
}
