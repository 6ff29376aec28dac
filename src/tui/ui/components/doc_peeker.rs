use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph},
};
use serde_json::Value;

use crate::tui::ui::components::{Component, centered_rect};
use crate::tui::ui::events::Message;

/// Read-only JSON view of the selected document. Renders as a centered
/// modal, or over the whole frame in fullscreen mode.
#[derive(Default)]
pub struct DocPeeker {
    text: String,
    line_count: u16,
    scroll: u16,
    fullscreen: bool,
}

impl DocPeeker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_document(&mut self, document: &Value) {
        self.text = serde_json::to_string_pretty(document)
            .unwrap_or_else(|_| document.to_string());
        self.line_count = self.text.lines().count() as u16;
        self.scroll = 0;
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
    }
}

impl Component for DocPeeker {
    fn render(&mut self, f: &mut Frame, area: Rect) {
        let target = if self.fullscreen {
            area
        } else {
            centered_rect(70, 70, area)
        };
        f.render_widget(Clear, target);

        let paragraph = Paragraph::new(self.text.as_str())
            .block(
                Block::default()
                    .title("Document")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((self.scroll, 0));
        f.render_widget(paragraph, target);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Message::PeekerDismissed),
            KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
                None
            }
            KeyCode::Down => {
                self.scroll = (self.scroll + 1).min(self.line_count.saturating_sub(1));
                None
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(10);
                None
            }
            KeyCode::PageDown => {
                self.scroll = (self.scroll + 10).min(self.line_count.saturating_sub(1));
                None
            }
            KeyCode::Home => {
                self.scroll = 0;
                None
            }
            _ => None,
        }
    }
}
