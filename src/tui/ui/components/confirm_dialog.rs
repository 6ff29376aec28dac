use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::tui::ui::components::{Component, centered_rect};
use crate::tui::ui::events::Message;

/// Yes/no gate in front of destructive operations.
#[derive(Default)]
pub struct ConfirmDialog {
    prompt: String,
}

impl ConfirmDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_prompt(&mut self, prompt: String) {
        self.prompt = prompt;
    }
}

impl Component for ConfirmDialog {
    fn render(&mut self, f: &mut Frame, area: Rect) {
        let target = centered_rect(50, 20, area);
        f.render_widget(Clear, target);

        let lines = vec![
            Line::raw(self.prompt.clone()),
            Line::raw(""),
            Line::raw("[y] confirm    [n] cancel"),
        ];
        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .title("Confirm")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
        f.render_widget(paragraph, target);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => Some(Message::ConfirmAccepted),
            KeyCode::Char('n') | KeyCode::Esc => Some(Message::ConfirmCancelled),
            _ => None,
        }
    }
}
