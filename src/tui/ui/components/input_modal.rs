use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::tui::ui::components::{Component, centered_rect, text_edit::TextEdit};
use crate::tui::ui::events::Message;

/// Small centered prompt for one line of text; used to name a new
/// collection.
#[derive(Default)]
pub struct InputModal {
    title: String,
    edit: TextEdit,
}

impl InputModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub fn reset(&mut self) {
        self.edit.clear();
    }
}

impl Component for InputModal {
    fn render(&mut self, f: &mut Frame, area: Rect) {
        let target = centered_rect(50, 15, area);
        f.render_widget(Clear, target);

        let paragraph = Paragraph::new(Line::from(self.edit.cursor_spans())).block(
            Block::default()
                .title(self.title.as_str())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
        f.render_widget(paragraph, target);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Enter => {
                let text = self.edit.text().to_string();
                self.edit.clear();
                Some(Message::CollectionNameSubmitted(text))
            }
            KeyCode::Esc => {
                self.edit.clear();
                Some(Message::InputModalDismissed)
            }
            KeyCode::Char(c)
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                self.edit.insert(c);
                None
            }
            KeyCode::Backspace => {
                self.edit.backspace();
                None
            }
            KeyCode::Left => {
                self.edit.move_left();
                None
            }
            KeyCode::Right => {
                self.edit.move_right();
                None
            }
            _ => None,
        }
    }
}
