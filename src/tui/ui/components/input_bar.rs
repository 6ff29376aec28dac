use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

use crate::focus::ComponentId;
use crate::tui::ui::components::{Component, text_edit::TextEdit};
use crate::tui::ui::events::Message;

/// Query operators always offered by Tab completion, on top of the field
/// names inferred from the listed documents.
const OPERATORS: &[&str] = &[
    "$eq", "$exists", "$gt", "$gte", "$in", "$lt", "$lte", "$ne", "$nin", "$regex",
];

/// One-line editor above the content table. The same component serves as
/// the query bar and the sort bar; `id` decides which message Enter emits.
pub struct InputBar {
    id: ComponentId,
    label: &'static str,
    edit: TextEdit,
    vocabulary: Vec<String>,
}

impl InputBar {
    pub fn new(id: ComponentId, label: &'static str) -> Self {
        Self {
            id,
            label,
            edit: TextEdit::default(),
            vocabulary: Vec::new(),
        }
    }

    pub fn set_text(&mut self, text: String) {
        if self.edit.text() != text {
            self.edit.set_text(text);
        }
    }

    pub fn text(&self) -> &str {
        self.edit.text()
    }

    pub fn clear(&mut self) {
        self.edit.clear();
    }

    /// Field paths offered by Tab completion.
    pub fn set_vocabulary(&mut self, mut vocabulary: Vec<String>) {
        vocabulary.extend(OPERATORS.iter().map(|op| op.to_string()));
        self.vocabulary = vocabulary;
    }
}

impl Component for InputBar {
    fn render(&mut self, f: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new(Line::from(self.edit.cursor_spans()))
            .block(
                Block::default()
                    .title(self.label)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            );
        f.render_widget(paragraph, area);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Message> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('a') => self.edit.move_home(),
                KeyCode::Char('e') => self.edit.move_end(),
                KeyCode::Char('b') => self.edit.move_left(),
                KeyCode::Char('f') => self.edit.move_right(),
                KeyCode::Char('w') => self.edit.delete_word_back(),
                KeyCode::Char('k') => self.edit.kill_to_end(),
                _ => {}
            }
            return None;
        }
        match key.code {
            KeyCode::Enter => {
                let text = self.edit.text().to_string();
                match self.id {
                    ComponentId::SortBar => Some(Message::SortAccepted(text)),
                    _ => Some(Message::QueryAccepted(text)),
                }
            }
            KeyCode::Esc => Some(Message::InputDismissed),
            KeyCode::Tab => {
                self.edit.complete(&self.vocabulary);
                None
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
            KeyCode::Delete => {
                self.edit.delete();
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
            KeyCode::Home => {
                self.edit.move_home();
                None
            }
            KeyCode::End => {
                self.edit.move_end();
                None
            }
            _ => None,
        }
    }
}
