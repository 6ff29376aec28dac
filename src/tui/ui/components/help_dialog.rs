use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::keymap::OrderedKeys;
use crate::tui::ui::components::{Component, centered_rect};
use crate::tui::ui::events::Message;

/// Overlay listing every binding, grouped per component in the order the
/// keymap declares them.
#[derive(Default)]
pub struct HelpDialog {
    groups: Vec<OrderedKeys>,
    scroll: u16,
}

impl HelpDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_groups(&mut self, groups: Vec<OrderedKeys>) {
        self.groups = groups;
    }
}

impl Component for HelpDialog {
    fn render(&mut self, f: &mut Frame, area: Rect) {
        let target = centered_rect(60, 80, area);
        f.render_widget(Clear, target);

        let mut lines = Vec::new();
        for group in &self.groups {
            lines.push(Line::from(Span::styled(
                group.component,
                Style::default().add_modifier(Modifier::BOLD),
            )));
            for key in &group.keys {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  {:<14}", key.display()),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::raw(key.description.clone()),
                ]));
            }
            lines.push(Line::raw(""));
        }

        let total = lines.len() as u16;
        self.scroll = self.scroll.min(total.saturating_sub(1));
        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Help").borders(Borders::ALL))
            .scroll((self.scroll, 0));
        f.render_widget(paragraph, target);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
                None
            }
            KeyCode::Down => {
                self.scroll += 1;
                None
            }
            _ => None,
        }
    }
}
