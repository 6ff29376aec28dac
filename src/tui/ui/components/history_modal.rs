use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
};

use crate::tui::ui::components::{Component, centered_rect};
use crate::tui::ui::events::Message;

/// Picker over previously accepted queries, newest first.
#[derive(Default)]
pub struct HistoryModal {
    entries: Vec<String>,
    selected: usize,
    list_state: ListState,
}

impl HistoryModal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries arrive oldest-first from the history file; display newest
    /// first so the most recent query is one keypress away.
    pub fn set_entries(&mut self, mut entries: Vec<String>) {
        entries.reverse();
        if self.entries != entries {
            self.entries = entries;
            self.selected = 0;
        }
    }
}

impl Component for HistoryModal {
    fn render(&mut self, f: &mut Frame, area: Rect) {
        let target = centered_rect(60, 50, area);
        f.render_widget(Clear, target);

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .map(|entry| ListItem::new(entry.as_str()))
            .collect();
        self.list_state.select(if items.is_empty() {
            None
        } else {
            Some(self.selected.min(items.len() - 1))
        });

        let list = List::new(items)
            .block(
                Block::default()
                    .title("Query history")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Magenta)),
            )
            .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));
        f.render_stateful_widget(list, target, &mut self.list_state);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Message::HistoryDismissed),
            KeyCode::Enter => self
                .entries
                .get(self.selected)
                .map(|entry| Message::HistoryAccepted(entry.clone())),
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down => {
                if !self.entries.is_empty() {
                    self.selected = (self.selected + 1).min(self.entries.len() - 1);
                }
                None
            }
            _ => None,
        }
    }
}
