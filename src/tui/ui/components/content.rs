use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
};
use serde_json::Value;

use crate::tui::ui::components::Component;
use crate::tui::ui::events::Message;

/// Columns shown before the table runs out of width.
const MAX_COLUMNS: usize = 6;
const CELL_WIDTH: usize = 24;

/// The document table for the current collection page.
#[derive(Default)]
pub struct Content {
    documents: Vec<Value>,
    columns: Vec<String>,
    selected: usize,
    table_state: TableState,
    title: String,
}

impl Content {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_documents(&mut self, documents: Vec<Value>, keys: &[String]) {
        // Top-level keys only; dotted paths stay in the autocomplete
        // vocabulary but make poor columns.
        let mut columns = vec!["_id".to_string()];
        columns.extend(
            keys.iter()
                .filter(|key| !key.contains('.') && key.as_str() != "_id")
                .take(MAX_COLUMNS - 1)
                .cloned(),
        );
        self.columns = columns;
        self.documents = documents;
    }

    pub fn set_selected(&mut self, selected: usize) {
        self.selected = selected;
        self.table_state.select(if self.documents.is_empty() {
            None
        } else {
            Some(selected.min(self.documents.len() - 1))
        });
    }

    pub fn set_title(&mut self, title: String) {
        self.title = title;
    }

    fn cell_text(value: Option<&Value>) -> String {
        let text = match value {
            None => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };
        if text.chars().count() > CELL_WIDTH {
            let truncated: String = text.chars().take(CELL_WIDTH - 1).collect();
            format!("{truncated}~")
        } else {
            text
        }
    }
}

impl Component for Content {
    fn render(&mut self, f: &mut Frame, area: Rect) {
        let columns = &self.columns;
        let header = Row::new(columns.iter().map(|column| Cell::from(column.as_str())))
            .style(Style::default().add_modifier(Modifier::BOLD));

        let rows = self.documents.iter().map(|document| {
            Row::new(
                columns
                    .iter()
                    .map(|column| Cell::from(Self::cell_text(document.get(column)))),
            )
        });

        let widths = vec![Constraint::Min(CELL_WIDTH as u16); columns.len().max(1)];
        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .title(self.title.as_str())
                    .borders(Borders::ALL),
            )
            .row_highlight_style(Style::default().bg(Color::Blue).fg(Color::White));

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Message> {
        if self.documents.is_empty() {
            return None;
        }
        let last = self.documents.len() - 1;
        let next = match key.code {
            KeyCode::Up => self.selected.saturating_sub(1),
            KeyCode::Down => (self.selected + 1).min(last),
            KeyCode::Home => 0,
            KeyCode::End => last,
            KeyCode::PageUp => self.selected.saturating_sub(10),
            KeyCode::PageDown => (self.selected + 10).min(last),
            _ => return None,
        };
        if next == self.selected {
            return None;
        }
        self.selected = next;
        Some(Message::DocumentSelected(next))
    }
}
