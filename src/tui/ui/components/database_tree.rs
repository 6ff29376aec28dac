use std::collections::HashSet;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::dao::DbWithCollections;
use crate::tui::ui::components::Component;
use crate::tui::ui::events::Message;

#[derive(Clone, Debug, PartialEq)]
enum Node {
    Database(String),
    Collection(String, String),
}

/// Sidebar listing databases and, when expanded, their collections.
#[derive(Default)]
pub struct DatabaseTree {
    databases: Vec<DbWithCollections>,
    expanded: HashSet<String>,
    selected: usize,
    list_state: ListState,
    focused: bool,
}

impl DatabaseTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_databases(&mut self, databases: Vec<DbWithCollections>) {
        self.databases = databases;
        let len = self.visible().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn expand_all(&mut self) {
        self.expanded = self.databases.iter().map(|d| d.db.clone()).collect();
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
        let len = self.visible().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn toggle_expand(&mut self) {
        let Some(db) = self.selected_db() else {
            return;
        };
        if !self.expanded.remove(&db) {
            self.expanded.insert(db);
        }
        let len = self.visible().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    /// Database the cursor sits on, or the owner of the selected collection.
    pub fn selected_db(&self) -> Option<String> {
        match self.visible().into_iter().nth(self.selected)? {
            Node::Database(db) => Some(db),
            Node::Collection(db, _) => Some(db),
        }
    }

    pub fn selected_collection(&self) -> Option<(String, String)> {
        match self.visible().into_iter().nth(self.selected)? {
            Node::Collection(db, coll) => Some((db, coll)),
            Node::Database(_) => None,
        }
    }

    fn visible(&self) -> Vec<Node> {
        let mut nodes = Vec::new();
        for database in &self.databases {
            nodes.push(Node::Database(database.db.clone()));
            if self.expanded.contains(&database.db) {
                for coll in &database.collections {
                    nodes.push(Node::Collection(database.db.clone(), coll.clone()));
                }
            }
        }
        nodes
    }
}

impl Component for DatabaseTree {
    fn render(&mut self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .visible()
            .into_iter()
            .map(|node| match node {
                Node::Database(db) => {
                    let marker = if self.expanded.contains(&db) { "v" } else { ">" };
                    ListItem::new(format!("{marker} {db}"))
                        .style(Style::default().add_modifier(Modifier::BOLD))
                }
                Node::Collection(_, coll) => ListItem::new(format!("    {coll}")),
            })
            .collect();

        self.list_state.select(if items.is_empty() {
            None
        } else {
            Some(self.selected.min(items.len() - 1))
        });

        let border_style = if self.focused {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };
        let list = List::new(items)
            .block(
                Block::default()
                    .title("Databases")
                    .borders(Borders::ALL)
                    .border_style(border_style),
            )
            .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));

        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Message> {
        let nodes = self.visible();
        if nodes.is_empty() {
            return None;
        }
        match key.code {
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down => {
                self.selected = (self.selected + 1).min(nodes.len() - 1);
                None
            }
            KeyCode::Enter => match nodes.into_iter().nth(self.selected)? {
                Node::Collection(db, coll) => Some(Message::CollectionSelected(db, coll)),
                Node::Database(_) => {
                    self.toggle_expand();
                    None
                }
            },
            _ => None,
        }
    }
}
