use serde_json::Value;

use crate::browse::{CollectionState, infer_document_keys};
use crate::dao::{DbWithCollections, ServerStatus};
use crate::focus::{ComponentId, FocusStack};
use crate::keymap::KeyBindings;
use crate::query::parse_loose_query;
use crate::tui::ui::commands::{Command, EditKind};
use crate::tui::ui::events::Message;

/// Destructive action parked behind the confirm modal.
#[derive(Clone, Debug, PartialEq)]
pub enum PendingConfirm {
    DeleteDocument(Value),
    DropCollection { db: String, coll: String },
}

impl PendingConfirm {
    pub fn prompt(&self) -> String {
        match self {
            PendingConfirm::DeleteDocument(document) => {
                let id = document.get("_id").cloned().unwrap_or(Value::Null);
                format!("Delete document {id}?")
            }
            PendingConfirm::DropCollection { db, coll } => {
                format!("Drop collection {db}.{coll}?")
            }
        }
    }
}

/// Single source of truth for the UI. All mutation happens in `update`,
/// which maps one inbound message to at most one side-effect command.
pub struct AppState {
    pub bindings: KeyBindings,
    pub focus: FocusStack,
    /// Key-dispatch owner when no overlay is open.
    pub base_focus: ComponentId,
    pub show_tree: bool,
    pub databases: Vec<DbWithCollections>,
    pub browse: Option<CollectionState>,
    pub documents: Vec<Value>,
    pub document_keys: Vec<String>,
    pub selected: usize,
    pub query_text: String,
    pub sort_text: String,
    pub history_entries: Vec<String>,
    pub confirm: Option<PendingConfirm>,
    pub pending_collection_db: Option<String>,
    pub health: Option<ServerStatus>,
    pub notice: Option<String>,
    pub peek_fullscreen: bool,
}

impl AppState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            focus: FocusStack::new(),
            base_focus: ComponentId::Content,
            show_tree: true,
            databases: Vec::new(),
            browse: None,
            documents: Vec::new(),
            document_keys: Vec::new(),
            selected: 0,
            query_text: String::new(),
            sort_text: String::new(),
            history_entries: Vec::new(),
            confirm: None,
            pending_collection_db: None,
            health: None,
            notice: None,
            peek_fullscreen: false,
        }
    }

    /// The component currently owning key dispatch: the top overlay, or the
    /// base panel when the stack is empty.
    pub fn focused(&self) -> ComponentId {
        self.focus.current().unwrap_or(self.base_focus)
    }

    pub fn selected_document(&self) -> Option<&Value> {
        self.documents.get(self.selected)
    }

    pub fn update(&mut self, msg: Message) -> Command {
        match msg {
            Message::Quit => Command::Quit,

            Message::FocusNext => {
                if self.show_tree {
                    self.base_focus = match self.base_focus {
                        ComponentId::DatabaseTree => ComponentId::Content,
                        _ => ComponentId::DatabaseTree,
                    };
                }
                Command::None
            }
            Message::ToggleTree => {
                self.show_tree = !self.show_tree;
                if !self.show_tree && self.base_focus == ComponentId::DatabaseTree {
                    self.base_focus = ComponentId::Content;
                }
                Command::None
            }
            Message::ShowHelp => {
                if !self.focus.contains(ComponentId::Help) {
                    self.focus.push(ComponentId::Help);
                }
                Command::None
            }
            Message::CloseHelp => {
                if self.focus.current() == Some(ComponentId::Help) {
                    self.focus.pop();
                }
                Command::None
            }

            Message::DatabasesLoaded(databases) => {
                self.databases = databases;
                Command::None
            }
            Message::CollectionSelected(db, coll) => {
                match &mut self.browse {
                    Some(browse) => browse.switch_collection(&db, &coll),
                    None => self.browse = Some(CollectionState::new(&db, &coll)),
                }
                self.selected = 0;
                self.base_focus = ComponentId::Content;
                Command::LoadDocuments
            }
            Message::TreeAddCollection(db) => {
                self.pending_collection_db = Some(db);
                self.focus.push(ComponentId::InputModal);
                Command::None
            }
            Message::CollectionNameSubmitted(name) => {
                if self.focus.current() == Some(ComponentId::InputModal) {
                    self.focus.pop();
                }
                match self.pending_collection_db.take() {
                    Some(db) if !name.trim().is_empty() => {
                        Command::AddCollection(db, name.trim().to_string())
                    }
                    _ => Command::None,
                }
            }
            Message::InputModalDismissed => {
                if self.focus.current() == Some(ComponentId::InputModal) {
                    self.focus.pop();
                }
                self.pending_collection_db = None;
                Command::None
            }
            Message::TreeDropCollection(db, coll) => {
                self.confirm = Some(PendingConfirm::DropCollection { db, coll });
                self.focus.push(ComponentId::ConfirmModal);
                Command::None
            }

            Message::DocumentsLoaded { documents, count } => {
                self.document_keys = infer_document_keys(&documents);
                self.documents = documents;
                if self.selected >= self.documents.len() {
                    self.selected = self.documents.len().saturating_sub(1);
                }
                if let Some(browse) = &mut self.browse
                    && browse.reconcile_count(count)
                {
                    // The page cursor pointed past the shrunk store.
                    return Command::LoadDocuments;
                }
                Command::None
            }
            Message::DocumentSelected(index) => {
                if index < self.documents.len() {
                    self.selected = index;
                }
                Command::None
            }
            Message::PeekDocument => self.open_peeker(false),
            Message::ViewDocument => self.open_peeker(true),
            Message::PeekerDismissed => {
                if self.focus.current() == Some(ComponentId::Peeker) {
                    self.focus.pop();
                }
                Command::None
            }
            Message::AddDocument => {
                if self.browse.is_some() {
                    Command::RunEditor(EditKind::Insert)
                } else {
                    Command::None
                }
            }
            Message::EditDocument => match self.selected_document() {
                Some(document) => Command::RunEditor(EditKind::Edit(document.clone())),
                None => Command::None,
            },
            Message::DuplicateDocument => match self.selected_document() {
                Some(document) => Command::RunEditor(EditKind::Duplicate(document.clone())),
                None => Command::None,
            },
            Message::DeleteDocument => {
                if let Some(document) = self.selected_document().cloned() {
                    self.confirm = Some(PendingConfirm::DeleteDocument(document));
                    self.focus.push(ComponentId::ConfirmModal);
                }
                Command::None
            }
            Message::Refresh => {
                if self.browse.is_some() {
                    Command::LoadDocuments
                } else {
                    Command::None
                }
            }
            Message::NextPage => match &mut self.browse {
                Some(browse) => {
                    if browse.next_page() {
                        Command::LoadDocuments
                    } else {
                        Command::None
                    }
                }
                _ => Command::None,
            },
            Message::PreviousPage => match &mut self.browse {
                Some(browse) => {
                    if browse.prev_page() {
                        Command::LoadDocuments
                    } else {
                        Command::None
                    }
                }
                _ => Command::None,
            },

            Message::ToggleQueryBar => self.toggle_bar(ComponentId::QueryBar),
            Message::ToggleSortBar => self.toggle_bar(ComponentId::SortBar),
            Message::QueryAccepted(text) => match parse_loose_query(&text) {
                Ok(filter) => {
                    let Some(browse) = &mut self.browse else {
                        return Command::None;
                    };
                    browse.apply_filter(filter);
                    self.query_text = text.clone();
                    self.selected = 0;
                    self.notice = None;
                    if self.focus.current() == Some(ComponentId::QueryBar) {
                        self.focus.pop();
                    }
                    Command::CommitQuery(text)
                }
                Err(err) => {
                    // Browse state stays untouched; the bar keeps focus so
                    // the user can fix the text.
                    self.notice = Some(err.to_string());
                    Command::None
                }
            },
            Message::SortAccepted(text) => match parse_loose_query(&text) {
                Ok(sort) => {
                    let Some(browse) = &mut self.browse else {
                        return Command::None;
                    };
                    browse.apply_sort(sort);
                    self.sort_text = text;
                    self.notice = None;
                    if self.focus.current() == Some(ComponentId::SortBar) {
                        self.focus.pop();
                    }
                    Command::LoadDocuments
                }
                Err(err) => {
                    self.notice = Some(err.to_string());
                    Command::None
                }
            },
            Message::QueryTextReplaced(text) => {
                self.query_text = text;
                Command::None
            }
            Message::InputCleared => {
                match self.focus.current() {
                    Some(ComponentId::QueryBar) => self.query_text.clear(),
                    Some(ComponentId::SortBar) => self.sort_text.clear(),
                    _ => {}
                }
                Command::None
            }
            Message::InputDismissed => {
                if matches!(
                    self.focus.current(),
                    Some(ComponentId::QueryBar | ComponentId::SortBar)
                ) {
                    self.focus.pop();
                }
                Command::None
            }

            Message::ShowHistory => {
                self.focus.push(ComponentId::HistoryModal);
                Command::LoadHistory
            }
            Message::HistoryLoaded(entries) => {
                self.history_entries = entries;
                Command::None
            }
            Message::HistoryAccepted(text) => {
                if self.focus.current() == Some(ComponentId::HistoryModal) {
                    self.focus.pop();
                }
                Command::AnnounceHistory(text)
            }
            Message::HistoryDismissed => {
                if self.focus.current() == Some(ComponentId::HistoryModal) {
                    self.focus.pop();
                }
                Command::None
            }

            Message::ConfirmAccepted => {
                if self.focus.current() == Some(ComponentId::ConfirmModal) {
                    self.focus.pop();
                }
                match self.confirm.take() {
                    Some(PendingConfirm::DeleteDocument(document)) => {
                        let id = document.get("_id").cloned().unwrap_or(Value::Null);
                        Command::DeleteDocument(id)
                    }
                    Some(PendingConfirm::DropCollection { db, coll }) => {
                        Command::DropCollection(db, coll)
                    }
                    None => Command::None,
                }
            }
            Message::ConfirmCancelled => {
                if self.focus.current() == Some(ComponentId::ConfirmModal) {
                    self.focus.pop();
                }
                self.confirm = None;
                Command::None
            }

            Message::HealthChanged(status) => {
                self.health = status;
                Command::None
            }
            Message::SetNotice(text) => {
                self.notice = Some(text);
                Command::None
            }
            Message::ClearNotice => {
                self.notice = None;
                Command::None
            }
        }
    }

    fn open_peeker(&mut self, fullscreen: bool) -> Command {
        if self.selected_document().is_some() {
            self.peek_fullscreen = fullscreen;
            self.focus.push(ComponentId::Peeker);
        }
        Command::None
    }

    fn toggle_bar(&mut self, bar: ComponentId) -> Command {
        if self.browse.is_none() {
            return Command::None;
        }
        if self.focus.current() == Some(bar) {
            self.focus.pop();
        } else {
            if matches!(
                self.focus.current(),
                Some(ComponentId::QueryBar | ComponentId::SortBar)
            ) {
                self.focus.pop();
            }
            self.focus.push(bar);
        }
        Command::None
    }
}
