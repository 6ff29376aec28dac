use std::io::{self, Stdout};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use crossbeam::channel::{self, Receiver};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers, poll},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

pub mod ui;

use crate::bus::{AppEvent, EventBus, EventMessage};
use crate::config::Config;
use crate::dao::{Dao, ServerStatus};
use crate::editor::{DocEditor, EditOutcome, ExternalEditor};
use crate::focus::ComponentId;
use crate::history::QueryHistory;
use crate::keymap::{Action, KeyBindings};
use self::ui::app_state::AppState;
use self::ui::commands::{Command, EditKind};
use self::ui::events::Message;
use self::ui::renderer::Renderer;

const HEALTH_INTERVAL: Duration = Duration::from_secs(2);

pub struct App {
    state: AppState,
    renderer: Renderer,
    dao: Arc<dyn Dao>,
    bus: Arc<EventBus>,
    config: Config,
    history: QueryHistory,
    header_events: Receiver<EventMessage>,
    query_bar_events: Receiver<EventMessage>,
    health_events: Option<Receiver<Option<ServerStatus>>>,
    // Editor sessions need the terminal restored first, so the command is
    // parked here and handled by the run loop.
    pending_editor: Option<EditKind>,
    initial_database: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, dao: Arc<dyn Dao>) -> Self {
        let bindings = KeyBindings::load(Some(&config.keybindings_path));
        let bus = Arc::new(EventBus::new());
        let header_events = bus.subscribe(ComponentId::Header);
        let query_bar_events = bus.subscribe(ComponentId::QueryBar);
        let history = QueryHistory::new(config.history_path.clone());

        Self {
            state: AppState::new(bindings),
            renderer: Renderer::new(),
            dao,
            bus,
            config,
            history,
            header_events,
            query_bar_events,
            health_events: None,
            pending_editor: None,
            initial_database: None,
            should_quit: false,
        }
    }

    /// Opens the first collection of the given database at startup.
    pub fn with_initial_database(mut self, database: Option<String>) -> Self {
        self.initial_database = database;
        self
    }

    pub fn run(&mut self) -> Result<()> {
        let mut terminal = self.setup_terminal()?;

        self.health_events = Some(self.start_health_worker());
        self.execute_command(Command::LoadDatabases);

        if let Some(db) = self.initial_database.take() {
            let first = self
                .state
                .databases
                .iter()
                .find(|d| d.db == db)
                .and_then(|d| d.collections.first().cloned());
            match first {
                Some(coll) => self.handle_message(Message::CollectionSelected(db, coll)),
                None => self.notice(format!("database {db} not found")),
            }
        }

        let result = self.run_app(&mut terminal);

        self.cleanup_terminal(&mut terminal)?;
        result
    }

    fn setup_terminal(&self) -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    fn cleanup_terminal(&self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        Ok(())
    }

    fn run_app(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                self.renderer.render(f, &self.state);
            })?;

            // Health checks come off the worker thread and travel to the
            // header through the bus like any other cross-component event.
            if let Some(receiver) = &self.health_events {
                while let Ok(status) = receiver.try_recv() {
                    self.bus.send(
                        ComponentId::Header,
                        ComponentId::Header,
                        AppEvent::HealthChanged(status),
                    );
                }
            }
            while let Ok(message) = self.header_events.try_recv() {
                if let AppEvent::HealthChanged(status) = message.event {
                    self.handle_message(Message::HealthChanged(status));
                }
            }
            while let Ok(message) = self.query_bar_events.try_recv() {
                if let AppEvent::HistoryAccepted(text) = message.event {
                    self.renderer.query_bar_mut().set_text(text.clone());
                    self.handle_message(Message::QueryTextReplaced(text));
                }
            }

            if let Some(kind) = self.pending_editor.take() {
                self.run_editor(terminal, kind)?;
            }

            if poll(Duration::from_millis(50))?
                && let Event::Key(key) = event::read()?
            {
                self.handle_input(key);
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    /// Dispatch order: the focused component's own bindings win, text-entry
    /// components then swallow everything, globals come next and root
    /// navigation only fires with no overlay open. Unclaimed keys fall
    /// through to the focused component as raw input.
    fn handle_input(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        let focused = self.state.focused();
        if let Some(action) = self.state.bindings.resolve(focused, &key) {
            self.dispatch_action(focused, action);
            return;
        }

        let text_entry = matches!(
            focused,
            ComponentId::QueryBar | ComponentId::SortBar | ComponentId::InputModal
        );
        if text_entry {
            if let Some(message) = self.renderer.component_mut(focused).handle_key(key) {
                self.handle_message(message);
            }
            return;
        }

        if let Some(action) = self.state.bindings.resolve_global(&key) {
            self.dispatch_action(focused, action);
            return;
        }
        if self.state.focus.is_empty()
            && let Some(action) = self.state.bindings.resolve_root(&key)
        {
            self.dispatch_action(focused, action);
            return;
        }

        if let Some(message) = self.renderer.component_mut(focused).handle_key(key) {
            self.handle_message(message);
        }
    }

    fn dispatch_action(&mut self, focused: ComponentId, action: Action) {
        let message = match action {
            Action::ToggleHelp => {
                if self.state.focus.contains(ComponentId::Help) {
                    Message::CloseHelp
                } else {
                    Message::ShowHelp
                }
            }
            Action::CloseHelp => Message::CloseHelp,
            Action::FocusNext => Message::FocusNext,
            Action::HideDatabases => Message::ToggleTree,

            // Tree shape changes stay inside the component.
            Action::ExpandAll => {
                self.renderer.database_tree_mut().expand_all();
                return;
            }
            Action::CollapseAll => {
                self.renderer.database_tree_mut().collapse_all();
                return;
            }
            Action::ToggleExpand => {
                self.renderer.database_tree_mut().toggle_expand();
                return;
            }
            Action::AddCollection => match self.renderer.database_tree_mut().selected_db() {
                Some(db) => Message::TreeAddCollection(db),
                None => return,
            },
            Action::DeleteCollection => {
                match self.renderer.database_tree_mut().selected_collection() {
                    Some((db, coll)) => Message::TreeDropCollection(db, coll),
                    None => return,
                }
            }

            Action::PeekDocument => Message::PeekDocument,
            Action::ViewDocument => Message::ViewDocument,
            Action::AddDocument => Message::AddDocument,
            Action::EditDocument => Message::EditDocument,
            Action::DuplicateDocument => Message::DuplicateDocument,
            Action::DeleteDocument => Message::DeleteDocument,
            Action::Refresh => Message::Refresh,
            Action::NextPage => Message::NextPage,
            Action::PreviousPage => Message::PreviousPage,

            Action::ToggleQuery => {
                self.handle_message(Message::ToggleQueryBar);
                self.sync_bar_text();
                return;
            }
            Action::ToggleSort => {
                self.handle_message(Message::ToggleSortBar);
                self.sync_bar_text();
                return;
            }
            Action::ShowHistory => Message::ShowHistory,
            Action::ClearInput => {
                match focused {
                    ComponentId::QueryBar => self.renderer.query_bar_mut().clear(),
                    ComponentId::SortBar => self.renderer.sort_bar_mut().clear(),
                    _ => {}
                }
                Message::InputCleared
            }
        };
        self.handle_message(message);
    }

    /// Seeds the freshly focused bar with the last accepted text.
    fn sync_bar_text(&mut self) {
        match self.state.focus.current() {
            Some(ComponentId::QueryBar) => {
                let text = self.state.query_text.clone();
                self.renderer.query_bar_mut().set_text(text);
            }
            Some(ComponentId::SortBar) => {
                let text = self.state.sort_text.clone();
                self.renderer.sort_bar_mut().set_text(text);
            }
            _ => {}
        }
    }

    fn handle_message(&mut self, message: Message) {
        let command = self.state.update(message);
        self.execute_command(command);
    }

    fn execute_command(&mut self, command: Command) {
        match command {
            Command::None => {}
            Command::Quit => self.should_quit = true,
            Command::LoadDatabases => match self.dao.list_databases() {
                Ok(databases) => self.handle_message(Message::DatabasesLoaded(databases)),
                Err(err) => self.notice(format!("listing databases failed: {err}")),
            },
            Command::LoadDocuments => {
                let Some(browse) = self.state.browse.clone() else {
                    return;
                };
                match self.dao.list_documents(&browse) {
                    Ok((documents, count)) => {
                        self.handle_message(Message::DocumentsLoaded { documents, count });
                    }
                    Err(err) => self.notice(format!("listing documents failed: {err}")),
                }
            }
            Command::LoadHistory => {
                let entries = self.history.load().unwrap_or_else(|err| {
                    tracing::warn!(error = %err, "loading query history failed");
                    Vec::new()
                });
                self.handle_message(Message::HistoryLoaded(entries));
            }
            Command::CommitQuery(text) => {
                if let Err(err) = self.history.save(&text) {
                    tracing::warn!(error = %err, "saving query history failed");
                }
                self.execute_command(Command::LoadDocuments);
            }
            Command::AnnounceHistory(text) => {
                self.bus.send(
                    ComponentId::QueryBar,
                    ComponentId::HistoryModal,
                    AppEvent::HistoryAccepted(text),
                );
            }
            Command::RunEditor(kind) => self.pending_editor = Some(kind),
            Command::DeleteDocument(id) => {
                let Some(browse) = self.state.browse.clone() else {
                    return;
                };
                match self.dao.delete_document(&browse.db, &browse.coll, &id) {
                    Ok(()) => {
                        self.notice(format!("deleted document {id}"));
                        self.execute_command(Command::LoadDocuments);
                    }
                    Err(err) => self.notice(format!("delete failed: {err}")),
                }
            }
            Command::AddCollection(db, coll) => match self.dao.add_collection(&db, &coll) {
                Ok(()) => {
                    self.notice(format!("created {db}.{coll}"));
                    self.execute_command(Command::LoadDatabases);
                }
                Err(err) => self.notice(format!("creating collection failed: {err}")),
            },
            Command::DropCollection(db, coll) => match self.dao.delete_collection(&db, &coll) {
                Ok(()) => {
                    let was_current = self
                        .state
                        .browse
                        .as_ref()
                        .is_some_and(|b| b.db == db && b.coll == coll);
                    if was_current {
                        self.state.browse = None;
                        self.state.documents.clear();
                        self.state.selected = 0;
                    }
                    self.notice(format!("dropped {db}.{coll}"));
                    self.execute_command(Command::LoadDatabases);
                }
                Err(err) => self.notice(format!("dropping collection failed: {err}")),
            },
        }
    }

    /// Hands the terminal to the external editor for one session, then
    /// takes it back and applies the outcome.
    fn run_editor(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        kind: EditKind,
    ) -> Result<()> {
        let Some(browse) = self.state.browse.clone() else {
            return Ok(());
        };

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

        let dao = Arc::clone(&self.dao);
        let launcher = ExternalEditor::new(self.config.editor.clone());
        let editor = DocEditor::new(dao.as_ref(), &launcher);
        let outcome = match &kind {
            EditKind::Insert => editor.insert(&browse.db, &browse.coll),
            EditKind::Edit(document) => {
                editor.edit(&browse.db, &browse.coll, &document.to_string())
            }
            EditKind::Duplicate(document) => {
                editor.duplicate(&browse.db, &browse.coll, &document.to_string())
            }
        };

        enable_raw_mode()?;
        execute!(terminal.backend_mut(), EnterAlternateScreen)?;
        terminal.clear()?;

        match outcome {
            Ok(EditOutcome::Committed { id }) => {
                if let Ok(document) = self.dao.get_document(&browse.db, &browse.coll, &id) {
                    self.bus.broadcast(
                        ComponentId::Content,
                        AppEvent::DocumentSaved {
                            db: browse.db.clone(),
                            coll: browse.coll.clone(),
                            document,
                        },
                    );
                }
                self.notice(format!("saved document {id}"));
                self.execute_command(Command::LoadDocuments);
            }
            Ok(EditOutcome::Unchanged) => self.notice("no changes".to_string()),
            Ok(EditOutcome::Rejected(reason)) => self.notice(format!("edit rejected: {reason}")),
            Err(err) => self.notice(format!("edit failed: {err}")),
        }
        Ok(())
    }

    fn notice(&mut self, text: String) {
        self.handle_message(Message::SetNotice(text));
    }

    fn start_health_worker(&self) -> Receiver<Option<ServerStatus>> {
        let (tx, rx) = channel::unbounded();
        let dao = Arc::clone(&self.dao);
        thread::spawn(move || {
            loop {
                let status = dao.server_status().ok();
                if tx.send(status).is_err() {
                    break;
                }
                thread::sleep(HEALTH_INTERVAL);
            }
        });
        rx
    }
}
