use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};

use crate::focus::ComponentId;
use crate::tui::ui::app_state::AppState;
use crate::tui::ui::components::{
    Component, confirm_dialog::ConfirmDialog, content::Content, database_tree::DatabaseTree,
    doc_peeker::DocPeeker, header::Header, help_dialog::HelpDialog, history_modal::HistoryModal,
    input_bar::InputBar, input_modal::InputModal,
};

/// Owns every component and lays them out from the current state. The app
/// loop borrows individual components for key dispatch.
pub struct Renderer {
    header: Header,
    database_tree: DatabaseTree,
    content: Content,
    query_bar: InputBar,
    sort_bar: InputBar,
    doc_peeker: DocPeeker,
    history_modal: HistoryModal,
    help_dialog: HelpDialog,
    confirm_dialog: ConfirmDialog,
    input_modal: InputModal,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            header: Header::new(),
            database_tree: DatabaseTree::new(),
            content: Content::new(),
            query_bar: InputBar::new(ComponentId::QueryBar, "Query"),
            sort_bar: InputBar::new(ComponentId::SortBar, "Sort"),
            doc_peeker: DocPeeker::new(),
            history_modal: HistoryModal::new(),
            help_dialog: HelpDialog::new(),
            confirm_dialog: ConfirmDialog::new(),
            input_modal: InputModal::new(),
        }
    }

    pub fn render(&mut self, f: &mut Frame, state: &AppState) {
        let area = f.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);

        self.render_header(f, chunks[0], state);
        self.render_main(f, chunks[1], state);
        self.render_overlays(f, area, state);
    }

    fn render_header(&mut self, f: &mut Frame, area: Rect, state: &AppState) {
        let location = match &state.browse {
            Some(browse) => {
                let page = browse.page / browse.limit.max(1) + 1;
                let pages = browse.count.div_ceil(browse.limit.max(1)).max(1);
                format!(
                    "{}.{}  {} docs  page {page}/{pages}",
                    browse.db, browse.coll, browse.count
                )
            }
            None => "no collection selected".to_string(),
        };
        let hints = state
            .bindings
            .ordered_keys(state.focused())
            .keys
            .iter()
            .map(|key| format!("{} {}", key.display(), key.description))
            .collect::<Vec<_>>()
            .join("  |  ");

        self.header.set_health(state.health.clone());
        self.header.set_location(location);
        self.header.set_query(state.query_text.clone());
        self.header.set_notice(state.notice.clone());
        self.header.set_hints(hints);
        self.header.render(f, area);
    }

    fn render_main(&mut self, f: &mut Frame, area: Rect, state: &AppState) {
        let (tree_area, content_area) = if state.show_tree {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(30), Constraint::Min(0)])
                .split(area);
            (Some(chunks[0]), chunks[1])
        } else {
            (None, area)
        };

        if let Some(tree_area) = tree_area {
            self.database_tree.set_databases(state.databases.clone());
            self.database_tree
                .set_focused(state.focused() == ComponentId::DatabaseTree);
            self.database_tree.render(f, tree_area);
        }

        // Stack an input bar above the table while one is focused.
        let focused_bar = match state.focus.current() {
            Some(ComponentId::QueryBar) => Some(&mut self.query_bar),
            Some(ComponentId::SortBar) => Some(&mut self.sort_bar),
            _ => None,
        };
        let table_area = if let Some(bar) = focused_bar {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(0)])
                .split(content_area);
            bar.set_vocabulary(state.document_keys.clone());
            bar.render(f, chunks[0]);
            chunks[1]
        } else {
            content_area
        };

        self.content
            .set_documents(state.documents.clone(), &state.document_keys);
        self.content.set_selected(state.selected);
        self.content.set_title(match &state.browse {
            Some(browse) => format!("{}.{}", browse.db, browse.coll),
            None => "Documents".to_string(),
        });
        self.content.render(f, table_area);
    }

    fn render_overlays(&mut self, f: &mut Frame, area: Rect, state: &AppState) {
        // Overlays render bottom-up so the focused one lands on top.
        if state.focus.contains(ComponentId::Peeker) {
            if let Some(document) = state.selected_document() {
                self.doc_peeker.set_document(document);
            }
            self.doc_peeker.set_fullscreen(state.peek_fullscreen);
            self.doc_peeker.render(f, area);
        }
        if state.focus.contains(ComponentId::HistoryModal) {
            self.history_modal
                .set_entries(state.history_entries.clone());
            self.history_modal.render(f, area);
        }
        if state.focus.contains(ComponentId::InputModal) {
            self.input_modal.set_title("New collection name".to_string());
            self.input_modal.render(f, area);
        }
        if state.focus.contains(ComponentId::ConfirmModal) {
            if let Some(confirm) = &state.confirm {
                self.confirm_dialog.set_prompt(confirm.prompt());
            }
            self.confirm_dialog.render(f, area);
        }
        if state.focus.contains(ComponentId::Help) {
            self.help_dialog
                .set_groups(state.bindings.all_ordered_keys());
            self.help_dialog.render(f, area);
        }
    }

    pub fn component_mut(&mut self, id: ComponentId) -> &mut dyn Component {
        match id {
            ComponentId::Content => &mut self.content,
            ComponentId::DatabaseTree => &mut self.database_tree,
            ComponentId::QueryBar => &mut self.query_bar,
            ComponentId::SortBar => &mut self.sort_bar,
            ComponentId::Peeker => &mut self.doc_peeker,
            ComponentId::HistoryModal => &mut self.history_modal,
            ComponentId::Help => &mut self.help_dialog,
            ComponentId::Header => &mut self.header,
            ComponentId::ConfirmModal => &mut self.confirm_dialog,
            ComponentId::InputModal => &mut self.input_modal,
        }
    }

    pub fn database_tree_mut(&mut self) -> &mut DatabaseTree {
        &mut self.database_tree
    }

    pub fn query_bar_mut(&mut self) -> &mut InputBar {
        &mut self.query_bar
    }

    pub fn sort_bar_mut(&mut self) -> &mut InputBar {
        &mut self.sort_bar
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
