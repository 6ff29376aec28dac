mod defaults;

use std::fs;
use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

use crate::focus::ComponentId;

/// Lowest level of the keybinding tree: the named physical keys and/or
/// character runes that trigger one action, plus the description shown in
/// the help overlay.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Key {
    pub keys: Vec<String>,
    pub runes: Vec<String>,
    pub description: String,
}

impl Key {
    fn new(keys: &[&str], runes: &[&str], description: &str) -> Self {
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            runes: runes.iter().map(|r| r.to_string()).collect(),
            description: description.to_string(),
        }
    }

    /// A leaf list is replaced only when the override list is non-empty;
    /// descriptions always keep their defaults.
    fn merge_from(&mut self, other: &Key) {
        if !other.keys.is_empty() {
            self.keys = other.keys.clone();
        }
        if !other.runes.is_empty() {
            self.runes = other.runes.clone();
        }
    }

    /// Whether this binding claims the given key event.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        match named_key(event) {
            KeyName::Named(name) => self.keys.iter().any(|k| k == &name),
            KeyName::Rune(c) => {
                let rune = c.to_string();
                self.runes.iter().any(|r| r == &rune)
            }
            KeyName::Unsupported => false,
        }
    }

    /// Short display form for the help overlay and header hints.
    pub fn display(&self) -> String {
        let mut parts: Vec<String> = self.keys.clone();
        parts.extend(self.runes.iter().map(|r| r.clone()));
        parts.join("/")
    }
}

enum KeyName {
    Named(String),
    Rune(char),
    Unsupported,
}

fn named_key(event: &KeyEvent) -> KeyName {
    match event.code {
        KeyCode::Char(' ') => KeyName::Named("Space".to_string()),
        KeyCode::Char(c) => {
            if event.modifiers.contains(KeyModifiers::CONTROL) {
                KeyName::Named(format!("Ctrl+{}", c.to_ascii_uppercase()))
            } else if event.modifiers.contains(KeyModifiers::ALT) {
                KeyName::Named(format!("Alt+{}", c.to_ascii_uppercase()))
            } else {
                KeyName::Rune(c)
            }
        }
        KeyCode::Enter => KeyName::Named("Enter".to_string()),
        KeyCode::Esc => KeyName::Named("Esc".to_string()),
        KeyCode::Tab => KeyName::Named("Tab".to_string()),
        KeyCode::BackTab => KeyName::Named("BackTab".to_string()),
        KeyCode::Backspace => KeyName::Named("Backspace".to_string()),
        KeyCode::Delete => KeyName::Named("Delete".to_string()),
        KeyCode::Up => KeyName::Named("Up".to_string()),
        KeyCode::Down => KeyName::Named("Down".to_string()),
        KeyCode::Left => KeyName::Named("Left".to_string()),
        KeyCode::Right => KeyName::Named("Right".to_string()),
        KeyCode::Home => KeyName::Named("Home".to_string()),
        KeyCode::End => KeyName::Named("End".to_string()),
        KeyCode::PageUp => KeyName::Named("PageUp".to_string()),
        KeyCode::PageDown => KeyName::Named("PageDown".to_string()),
        KeyCode::F(n) => KeyName::Named(format!("F{n}")),
        _ => KeyName::Unsupported,
    }
}

/// Named action a key event resolved to for some component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    // Global
    ToggleHelp,
    // Root
    FocusNext,
    HideDatabases,
    // Databases
    ExpandAll,
    CollapseAll,
    ToggleExpand,
    AddCollection,
    DeleteCollection,
    // Content
    PeekDocument,
    ViewDocument,
    AddDocument,
    EditDocument,
    DuplicateDocument,
    DeleteDocument,
    Refresh,
    ToggleQuery,
    ToggleSort,
    NextPage,
    PreviousPage,
    // Input bar
    ShowHistory,
    ClearInput,
    // Help
    CloseHelp,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GlobalKeys {
    #[serde(rename = "toggleHelp")]
    pub toggle_help: Key,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RootKeys {
    #[serde(rename = "focusNext")]
    pub focus_next: Key,
    #[serde(rename = "hideDatabases")]
    pub hide_databases: Key,
    pub databases: DatabasesKeys,
    pub content: ContentKeys,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatabasesKeys {
    #[serde(rename = "expandAll")]
    pub expand_all: Key,
    #[serde(rename = "collapseAll")]
    pub collapse_all: Key,
    #[serde(rename = "toggleExpand")]
    pub toggle_expand: Key,
    #[serde(rename = "addCollection")]
    pub add_collection: Key,
    #[serde(rename = "deleteCollection")]
    pub delete_collection: Key,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContentKeys {
    #[serde(rename = "peekDocument")]
    pub peek_document: Key,
    #[serde(rename = "viewDocument")]
    pub view_document: Key,
    #[serde(rename = "addDocument")]
    pub add_document: Key,
    #[serde(rename = "editDocument")]
    pub edit_document: Key,
    #[serde(rename = "duplicateDocument")]
    pub duplicate_document: Key,
    #[serde(rename = "deleteDocument")]
    pub delete_document: Key,
    pub refresh: Key,
    #[serde(rename = "toggleQuery")]
    pub toggle_query: Key,
    #[serde(rename = "toggleSort")]
    pub toggle_sort: Key,
    #[serde(rename = "nextPage")]
    pub next_page: Key,
    #[serde(rename = "previousPage")]
    pub previous_page: Key,
    #[serde(rename = "inputBar")]
    pub input_bar: InputBarKeys,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct InputBarKeys {
    #[serde(rename = "showHistory")]
    pub show_history: Key,
    #[serde(rename = "clearInput")]
    pub clear_input: Key,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HelpKeys {
    pub close: Key,
}

/// Bindings for one component, listed in declaration order. Feeds the help
/// overlay and the header hint line.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderedKeys {
    pub component: &'static str,
    pub keys: Vec<Key>,
}

/// The whole keybinding tree: built-in defaults overlaid with the user's
/// override file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub global: GlobalKeys,
    pub root: RootKeys,
    pub help: HelpKeys,
}

impl KeyBindings {
    /// Builds the default tree and overlays the user override file, if one
    /// exists. Read or parse failures keep the defaults; overrides are never
    /// load-bearing enough to abort startup.
    pub fn load(override_path: Option<&Path>) -> Self {
        let mut bindings = defaults::default_keybindings();

        if let Some(path) = override_path {
            match Self::read_overrides(path) {
                Ok(Some(overrides)) => bindings.merge(&overrides),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "ignoring keybinding overrides");
                }
            }
        }

        bindings
    }

    fn read_overrides(path: &Path) -> anyhow::Result<Option<KeyBindings>> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)?;
        let overrides = serde_json::from_str(&raw)?;
        Ok(Some(overrides))
    }

    /// Field-by-field merge: a leaf is replaced only when the override's
    /// corresponding list is non-empty. Merging an empty tree is a no-op.
    pub fn merge(&mut self, other: &KeyBindings) {
        self.global.toggle_help.merge_from(&other.global.toggle_help);

        self.root.focus_next.merge_from(&other.root.focus_next);
        self.root
            .hide_databases
            .merge_from(&other.root.hide_databases);

        let databases = &mut self.root.databases;
        let other_databases = &other.root.databases;
        databases.expand_all.merge_from(&other_databases.expand_all);
        databases
            .collapse_all
            .merge_from(&other_databases.collapse_all);
        databases
            .toggle_expand
            .merge_from(&other_databases.toggle_expand);
        databases
            .add_collection
            .merge_from(&other_databases.add_collection);
        databases
            .delete_collection
            .merge_from(&other_databases.delete_collection);

        let content = &mut self.root.content;
        let other_content = &other.root.content;
        content.peek_document.merge_from(&other_content.peek_document);
        content.view_document.merge_from(&other_content.view_document);
        content.add_document.merge_from(&other_content.add_document);
        content.edit_document.merge_from(&other_content.edit_document);
        content
            .duplicate_document
            .merge_from(&other_content.duplicate_document);
        content
            .delete_document
            .merge_from(&other_content.delete_document);
        content.refresh.merge_from(&other_content.refresh);
        content.toggle_query.merge_from(&other_content.toggle_query);
        content.toggle_sort.merge_from(&other_content.toggle_sort);
        content.next_page.merge_from(&other_content.next_page);
        content.previous_page.merge_from(&other_content.previous_page);
        content
            .input_bar
            .show_history
            .merge_from(&other_content.input_bar.show_history);
        content
            .input_bar
            .clear_input
            .merge_from(&other_content.input_bar.clear_input);

        self.help.close.merge_from(&other.help.close);
    }

    fn global_actions(&self) -> Vec<(Action, &Key)> {
        vec![(Action::ToggleHelp, &self.global.toggle_help)]
    }

    fn root_actions(&self) -> Vec<(Action, &Key)> {
        vec![
            (Action::FocusNext, &self.root.focus_next),
            (Action::HideDatabases, &self.root.hide_databases),
        ]
    }

    fn databases_actions(&self) -> Vec<(Action, &Key)> {
        let keys = &self.root.databases;
        vec![
            (Action::ExpandAll, &keys.expand_all),
            (Action::CollapseAll, &keys.collapse_all),
            (Action::ToggleExpand, &keys.toggle_expand),
            (Action::AddCollection, &keys.add_collection),
            (Action::DeleteCollection, &keys.delete_collection),
        ]
    }

    fn content_actions(&self) -> Vec<(Action, &Key)> {
        let keys = &self.root.content;
        vec![
            (Action::PeekDocument, &keys.peek_document),
            (Action::ViewDocument, &keys.view_document),
            (Action::AddDocument, &keys.add_document),
            (Action::EditDocument, &keys.edit_document),
            (Action::DuplicateDocument, &keys.duplicate_document),
            (Action::DeleteDocument, &keys.delete_document),
            (Action::Refresh, &keys.refresh),
            (Action::ToggleQuery, &keys.toggle_query),
            (Action::ToggleSort, &keys.toggle_sort),
            (Action::NextPage, &keys.next_page),
            (Action::PreviousPage, &keys.previous_page),
        ]
    }

    fn input_bar_actions(&self) -> Vec<(Action, &Key)> {
        let keys = &self.root.content.input_bar;
        vec![
            (Action::ShowHistory, &keys.show_history),
            (Action::ClearInput, &keys.clear_input),
        ]
    }

    fn help_actions(&self) -> Vec<(Action, &Key)> {
        vec![(Action::CloseHelp, &self.help.close)]
    }

    fn actions_for(&self, component: ComponentId) -> Vec<(Action, &Key)> {
        match component {
            ComponentId::Content | ComponentId::Peeker => self.content_actions(),
            ComponentId::DatabaseTree => self.databases_actions(),
            ComponentId::QueryBar | ComponentId::SortBar => self.input_bar_actions(),
            ComponentId::Help => self.help_actions(),
            _ => Vec::new(),
        }
    }

    /// Resolves a key event against one component's own action map. Walks
    /// actions in declaration order, so a key claimed twice resolves to the
    /// first declared action.
    pub fn resolve(&self, component: ComponentId, event: &KeyEvent) -> Option<Action> {
        self.actions_for(component)
            .into_iter()
            .find(|(_, key)| key.matches(event))
            .map(|(action, _)| action)
    }

    /// Second lookup for keys unhandled by the focused component.
    pub fn resolve_global(&self, event: &KeyEvent) -> Option<Action> {
        self.global_actions()
            .into_iter()
            .find(|(_, key)| key.matches(event))
            .map(|(action, _)| action)
    }

    /// Root-level navigation keys; consulted only when no overlay is open.
    pub fn resolve_root(&self, event: &KeyEvent) -> Option<Action> {
        self.root_actions()
            .into_iter()
            .find(|(_, key)| key.matches(event))
            .map(|(action, _)| action)
    }

    /// Bindings for one component in declaration order.
    pub fn ordered_keys(&self, component: ComponentId) -> OrderedKeys {
        let (name, actions): (&'static str, Vec<(Action, &Key)>) = match component {
            ComponentId::Content | ComponentId::Peeker => ("Content", self.content_actions()),
            ComponentId::DatabaseTree => ("Databases", self.databases_actions()),
            ComponentId::QueryBar | ComponentId::SortBar => ("InputBar", self.input_bar_actions()),
            ComponentId::Help => ("Help", self.help_actions()),
            _ => ("Global", self.global_actions()),
        };
        OrderedKeys {
            component: name,
            keys: actions.into_iter().map(|(_, key)| key.clone()).collect(),
        }
    }

    /// Every group in declaration order; feeds the full help overlay.
    pub fn all_ordered_keys(&self) -> Vec<OrderedKeys> {
        vec![
            OrderedKeys {
                component: "Global",
                keys: self
                    .global_actions()
                    .into_iter()
                    .map(|(_, key)| key.clone())
                    .collect(),
            },
            OrderedKeys {
                component: "Root",
                keys: self
                    .root_actions()
                    .into_iter()
                    .map(|(_, key)| key.clone())
                    .collect(),
            },
            OrderedKeys {
                component: "Databases",
                keys: self
                    .databases_actions()
                    .into_iter()
                    .map(|(_, key)| key.clone())
                    .collect(),
            },
            OrderedKeys {
                component: "Content",
                keys: self
                    .content_actions()
                    .into_iter()
                    .map(|(_, key)| key.clone())
                    .collect(),
            },
            OrderedKeys {
                component: "InputBar",
                keys: self
                    .input_bar_actions()
                    .into_iter()
                    .map(|(_, key)| key.clone())
                    .collect(),
            },
            OrderedKeys {
                component: "Help",
                keys: self
                    .help_actions()
                    .into_iter()
                    .map(|(_, key)| key.clone())
                    .collect(),
            },
        ]
    }
}
