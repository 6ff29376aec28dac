use super::{
    ContentKeys, DatabasesKeys, GlobalKeys, HelpKeys, InputBarKeys, Key, KeyBindings, RootKeys,
};

/// Built-in keybinding tree. User overrides overlay this field by field.
pub(super) fn default_keybindings() -> KeyBindings {
    KeyBindings {
        global: GlobalKeys {
            toggle_help: Key::new(&[], &["?"], "Toggle help"),
        },
        root: RootKeys {
            focus_next: Key::new(&["Tab"], &[], "Focus next panel"),
            hide_databases: Key::new(&["Ctrl+S"], &[], "Hide databases panel"),
            databases: DatabasesKeys {
                expand_all: Key::new(&[], &["E"], "Expand all"),
                collapse_all: Key::new(&[], &["W"], "Collapse all"),
                toggle_expand: Key::new(&[], &["T"], "Toggle expand"),
                add_collection: Key::new(&[], &["A"], "Add collection"),
                delete_collection: Key::new(&["Ctrl+D"], &[], "Delete collection"),
            },
            content: ContentKeys {
                peek_document: Key::new(&["Enter"], &["p"], "Peek document"),
                view_document: Key::new(&[], &["v"], "View document"),
                add_document: Key::new(&[], &["a"], "Add document"),
                edit_document: Key::new(&[], &["e"], "Edit document"),
                duplicate_document: Key::new(&[], &["d"], "Duplicate document"),
                delete_document: Key::new(&["Ctrl+D"], &[], "Delete document"),
                refresh: Key::new(&["Ctrl+R"], &[], "Refresh"),
                toggle_query: Key::new(&[], &["/"], "Toggle query bar"),
                toggle_sort: Key::new(&[], &["s"], "Toggle sort bar"),
                next_page: Key::new(&["Ctrl+N"], &[], "Next page"),
                previous_page: Key::new(&["Ctrl+B"], &[], "Previous page"),
                input_bar: InputBarKeys {
                    show_history: Key::new(&["Ctrl+Y"], &[], "Show query history"),
                    clear_input: Key::new(&["Ctrl+U"], &[], "Clear input"),
                },
            },
        },
        help: HelpKeys {
            close: Key::new(&["Esc"], &[], "Close help"),
        },
    }
}
