use serde_json::Value;

use crate::dao::{DbWithCollections, ServerStatus};

/// Everything a component or background worker can tell the reducer.
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    // Navigation
    FocusNext,
    ToggleTree,
    ShowHelp,
    CloseHelp,

    // Database tree
    DatabasesLoaded(Vec<DbWithCollections>),
    CollectionSelected(String, String),
    TreeAddCollection(String),
    TreeDropCollection(String, String),
    CollectionNameSubmitted(String),
    InputModalDismissed,

    // Content
    DocumentsLoaded { documents: Vec<Value>, count: u64 },
    DocumentSelected(usize),
    PeekDocument,
    ViewDocument,
    PeekerDismissed,
    AddDocument,
    EditDocument,
    DuplicateDocument,
    DeleteDocument,
    Refresh,
    NextPage,
    PreviousPage,

    // Query/sort bars
    ToggleQueryBar,
    ToggleSortBar,
    QueryAccepted(String),
    SortAccepted(String),
    QueryTextReplaced(String),
    InputCleared,
    InputDismissed,

    // History
    ShowHistory,
    HistoryLoaded(Vec<String>),
    HistoryAccepted(String),
    HistoryDismissed,

    // Confirm modal
    ConfirmAccepted,
    ConfirmCancelled,

    // Status
    HealthChanged(Option<ServerStatus>),
    SetNotice(String),
    ClearNotice,

    Quit,
}
