use serde_json::Value;

/// Which flavor of editor session to run against the current collection.
#[derive(Clone, Debug, PartialEq)]
pub enum EditKind {
    Insert,
    Edit(Value),
    Duplicate(Value),
}

/// Side effect requested by the reducer; executed by the app loop.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    None,
    Quit,
    LoadDatabases,
    LoadDocuments,
    LoadHistory,
    /// Persist an accepted query to history, then re-list.
    CommitQuery(String),
    /// Route an accepted history entry to the query bar over the bus.
    AnnounceHistory(String),
    /// Suspend the terminal and run the document edit pipeline.
    RunEditor(EditKind),
    DeleteDocument(Value),
    AddCollection(String, String),
    DropCollection(String, String),
}
