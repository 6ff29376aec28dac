pub mod browse;
pub mod bus;
pub mod config;
pub mod dao;
pub mod editor;
pub mod focus;
pub mod history;
pub mod keymap;
pub mod query;
pub mod tui;

pub use browse::{CollectionState, infer_document_keys};
pub use bus::{AppEvent, EventBus, EventMessage};
pub use config::Config;
pub use dao::{Dao, DbWithCollections, MemoryDao, ServerStatus};
pub use editor::{ChangeDetection, DocEditor, EditOutcome, EditorLauncher, ExternalEditor};
pub use focus::{ComponentId, FocusStack};
pub use history::QueryHistory;
pub use keymap::{Action, KeyBindings};
pub use query::parse_loose_query;
pub use tui::App;
