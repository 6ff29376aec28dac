use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::ui::components::Component;
use crate::tui::ui::components::history_modal::HistoryModal;
use crate::tui::ui::events::Message;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn modal() -> HistoryModal {
    let mut modal = HistoryModal::new();
    // File order is oldest first.
    modal.set_entries(vec![
        "{ a: 1 }".to_string(),
        "{ b: 2 }".to_string(),
        "{ c: 3 }".to_string(),
    ]);
    modal
}

#[test]
fn test_newest_entry_is_preselected() {
    let mut modal = modal();
    assert_eq!(
        modal.handle_key(key(KeyCode::Enter)),
        Some(Message::HistoryAccepted("{ c: 3 }".to_string()))
    );
}

#[test]
fn test_navigation_walks_toward_older_entries() {
    let mut modal = modal();
    modal.handle_key(key(KeyCode::Down));
    assert_eq!(
        modal.handle_key(key(KeyCode::Enter)),
        Some(Message::HistoryAccepted("{ b: 2 }".to_string()))
    );
}

#[test]
fn test_escape_dismisses() {
    let mut modal = modal();
    assert_eq!(
        modal.handle_key(key(KeyCode::Esc)),
        Some(Message::HistoryDismissed)
    );
}

#[test]
fn test_empty_history_accepts_nothing() {
    let mut modal = HistoryModal::new();
    modal.set_entries(Vec::new());
    assert_eq!(modal.handle_key(key(KeyCode::Enter)), None);
}
