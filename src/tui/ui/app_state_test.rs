use serde_json::json;

use crate::focus::ComponentId;
use crate::keymap::KeyBindings;
use crate::tui::ui::app_state::{AppState, PendingConfirm};
use crate::tui::ui::commands::{Command, EditKind};
use crate::tui::ui::events::Message;

fn state() -> AppState {
    AppState::new(KeyBindings::load(None))
}

fn state_with_collection() -> AppState {
    let mut state = state();
    assert_eq!(
        state.update(Message::CollectionSelected(
            "shop".to_string(),
            "products".to_string()
        )),
        Command::LoadDocuments
    );
    state
}

fn loaded(count: u64) -> Message {
    let documents = vec![
        json!({ "_id": "a", "name": "keyboard" }),
        json!({ "_id": "b", "name": "mouse" }),
    ];
    Message::DocumentsLoaded { documents, count }
}

#[test]
fn test_base_focus_is_content_until_overlay_opens() {
    let mut state = state();
    assert_eq!(state.focused(), ComponentId::Content);

    state.update(Message::ShowHelp);
    assert_eq!(state.focused(), ComponentId::Help);

    state.update(Message::CloseHelp);
    assert_eq!(state.focused(), ComponentId::Content);
    assert!(state.focus.is_empty());
}

#[test]
fn test_focus_next_toggles_between_tree_and_content() {
    let mut state = state();
    state.update(Message::FocusNext);
    assert_eq!(state.focused(), ComponentId::DatabaseTree);
    state.update(Message::FocusNext);
    assert_eq!(state.focused(), ComponentId::Content);

    // With the tree hidden the toggle does nothing.
    state.update(Message::ToggleTree);
    state.update(Message::FocusNext);
    assert_eq!(state.focused(), ComponentId::Content);
}

#[test]
fn test_hiding_tree_returns_focus_to_content() {
    let mut state = state();
    state.update(Message::FocusNext);
    assert_eq!(state.focused(), ComponentId::DatabaseTree);

    state.update(Message::ToggleTree);
    assert!(!state.show_tree);
    assert_eq!(state.focused(), ComponentId::Content);
}

#[test]
fn test_query_bar_needs_a_collection() {
    let mut state = state();
    state.update(Message::ToggleQueryBar);
    assert!(state.focus.is_empty());

    let mut state = state_with_collection();
    state.update(Message::ToggleQueryBar);
    assert_eq!(state.focused(), ComponentId::QueryBar);
    state.update(Message::ToggleQueryBar);
    assert!(state.focus.is_empty());
}

#[test]
fn test_opening_sort_bar_closes_query_bar() {
    let mut state = state_with_collection();
    state.update(Message::ToggleQueryBar);
    state.update(Message::ToggleSortBar);
    assert_eq!(state.focused(), ComponentId::SortBar);
    assert_eq!(state.focus.depth(), 1);
}

#[test]
fn test_accepted_query_commits_and_closes_bar() {
    let mut state = state_with_collection();
    state.update(Message::ToggleQueryBar);

    let command = state.update(Message::QueryAccepted("{ name: 'mouse' }".to_string()));
    assert_eq!(command, Command::CommitQuery("{ name: 'mouse' }".to_string()));
    assert!(state.focus.is_empty());
    assert_eq!(
        state.browse.as_ref().unwrap().filter,
        json!({ "name": "mouse" })
    );
    assert_eq!(state.query_text, "{ name: 'mouse' }");
}

#[test]
fn test_invalid_query_keeps_state_and_focus() {
    let mut state = state_with_collection();
    state.update(Message::ToggleQueryBar);
    let before = state.browse.clone();

    let command = state.update(Message::QueryAccepted("{ broken".to_string()));
    assert_eq!(command, Command::None);
    assert_eq!(state.browse, before);
    assert_eq!(state.focused(), ComponentId::QueryBar);
    assert!(state.notice.is_some());
}

#[test]
fn test_pagination_walks_fifty_at_a_time() {
    let mut state = state_with_collection();
    state.update(loaded(120));

    assert_eq!(state.update(Message::NextPage), Command::LoadDocuments);
    assert_eq!(state.browse.as_ref().unwrap().page, 50);
    assert_eq!(state.update(Message::NextPage), Command::LoadDocuments);
    assert_eq!(state.browse.as_ref().unwrap().page, 100);
    // Last page; advancing further is a no-op.
    assert_eq!(state.update(Message::NextPage), Command::None);
    assert_eq!(state.browse.as_ref().unwrap().page, 100);

    assert_eq!(state.update(Message::PreviousPage), Command::LoadDocuments);
    assert_eq!(state.browse.as_ref().unwrap().page, 50);
}

#[test]
fn test_shrunk_store_requests_a_relist() {
    let mut state = state_with_collection();
    state.update(loaded(120));
    state.update(Message::NextPage);
    state.update(Message::NextPage);

    // The store shrank below the cursor between listings.
    assert_eq!(state.update(loaded(60)), Command::LoadDocuments);
    assert_eq!(state.browse.as_ref().unwrap().page, 50);
}

#[test]
fn test_switching_collection_keeps_filter_resets_cursor() {
    let mut state = state_with_collection();
    state.update(loaded(120));
    state.update(Message::QueryAccepted("{ name: 'mouse' }".to_string()));
    state.update(Message::NextPage);

    state.update(Message::CollectionSelected(
        "shop".to_string(),
        "orders".to_string(),
    ));
    let browse = state.browse.as_ref().unwrap();
    assert_eq!(browse.coll, "orders");
    assert_eq!(browse.page, 0);
    assert_eq!(browse.filter, json!({ "name": "mouse" }));
}

#[test]
fn test_delete_flows_through_confirm_modal() {
    let mut state = state_with_collection();
    state.update(loaded(2));

    assert_eq!(state.update(Message::DeleteDocument), Command::None);
    assert_eq!(state.focused(), ComponentId::ConfirmModal);
    assert!(matches!(
        state.confirm,
        Some(PendingConfirm::DeleteDocument(_))
    ));

    let command = state.update(Message::ConfirmAccepted);
    assert_eq!(command, Command::DeleteDocument(json!("a")));
    assert!(state.focus.is_empty());
    assert!(state.confirm.is_none());
}

#[test]
fn test_cancelled_confirm_discards_pending_action() {
    let mut state = state_with_collection();
    state.update(loaded(2));
    state.update(Message::DeleteDocument);

    assert_eq!(state.update(Message::ConfirmCancelled), Command::None);
    assert!(state.confirm.is_none());
    assert!(state.focus.is_empty());
}

#[test]
fn test_edit_carries_the_selected_document() {
    let mut state = state_with_collection();
    state.update(loaded(2));
    state.update(Message::DocumentSelected(1));

    let command = state.update(Message::EditDocument);
    let Command::RunEditor(EditKind::Edit(document)) = command else {
        panic!("expected an edit session");
    };
    assert_eq!(document["_id"], "b");
}

#[test]
fn test_edit_without_documents_is_a_noop() {
    let mut state = state_with_collection();
    assert_eq!(state.update(Message::EditDocument), Command::None);
    assert_eq!(state.update(Message::AddDocument), Command::RunEditor(EditKind::Insert));
}

#[test]
fn test_history_modal_routes_selection_over_the_bus() {
    let mut state = state_with_collection();
    state.update(Message::ToggleQueryBar);

    assert_eq!(state.update(Message::ShowHistory), Command::LoadHistory);
    assert_eq!(state.focused(), ComponentId::HistoryModal);

    let command = state.update(Message::HistoryAccepted("{ price: 1 }".to_string()));
    assert_eq!(command, Command::AnnounceHistory("{ price: 1 }".to_string()));
    // The bar underneath gets focus back.
    assert_eq!(state.focused(), ComponentId::QueryBar);
}

#[test]
fn test_peeker_opens_only_with_a_selection() {
    let mut state = state_with_collection();
    state.update(Message::PeekDocument);
    assert!(state.focus.is_empty());

    state.update(loaded(2));
    state.update(Message::ViewDocument);
    assert_eq!(state.focused(), ComponentId::Peeker);
    assert!(state.peek_fullscreen);

    state.update(Message::PeekerDismissed);
    assert!(state.focus.is_empty());
}

#[test]
fn test_new_collection_prompt_round_trip() {
    let mut state = state();
    state.update(Message::TreeAddCollection("shop".to_string()));
    assert_eq!(state.focused(), ComponentId::InputModal);

    let command = state.update(Message::CollectionNameSubmitted("reviews".to_string()));
    assert_eq!(
        command,
        Command::AddCollection("shop".to_string(), "reviews".to_string())
    );
    assert!(state.focus.is_empty());

    // A blank name is dropped.
    state.update(Message::TreeAddCollection("shop".to_string()));
    assert_eq!(
        state.update(Message::CollectionNameSubmitted("  ".to_string())),
        Command::None
    );
}

#[test]
fn test_health_updates_land_in_state() {
    let mut state = state();
    assert!(state.health.is_none());
    state.update(Message::HealthChanged(None));
    assert!(state.health.is_none());
}
