use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::dao::DbWithCollections;
use crate::tui::ui::components::Component;
use crate::tui::ui::components::database_tree::DatabaseTree;
use crate::tui::ui::events::Message;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn tree() -> DatabaseTree {
    let mut tree = DatabaseTree::new();
    tree.set_databases(vec![
        DbWithCollections {
            db: "admin".to_string(),
            collections: vec!["users".to_string()],
        },
        DbWithCollections {
            db: "shop".to_string(),
            collections: vec!["orders".to_string(), "products".to_string()],
        },
    ]);
    tree
}

#[test]
fn test_collapsed_tree_selects_databases_only() {
    let tree = tree();
    assert_eq!(tree.selected_db(), Some("admin".to_string()));
    assert_eq!(tree.selected_collection(), None);
}

#[test]
fn test_enter_on_database_expands_it() {
    let mut tree = tree();
    assert_eq!(tree.handle_key(key(KeyCode::Enter)), None);
    tree.handle_key(key(KeyCode::Down));

    // First child of the expanded database.
    assert_eq!(
        tree.selected_collection(),
        Some(("admin".to_string(), "users".to_string()))
    );
}

#[test]
fn test_enter_on_collection_selects_it() {
    let mut tree = tree();
    tree.expand_all();
    // admin, users, shop, orders
    for _ in 0..3 {
        tree.handle_key(key(KeyCode::Down));
    }

    assert_eq!(
        tree.handle_key(key(KeyCode::Enter)),
        Some(Message::CollectionSelected(
            "shop".to_string(),
            "orders".to_string()
        ))
    );
}

#[test]
fn test_collapse_all_clamps_selection() {
    let mut tree = tree();
    tree.expand_all();
    for _ in 0..4 {
        tree.handle_key(key(KeyCode::Down));
    }
    assert_eq!(
        tree.selected_collection(),
        Some(("shop".to_string(), "products".to_string()))
    );

    tree.collapse_all();
    assert!(tree.selected_db().is_some());
    assert_eq!(tree.selected_collection(), None);
}

#[test]
fn test_navigation_stops_at_edges() {
    let mut tree = tree();
    tree.handle_key(key(KeyCode::Up));
    assert_eq!(tree.selected_db(), Some("admin".to_string()));

    for _ in 0..10 {
        tree.handle_key(key(KeyCode::Down));
    }
    assert_eq!(tree.selected_db(), Some("shop".to_string()));
}
