use std::fmt;
use std::sync::Mutex;

/// Identity of a visual panel. Used as the key for keybinding lookup,
/// event routing and focus-stack membership.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentId {
    Content,
    DatabaseTree,
    QueryBar,
    SortBar,
    Peeker,
    HistoryModal,
    Help,
    Header,
    ConfirmModal,
    InputModal,
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComponentId::Content => "Content",
            ComponentId::DatabaseTree => "DatabaseTree",
            ComponentId::QueryBar => "QueryBar",
            ComponentId::SortBar => "SortBar",
            ComponentId::Peeker => "Peeker",
            ComponentId::HistoryModal => "HistoryModal",
            ComponentId::Help => "Help",
            ComponentId::Header => "Header",
            ComponentId::ConfirmModal => "ConfirmModal",
            ComponentId::InputModal => "InputModal",
        };
        f.write_str(name)
    }
}

/// Ordered stack of overlay pages; the top entry owns key dispatch.
///
/// The stack is empty at startup; the base view is never pushed. Both the
/// UI loop and background tasks may push/pop, so all access goes through a
/// single mutex.
pub struct FocusStack {
    stack: Mutex<Vec<ComponentId>>,
}

impl Default for FocusStack {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusStack {
    pub fn new() -> Self {
        Self {
            stack: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, id: ComponentId) {
        let mut stack = self.stack.lock().expect("focus stack poisoned");
        stack.push(id);
        tracing::debug!(component = %id, depth = stack.len(), "focus pushed");
    }

    /// Removes the top component. Popping an empty stack is a no-op.
    pub fn pop(&self) -> Option<ComponentId> {
        let mut stack = self.stack.lock().expect("focus stack poisoned");
        let popped = stack.pop();
        if let Some(id) = popped {
            tracing::debug!(component = %id, depth = stack.len(), "focus popped");
        }
        popped
    }

    /// The component currently owning key dispatch, if any overlay is open.
    pub fn current(&self) -> Option<ComponentId> {
        let stack = self.stack.lock().expect("focus stack poisoned");
        stack.last().copied()
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        let stack = self.stack.lock().expect("focus stack poisoned");
        stack.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        let stack = self.stack.lock().expect("focus stack poisoned");
        stack.is_empty()
    }

    pub fn depth(&self) -> usize {
        let stack = self.stack.lock().expect("focus stack poisoned");
        stack.len()
    }
}
