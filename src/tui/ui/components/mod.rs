pub mod confirm_dialog;
pub mod content;
pub mod database_tree;
pub mod doc_peeker;
pub mod header;
pub mod help_dialog;
pub mod history_modal;
pub mod input_bar;
pub mod input_modal;
pub mod text_edit;

#[cfg(test)]
mod database_tree_test;
#[cfg(test)]
mod history_modal_test;

use crate::tui::ui::events::Message;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

pub trait Component {
    fn render(&mut self, f: &mut Frame, area: Rect);
    fn handle_key(&mut self, key: KeyEvent) -> Option<Message>;
}

/// Rect centered in `area`, sized as a percentage of it. Modals render here.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
