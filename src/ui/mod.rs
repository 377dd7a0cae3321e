//! Terminal rendering for every mode and the battle screen.

pub mod battle;
pub mod menus;
pub mod party;
pub mod toast;
pub mod world;

use ratatui::layout::Rect;

/// A `width` x `height` rectangle centred in `area`, shrunk to fit.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
