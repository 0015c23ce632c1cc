use ratatui::prelude::Rect;

/// In-progress drag of a window by its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderDrag<R: Copy + Eq> {
    pub id: R,
    pub initial_x: u16,
    pub initial_y: u16,
    pub start_x: u16,
    pub start_y: u16,
}

impl<R: Copy + Eq> HeaderDrag<R> {
    pub fn new(id: R, rect: Rect, column: u16, row: u16) -> Self {
        Self {
            id,
            initial_x: rect.x,
            initial_y: rect.y,
            start_x: column,
            start_y: row,
        }
    }

    /// Where the dragged rect's origin lands for the given pointer position,
    /// kept inside `bounds`.
    pub fn apply(&self, rect: Rect, column: u16, row: u16, bounds: Rect) -> Rect {
        let dx = column as i32 - self.start_x as i32;
        let dy = row as i32 - self.start_y as i32;
        let max_x = (bounds.x as i32 + bounds.width as i32 - rect.width as i32).max(bounds.x as i32);
        let max_y =
            (bounds.y as i32 + bounds.height as i32 - rect.height as i32).max(bounds.y as i32);
        let x = (self.initial_x as i32 + dx).clamp(bounds.x as i32, max_x);
        let y = (self.initial_y as i32 + dy).clamp(bounds.y as i32, max_y);
        Rect {
            x: x as u16,
            y: y as u16,
            width: rect.width,
            height: rect.height,
        }
    }
}

pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    if rect.width == 0 || rect.height == 0 {
        return false;
    }
    let max_x = rect.x.saturating_add(rect.width);
    let max_y = rect.y.saturating_add(rect.height);
    column >= rect.x && column < max_x && row >= rect.y && row < max_y
}
