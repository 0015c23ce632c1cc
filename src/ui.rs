//! UiFrame: a thin wrapper around `ratatui::Frame` that clamps drawing to the
//! visible area.
//!
//! Inspection windows can be dragged partly off screen and the picker label
//! follows the pointer to the edges, so most draw calls land on rectangles
//! that only partially overlap the buffer. Everything in the crate draws
//! through `UiFrame` (or the `safe_set_string` helper) instead of touching the
//! buffer with unchecked coordinates.
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

/// Wrapper around `ratatui::Frame` that clamps drawing to the visible area.
pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    /// Construct a `UiFrame` directly from an area and buffer. Used for
    /// offscreen rendering and in tests.
    pub fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    fn clip_rect(&self, rect: Rect) -> Option<Rect> {
        let clipped = rect.intersection(self.area);
        if clipped.width == 0 || clipped.height == 0 {
            None
        } else {
            Some(clipped)
        }
    }

    pub fn render_widget<W>(&mut self, widget: W, area: Rect)
    where
        W: Widget,
    {
        if let Some(clipped) = self.clip_rect(area) {
            widget.render(clipped, self.buffer);
        }
    }

    /// Writes `text` at (x, y), clipped to the frame.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, style: Style) {
        let bounds = self.area;
        safe_set_string(self.buffer, bounds, x, y, text, style);
    }

    /// Resets every cell of `area` and applies `style`.
    pub fn fill(&mut self, area: Rect, style: Style) {
        let Some(clipped) = self.clip_rect(area) else {
            return;
        };
        for y in clipped.y..clipped.y.saturating_add(clipped.height) {
            for x in clipped.x..clipped.x.saturating_add(clipped.width) {
                if let Some(cell) = self.buffer.cell_mut((x, y)) {
                    cell.reset();
                    cell.set_style(style);
                }
            }
        }
    }
}

/// Writes `text` starting at (x, y), cut at the right edge of `bounds`.
/// Anything starting outside `bounds` is dropped.
pub(crate) fn safe_set_string(
    buffer: &mut Buffer,
    bounds: Rect,
    x: u16,
    y: u16,
    text: &str,
    style: Style,
) {
    let bounds = bounds.intersection(buffer.area);
    if !crate::layout::rect_contains(bounds, x, y) {
        return;
    }
    let room = bounds.right().saturating_sub(x) as usize;
    buffer.set_string(x, y, truncate_to_width(text, room), style);
}

/// First `width` chars of `value`.
pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    match value.char_indices().nth(width) {
        Some((cut, _)) => value[..cut].to_string(),
        None => value.to_string(),
    }
}
