use ratatui::prelude::Rect;
use ratatui::style::{Modifier, Style};

use crate::layout::rect_contains;
use crate::theme;
use crate::ui::UiFrame;

const CLOSE_GLYPH: &str = "[x]";

/// Which part of a window's chrome a pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderHit {
    Close,
    Header,
    Body,
}

pub trait WindowDecorator: std::fmt::Debug {
    fn render_window(&self, frame: &mut UiFrame<'_>, rect: Rect, title: &str, focused: bool);

    /// Area inside the chrome left for the window body.
    fn content_rect(&self, rect: Rect) -> Rect;

    fn hit(&self, rect: Rect, column: u16, row: u16) -> Option<HeaderHit>;
}

/// Single-line border with the title bar on the top edge.
#[derive(Debug, Default)]
pub struct DefaultDecorator;

impl DefaultDecorator {
    fn close_rect(rect: Rect) -> Option<Rect> {
        let glyph = CLOSE_GLYPH.len() as u16;
        if rect.width < glyph + 4 || rect.height == 0 {
            return None;
        }
        Some(Rect {
            x: rect.x + rect.width - glyph - 1,
            y: rect.y,
            width: glyph,
            height: 1,
        })
    }
}

impl WindowDecorator for DefaultDecorator {
    fn render_window(&self, frame: &mut UiFrame<'_>, rect: Rect, title: &str, focused: bool) {
        let bounds = rect.intersection(frame.area());
        if bounds.width < 2 || bounds.height < 2 {
            return;
        }
        let header_style = if focused {
            Style::default()
                .bg(theme::decorator_header_bg())
                .fg(theme::decorator_header_fg())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .bg(theme::decorator_header_inactive_bg())
                .fg(theme::decorator_header_fg())
        };
        let border_style = Style::default().fg(theme::decorator_border());
        let buffer = frame.buffer_mut();

        let left = rect.x;
        let top = rect.y;
        let right = rect.x.saturating_add(rect.width).saturating_sub(1);
        let bottom = rect.y.saturating_add(rect.height).saturating_sub(1);

        for y in top..=bottom {
            for x in left..=right {
                if !rect_contains(bounds, x, y) {
                    continue;
                }
                let Some(cell) = buffer.cell_mut((x, y)) else {
                    continue;
                };
                cell.reset();
                if y == top {
                    cell.set_symbol(" ");
                    cell.set_style(header_style);
                } else if y == bottom {
                    let symbol = if x == left {
                        "└"
                    } else if x == right {
                        "┘"
                    } else {
                        "─"
                    };
                    cell.set_symbol(symbol);
                    cell.set_style(border_style);
                } else if x == left || x == right {
                    cell.set_symbol("│");
                    cell.set_style(border_style);
                } else {
                    cell.set_symbol(" ");
                }
            }
        }

        let close = Self::close_rect(rect);
        let title_room = match close {
            Some(close) => close.x.saturating_sub(left + 1) as usize,
            None => rect.width.saturating_sub(2) as usize,
        };
        let title = crate::ui::truncate_to_width(title, title_room.saturating_sub(1));
        crate::ui::safe_set_string(buffer, bounds, left + 1, top, &title, header_style);
        if let Some(close) = close {
            crate::ui::safe_set_string(buffer, bounds, close.x, close.y, CLOSE_GLYPH, header_style);
        }
    }

    fn content_rect(&self, rect: Rect) -> Rect {
        Rect {
            x: rect.x.saturating_add(1),
            y: rect.y.saturating_add(1),
            width: rect.width.saturating_sub(2),
            height: rect.height.saturating_sub(2),
        }
    }

    fn hit(&self, rect: Rect, column: u16, row: u16) -> Option<HeaderHit> {
        if !rect_contains(rect, column, row) {
            return None;
        }
        if let Some(close) = Self::close_rect(rect)
            && rect_contains(close, column, row)
        {
            return Some(HeaderHit::Close);
        }
        if row == rect.y {
            Some(HeaderHit::Header)
        } else {
            Some(HeaderHit::Body)
        }
    }
}
