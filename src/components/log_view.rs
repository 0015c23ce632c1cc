use crossterm::event::{Event, KeyCode, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};

use crate::log_buffer::LogBuffer;
use crate::theme;
use crate::ui::UiFrame;

/// Overlay listing the tail of the log buffer. Follows new lines until the
/// operator scrolls back.
#[derive(Debug)]
pub struct LogView {
    buffer: LogBuffer,
    // lines scrolled back from the newest; 0 follows the tail
    back: usize,
    last_view: usize,
}

impl LogView {
    pub fn new(buffer: LogBuffer) -> Self {
        Self {
            buffer,
            back: 0,
            last_view: 0,
        }
    }

    pub fn follows_tail(&self) -> bool {
        self.back == 0
    }

    fn scroll(&mut self, delta: isize) {
        let max_back = self.buffer.len().saturating_sub(self.last_view.max(1));
        self.back = if delta.is_negative() {
            self.back.saturating_add(delta.unsigned_abs()).min(max_back)
        } else {
            self.back.saturating_sub(delta as usize)
        };
    }
}

impl super::Component for LogView {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _focused: bool) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Log (F12 to close)")
            .border_style(Style::default().fg(theme::log_highlight()));
        let inner = block.inner(area);
        frame.fill(area, Style::default());
        frame.render_widget(block, area);
        if inner.width == 0 || inner.height == 0 {
            return;
        }
        let view = inner.height as usize;
        self.last_view = view;
        let lines = self.buffer.window(view, self.back);
        for (offset, line) in lines.iter().enumerate() {
            let style = if line.contains("ERROR") || line.starts_with("PANIC") {
                Style::default().fg(theme::alert_fg())
            } else {
                Style::default()
            };
            frame.put_str(inner.x, inner.y + offset as u16, line, style);
        }
    }

    fn handle_event(&mut self, event: &Event) -> bool {
        let page = self.last_view.max(1) as isize;
        match event {
            Event::Key(key) => match key.code {
                KeyCode::Up => self.scroll(-1),
                KeyCode::Down => self.scroll(1),
                KeyCode::PageUp => self.scroll(-page),
                KeyCode::PageDown => self.scroll(page),
                KeyCode::End => self.back = 0,
                _ => return false,
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => self.scroll(-3),
                MouseEventKind::ScrollDown => self.scroll(3),
                _ => return false,
            },
            _ => return false,
        }
        true
    }
}
