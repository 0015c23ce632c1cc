use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::theme;
use crate::ui::{UiFrame, truncate_to_width};

/// One-line bar: key hints on the left, state on the right, and the latest
/// log message in whatever room is left between them.
pub struct StatusBar {
    hints: String,
    state: String,
    message: String,
    style: Style,
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            hints: String::new(),
            state: String::new(),
            message: String::new(),
            style: Style::default()
                .fg(theme::status_fg())
                .bg(theme::status_bg()),
        }
    }

    pub fn set_hints<T: Into<String>>(&mut self, value: T) {
        self.hints = value.into();
    }

    pub fn set_state<T: Into<String>>(&mut self, value: T) {
        self.state = value.into();
    }

    pub fn set_message<T: Into<String>>(&mut self, value: T) {
        self.message = value.into();
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl super::Component for StatusBar {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _focused: bool) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let row = Rect { height: 1, ..area };
        frame.fill(row, self.style);
        let width = area.width as usize;
        let (x, y) = (area.x, area.y);

        let state = truncate_to_width(&self.state, width);
        let state_width = state.chars().count();
        let state_x = x.saturating_add((width - state_width) as u16);

        let hints = truncate_to_width(&self.hints, width.saturating_sub(state_width + 1));
        frame.put_str(x, y, &hints, self.style);
        let used = hints.chars().count();

        let room = width.saturating_sub(used + state_width + 4);
        if !self.message.is_empty() && room > 0 {
            let message = truncate_to_width(&self.message, room);
            frame.put_str(x.saturating_add(used as u16 + 2), y, &message, self.style);
        }
        frame.put_str(state_x, y, &state, self.style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Component;
    use ratatui::buffer::Buffer;

    fn render(bar: &mut StatusBar, width: u16) -> String {
        let area = Rect::new(0, 0, width, 1);
        let mut buf = Buffer::empty(area);
        {
            let mut frame = UiFrame::from_parts(area, &mut buf);
            bar.render(&mut frame, area, false);
        }
        (0..width)
            .map(|x| buf.cell((x, 0)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn hints_left_state_right_message_between() {
        let mut bar = StatusBar::new();
        bar.set_hints("F7 hide");
        bar.set_state("PICK");
        bar.set_message("opened #500000");
        let line = render(&mut bar, 40);
        assert!(line.starts_with("F7 hide  opened #500000"));
        assert!(line.ends_with("PICK"));
    }

    #[test]
    fn message_dropped_when_no_room() {
        let mut bar = StatusBar::default();
        bar.set_hints("hints");
        bar.set_state("S");
        bar.set_message("long message");
        let line = render(&mut bar, 10);
        assert_eq!(line, "hints    S");
    }
}
