use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::theme;
use crate::ui::UiFrame;

/// What the last key did to the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome {
    Submitted(String),
    Cancelled,
}

/// Single-line edit field. Text is only handed out on submit, so a
/// half-typed value never reaches the browser.
#[derive(Debug, Default)]
pub struct TextField {
    value: String,
    // cursor position in chars
    cursor: usize,
    outcome: Option<FieldOutcome>,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replaces the text and puts the cursor at the end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.chars().count();
        self.outcome = None;
    }

    pub fn take_outcome(&mut self) -> Option<FieldOutcome> {
        self.outcome.take()
    }

    fn byte_index(&self, cursor: usize) -> usize {
        self.value
            .char_indices()
            .nth(cursor)
            .map(|(idx, _)| idx)
            .unwrap_or(self.value.len())
    }
}

impl super::Component for TextField {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, focused: bool) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let style = Style::default()
            .fg(theme::selection_fg())
            .bg(theme::selection_bg());
        frame.fill(Rect { height: 1, ..area }, style);
        let width = area.width as usize;
        // keep the cursor visible when the text is wider than the field
        let skip = (self.cursor + 1).saturating_sub(width);
        let visible: String = self.value.chars().skip(skip).take(width).collect();
        frame.put_str(area.x, area.y, &visible, style);
        if focused {
            let cursor_x = area.x.saturating_add((self.cursor - skip) as u16);
            let under: String = self
                .value
                .chars()
                .nth(self.cursor)
                .map(String::from)
                .unwrap_or_else(|| " ".to_string());
            frame.put_str(
                cursor_x,
                area.y,
                &under,
                style.add_modifier(Modifier::REVERSED),
            );
        }
    }

    fn handle_event(&mut self, event: &Event) -> bool {
        let Event::Key(key) = event else {
            return false;
        };
        if key.kind == KeyEventKind::Release {
            return false;
        }
        match key.code {
            KeyCode::Enter => {
                self.outcome = Some(FieldOutcome::Submitted(self.value.clone()));
            }
            KeyCode::Esc => self.outcome = Some(FieldOutcome::Cancelled),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let at = self.byte_index(self.cursor);
                self.value.insert(at, c);
                self.cursor += 1;
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index(self.cursor);
                    self.value.remove(at);
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.value.chars().count() {
                    let at = self.byte_index(self.cursor);
                    self.value.remove(at);
                }
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.value.chars().count());
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.value.chars().count(),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Component;
    use crossterm::event::KeyEvent;
    use ratatui::buffer::Buffer;

    fn press(field: &mut TextField, code: KeyCode) -> bool {
        field.handle_event(&Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    #[test]
    fn typing_and_editing() {
        let mut field = TextField::new();
        for c in "cmaera".chars() {
            press(&mut field, KeyCode::Char(c));
        }
        // fix the typo: cmaera -> camera
        press(&mut field, KeyCode::Home);
        press(&mut field, KeyCode::Right);
        press(&mut field, KeyCode::Delete);
        press(&mut field, KeyCode::Right);
        press(&mut field, KeyCode::Char('m'));
        assert_eq!(field.value(), "camera");
        assert_eq!(field.take_outcome(), None);
        press(&mut field, KeyCode::Enter);
        assert_eq!(
            field.take_outcome(),
            Some(FieldOutcome::Submitted("camera".to_string()))
        );
    }

    #[test]
    fn escape_cancels_and_ctrl_chars_pass_through() {
        let mut field = TextField::new();
        field.set_value("20");
        let handled = field.handle_event(&Event::Key(KeyEvent::new(
            KeyCode::Char('q'),
            KeyModifiers::CONTROL,
        )));
        assert!(!handled);
        press(&mut field, KeyCode::Backspace);
        assert_eq!(field.value(), "2");
        press(&mut field, KeyCode::Esc);
        assert_eq!(field.take_outcome(), Some(FieldOutcome::Cancelled));
    }

    #[test]
    fn render_scrolls_to_cursor() {
        let mut field = TextField::new();
        field.set_value("abcdefgh");
        let area = Rect::new(0, 0, 4, 1);
        let mut buf = Buffer::empty(area);
        {
            let mut frame = UiFrame::from_parts(area, &mut buf);
            field.render(&mut frame, area, true);
        }
        assert_eq!(buf.cell((0, 0)).unwrap().symbol(), "f");
        assert_eq!(buf.cell((3, 0)).unwrap().symbol(), " ");
    }
}
