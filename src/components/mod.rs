use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::ui::UiFrame;

pub mod log_view;
pub mod status_bar;
pub mod text_field;

pub use log_view::LogView;
pub use status_bar::StatusBar;
pub use text_field::{FieldOutcome, TextField};

pub trait Component {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, focused: bool);

    fn handle_event(&mut self, _event: &Event) -> bool {
        false
    }
}
