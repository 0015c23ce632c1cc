pub mod console;

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use ::crossterm::event::Event;
use ratatui::backend::Backend;

use crate::ui::UiFrame;

pub use console::{ConsoleInputDriver, ConsoleOutputDriver};

pub trait InputDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;
    fn read(&mut self) -> io::Result<Event>;
}

impl<T: InputDriver + ?Sized> InputDriver for &mut T {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        (**self).poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        (**self).read()
    }
}

pub trait OutputDriver {
    type Backend: Backend;

    fn enter(&mut self) -> io::Result<()>;
    fn exit(&mut self) -> io::Result<()>;

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(UiFrame<'_>);
}

/// Replays a fixed list of events. Once drained, `poll` reports nothing and
/// `read` fails.
#[derive(Debug, Default)]
pub struct ScriptedInputDriver {
    events: VecDeque<Event>,
}

impl ScriptedInputDriver {
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn push(&mut self, event: Event) {
        self.events.push_back(event);
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl InputDriver for ScriptedInputDriver {
    fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
        Ok(!self.events.is_empty())
    }

    fn read(&mut self) -> io::Result<Event> {
        self.events
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn scripted_driver_through_mut_ref() {
        let mut d = ScriptedInputDriver::new([Event::Key(KeyEvent::new(
            KeyCode::Char('x'),
            KeyModifiers::NONE,
        ))]);
        let mut r = &mut d;
        assert!(r.poll(Duration::from_millis(0)).unwrap());
        match r.read().unwrap() {
            Event::Key(k) => assert_eq!(k.code, KeyCode::Char('x')),
            other => panic!("expected key, got {other:?}"),
        }
        assert!(!r.poll(Duration::from_millis(0)).unwrap());
        assert!(r.read().is_err());
    }
}
