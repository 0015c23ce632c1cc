use std::collections::VecDeque;
use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind,
};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use super::{InputDriver, OutputDriver};
use crate::ui::UiFrame;

/// Terminal input through crossterm. Key releases are dropped so each key
/// press dispatches once on every platform.
#[derive(Debug, Default)]
pub struct ConsoleInputDriver {
    pending: VecDeque<Event>,
}

impl ConsoleInputDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn accept(event: &Event) -> bool {
        !matches!(event, Event::Key(key) if key.kind == KeyEventKind::Release)
    }

    fn read_internal(&mut self) -> io::Result<Event> {
        loop {
            let evt = crossterm::event::read()?;
            if Self::accept(&evt) {
                return Ok(evt);
            }
        }
    }
}

impl InputDriver for ConsoleInputDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        if !self.pending.is_empty() {
            return Ok(true);
        }
        // a poll hit on a filtered release would otherwise block the next read
        while crossterm::event::poll(timeout)? {
            let evt = crossterm::event::read()?;
            if Self::accept(&evt) {
                self.pending.push_back(evt);
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn read(&mut self) -> io::Result<Event> {
        if let Some(evt) = self.pending.pop_front() {
            return Ok(evt);
        }
        self.read_internal()
    }
}

pub struct ConsoleOutputDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    entered: bool,
}

impl ConsoleOutputDriver {
    pub fn new() -> io::Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            entered: false,
        })
    }
}

impl OutputDriver for ConsoleOutputDriver {
    type Backend = CrosstermBackend<Stdout>;

    fn enter(&mut self) -> io::Result<()> {
        if self.entered {
            return Ok(());
        }
        execute!(
            self.terminal.backend_mut(),
            EnterAlternateScreen,
            EnableMouseCapture
        )?;
        terminal::enable_raw_mode()?;
        self.terminal.hide_cursor()?;
        self.entered = true;
        Ok(())
    }

    fn exit(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        terminal::disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        self.terminal.show_cursor()?;
        self.entered = false;
        Ok(())
    }

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(UiFrame<'_>),
    {
        self.terminal
            .draw(move |frame| {
                let wrapper = UiFrame::new(frame);
                f(wrapper);
            })
            .map(|_| ())
            .map_err(|err| io::Error::other(err.to_string()))
    }
}

impl Drop for ConsoleOutputDriver {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};

    #[test]
    fn key_releases_are_filtered() {
        let press = Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
        let release = Event::Key(KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert!(ConsoleInputDriver::accept(&press));
        assert!(!ConsoleInputDriver::accept(&release));
        assert!(ConsoleInputDriver::accept(&Event::FocusGained));
    }

    #[test]
    fn pending_events_are_read_first() {
        let mut d = ConsoleInputDriver::new();
        d.pending.push_back(Event::Key(KeyEvent::new(
            KeyCode::Char('z'),
            KeyModifiers::NONE,
        )));
        assert!(d.poll(Duration::from_millis(0)).unwrap());
        match d.read().unwrap() {
            Event::Key(k) => assert_eq!(k.code, KeyCode::Char('z')),
            other => panic!("expected key, got {other:?}"),
        }
    }
}
