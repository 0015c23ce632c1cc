use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::InputDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

/// Frame-driven loop: one tick per frame, then every input event that
/// arrived during it.
///
/// Everything runs on the calling thread. The handler sees `None` once per
/// frame (refresh, picking and drawing happen there) and `Some(event)` for
/// each queued input event.
pub struct EventLoop<D> {
    driver: D,
    frame_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, frame_interval: Duration) -> Self {
        Self {
            driver,
            frame_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Runs until the handler returns [`ControlFlow::Quit`].
    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            if handler(&mut self.driver, None)? == ControlFlow::Quit {
                return Ok(());
            }

            if self.driver.poll(self.frame_interval)? {
                // drain the burst so drags and scrolls do not lag behind
                loop {
                    let event = self.driver.read()?;
                    if handler(&mut self.driver, Some(event))? == ControlFlow::Quit {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::ZERO)? {
                        break;
                    }
                }
            }
        }
    }
}
