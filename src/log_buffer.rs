//! In-memory log ring shared between the tracing subscriber, the panic hook
//! and the log overlay.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock};

use crate::constants::LOG_BUFFER_LINES;

static GLOBAL_LOG: OnceLock<LogBuffer> = OnceLock::new();
static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

pub fn set_global_log(buffer: LogBuffer) -> bool {
    GLOBAL_LOG.set(buffer).is_ok()
}

pub fn global_log() -> Option<LogBuffer> {
    GLOBAL_LOG.get().cloned()
}

/// Routes panic reports into the global buffer so faults caught at a window
/// boundary show up in the overlay while the terminal UI owns the screen.
/// Without a global buffer the previous hook runs as usual.
pub fn install_panic_hook() {
    if PANIC_HOOK_INSTALLED.set(()).is_err() {
        return;
    }
    let prev = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if let Some(buffer) = GLOBAL_LOG.get() {
            let location = info
                .location()
                .map(|l| format!("{}:{}", l.file(), l.line()))
                .unwrap_or_else(|| "<unknown>".to_string());
            let message = if let Some(msg) = info.payload().downcast_ref::<&str>() {
                (*msg).to_string()
            } else if let Some(msg) = info.payload().downcast_ref::<String>() {
                msg.clone()
            } else {
                "<non-string panic>".to_string()
            };
            buffer.push(format!("PANIC at {location}: {message}"));
            // the terminal is in raw mode; the default hook would scribble over it
            return;
        }
        prev(info);
    }));
}

#[derive(Debug)]
struct Ring {
    lines: VecDeque<String>,
    max_lines: usize,
}

impl Ring {
    fn push_line(&mut self, line: String) {
        self.lines.push_back(line);
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }
}

/// Cheaply clonable handle to a bounded list of log lines.
#[derive(Clone, Debug)]
pub struct LogBuffer {
    inner: Arc<Mutex<Ring>>,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(LOG_BUFFER_LINES)
    }
}

impl LogBuffer {
    pub fn new(max_lines: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Ring {
                lines: VecDeque::new(),
                max_lines: max_lines.max(1),
            })),
        }
    }

    pub fn push(&self, line: impl Into<String>) {
        if let Ok(mut ring) = self.inner.lock() {
            ring.push_line(line.into());
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|ring| ring.lines.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn latest(&self) -> Option<String> {
        self.inner
            .lock()
            .ok()
            .and_then(|ring| ring.lines.back().cloned())
    }

    /// Up to `count` lines ending `from_end` lines before the newest.
    pub fn window(&self, count: usize, from_end: usize) -> Vec<String> {
        let Ok(ring) = self.inner.lock() else {
            return Vec::new();
        };
        let end = ring.lines.len().saturating_sub(from_end);
        let start = end.saturating_sub(count);
        ring.lines.range(start..end).cloned().collect()
    }

    pub fn writer(&self) -> LogWriter {
        LogWriter {
            buffer: self.clone(),
            pending: Vec::new(),
        }
    }
}

/// `io::Write` adapter splitting output into lines.
#[derive(Debug)]
pub struct LogWriter {
    buffer: LogBuffer,
    pending: Vec<u8>,
}

impl LogWriter {
    fn push_complete_lines(&mut self) {
        let Some(pos) = self.pending.iter().rposition(|b| *b == b'\n') else {
            return;
        };
        let drained: Vec<u8> = self.pending.drain(..=pos).collect();
        for line in String::from_utf8_lossy(&drained).split('\n') {
            if !line.is_empty() {
                self.buffer.push(line.trim_end_matches('\r').to_string());
            }
        }
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.push_complete_lines();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.push_complete_lines();
        if !self.pending.is_empty() {
            let rest = String::from_utf8_lossy(&self.pending).to_string();
            self.pending.clear();
            self.buffer.push(rest);
        }
        Ok(())
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_is_bounded() {
        let buffer = LogBuffer::new(3);
        for line in ["one", "two", "three", "four"] {
            buffer.push(line);
        }
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.window(10, 0), vec!["two", "three", "four"]);
        assert_eq!(buffer.latest().as_deref(), Some("four"));
    }

    #[test]
    fn window_counts_back_from_the_end() {
        let buffer = LogBuffer::new(10);
        for i in 0..6 {
            buffer.push(format!("l{i}"));
        }
        assert_eq!(buffer.window(2, 0), vec!["l4", "l5"]);
        assert_eq!(buffer.window(2, 1), vec!["l3", "l4"]);
        assert_eq!(buffer.window(2, 99), Vec::<String>::new());
    }

    #[test]
    fn writer_splits_lines_and_flushes_partial_on_drop() {
        let buffer = LogBuffer::new(10);
        {
            let mut writer = buffer.writer();
            writer.write_all(b"first line\nsecond").unwrap();
            assert_eq!(buffer.len(), 1);
            writer.write_all(b" half\npartial").unwrap();
        }
        assert_eq!(buffer.window(10, 0), vec!["first line", "second half", "partial"]);
    }
}
