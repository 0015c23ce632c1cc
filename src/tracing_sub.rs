use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use tracing::Level;

use crate::log_buffer::{LogBuffer, LogWriter};

/// Where formatted log lines go.
#[derive(Clone, Debug)]
pub enum LogSink {
    /// In-memory ring shown by the log overlay; used while the terminal UI
    /// owns the screen.
    Buffer(LogBuffer),
    File(Arc<File>),
    Stderr,
}

impl LogSink {
    /// Appends to `path`, creating it if needed.
    pub fn file(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(LogSink::File(Arc::new(file)))
    }
}

pub struct DelegatingWriter {
    inner: DelegatingInner,
}

enum DelegatingInner {
    Buffer(LogWriter),
    File(Arc<File>),
    Stderr(io::Stderr),
}

impl DelegatingWriter {
    fn new(sink: &LogSink) -> Self {
        let inner = match sink {
            LogSink::Buffer(buffer) => DelegatingInner::Buffer(buffer.writer()),
            LogSink::File(file) => DelegatingInner::File(Arc::clone(file)),
            LogSink::Stderr => DelegatingInner::Stderr(io::stderr()),
        };
        Self { inner }
    }
}

impl Write for DelegatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            DelegatingInner::Buffer(w) => w.write(buf),
            DelegatingInner::File(f) => (&**f).write(buf),
            DelegatingInner::Stderr(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            DelegatingInner::Buffer(w) => w.flush(),
            DelegatingInner::File(f) => (&**f).flush(),
            DelegatingInner::Stderr(s) => s.flush(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SubscriberMakeWriter {
    sink: LogSink,
}

impl SubscriberMakeWriter {
    pub fn new(sink: LogSink) -> Self {
        Self { sink }
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = DelegatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        DelegatingWriter::new(&self.sink)
    }
}

/// Installs the global fmt subscriber writing to `sink`. Safe to call more
/// than once; only the first call takes effect. Returns whether this call
/// installed it.
pub fn init_default(sink: LogSink) -> bool {
    let ansi = matches!(sink, LogSink::Stderr);
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_writer(SubscriberMakeWriter::new(sink))
        .with_ansi(ansi)
        .with_target(false)
        .with_thread_names(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::fmt::MakeWriter;

    #[test]
    fn buffer_sink_collects_lines() {
        let buffer = LogBuffer::new(8);
        let make = SubscriberMakeWriter::new(LogSink::Buffer(buffer.clone()));
        let mut writer = make.make_writer();
        writer.write_all(b"hello\n").unwrap();
        assert_eq!(buffer.latest().as_deref(), Some("hello"));
    }

    #[test]
    fn file_sink_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lens.log");
        let sink = LogSink::file(&path).unwrap();
        let make = SubscriberMakeWriter::new(sink);
        make.make_writer().write_all(b"one\n").unwrap();
        make.make_writer().write_all(b"two\n").unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "one\ntwo\n");
    }
}
