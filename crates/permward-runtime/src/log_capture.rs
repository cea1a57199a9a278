//! In-memory log capture for unit tests.
//!
//! Installs a `fmt` layer for the duration of a closure and collects one
//! [`LogLine`] per event, so tests can assert on levels and fields.

use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;

/// One formatted event: its level and the rest of the line
/// (`message key=value ...`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LogLine {
    pub level: Level,
    pub text: String,
}

impl LogLine {
    pub fn has(&self, needle: &str) -> bool {
        self.text.contains(needle)
    }
}

/// Captured events from one [`capture_logs`] call.
#[derive(Debug, Default)]
pub(crate) struct Captured(Vec<LogLine>);

impl Captured {
    pub fn at(&self, level: Level) -> Vec<&LogLine> {
        self.0.iter().filter(|l| l.level == level).collect()
    }

    /// Events at `level` or more severe.
    pub fn at_least(&self, level: Level) -> Vec<&LogLine> {
        self.0.iter().filter(|l| l.level <= level).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Default)]
struct CaptureMakeWriter {
    lines: Arc<Mutex<Vec<String>>>,
}

impl<'a> MakeWriter<'a> for CaptureMakeWriter {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureWriter {
            lines: Arc::clone(&self.lines),
            buf: Vec::with_capacity(256),
        }
    }
}

/// Buffers one event; pushes it on [`Drop`].
struct CaptureWriter {
    lines: Arc<Mutex<Vec<String>>>,
    buf: Vec<u8>,
}

impl Write for CaptureWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for CaptureWriter {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let line = String::from_utf8_lossy(&self.buf).trim_end().to_string();
        self.lines.lock().push(line);
    }
}

/// Runs `f` with a capturing subscriber as the thread default.
pub(crate) fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, Captured) {
    let writer = CaptureMakeWriter::default();
    let subscriber = tracing_subscriber::registry().with(
        tracing_subscriber::fmt::layer()
            .with_writer(writer.clone())
            .with_ansi(false)
            .without_time()
            .with_target(false),
    );

    let out = tracing::subscriber::with_default(subscriber, f);
    let lines = writer.lines.lock().iter().filter_map(|l| parse(l)).collect();
    (out, Captured(lines))
}

/// Splits `" WARN found ... got=0640"` into level and text.
fn parse(line: &str) -> Option<LogLine> {
    let (level, rest) = line.trim_start().split_once(' ')?;
    Some(LogLine {
        level: level.parse().ok()?,
        text: rest.trim_start().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{debug, warn};

    #[test]
    fn captures_level_and_fields() {
        let ((), logs) = capture_logs(|| {
            debug!(path = "/opt/app", "quiet");
            warn!(got = 0o640, "loud");
        });

        assert_eq!(logs.at(Level::DEBUG).len(), 1);
        let warns = logs.at(Level::WARN);
        assert_eq!(warns.len(), 1);
        assert!(warns[0].has("loud"), "got: {:?}", warns[0]);
        assert!(warns[0].has("got=416"), "got: {:?}", warns[0]);
        assert_eq!(logs.at_least(Level::WARN).len(), 1);
    }

    #[test]
    fn nothing_logged_is_empty() {
        let (value, logs) = capture_logs(|| 7);
        assert_eq!(value, 7);
        assert!(logs.is_empty());
    }
}
