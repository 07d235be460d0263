//! Rolling Logger
//!
//! A `tracing-subscriber` fmt subscriber whose writer sends every line to the
//! platform sink (the browser console on wasm32, stderr elsewhere) and keeps
//! the most recent lines in a circular buffer, so the app can show them
//! without a file system. `log` records are bridged in through `tracing-log`.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use thiserror::Error;
use tracing::{Level, Metadata, Subscriber};
use tracing_log::LogTracer;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::fmt::MakeWriter;

/// `HH:MM:SS.mmm`
const TIME_FORMAT: &str = "%H:%M:%S%.3f";

static BUFFER: OnceLock<Arc<Mutex<RingBuffer>>> = OnceLock::new();

// ========================
// Errors
// ========================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoggerError {
    #[error("rolling logger is not initialized")]
    NotInitialized,

    #[error("a global logger is already set")]
    AlreadySet,
}

// ========================
// Ring buffer
// ========================

/// Fixed-capacity line buffer; the oldest line is evicted first
#[derive(Debug)]
pub struct RingBuffer {
    lines: VecDeque<String>,
    capacity: usize,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, line: String) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    /// Oldest first
    pub fn lines(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

fn lock(buffer: &Mutex<RingBuffer>) -> MutexGuard<'_, RingBuffer> {
    buffer.lock().unwrap_or_else(PoisonError::into_inner)
}

// ========================
// Writer
// ========================

/// `MakeWriter` that tees formatted events into the ring and the platform sink
#[derive(Clone)]
pub struct RingWriter {
    app_name: Arc<str>,
    buffer: Arc<Mutex<RingBuffer>>,
}

impl RingWriter {
    pub fn new(app_name: &str, capacity: usize) -> Self {
        Self {
            app_name: Arc::from(app_name),
            buffer: Arc::new(Mutex::new(RingBuffer::new(capacity))),
        }
    }

    pub fn recent_lines(&self) -> Vec<String> {
        lock(&self.buffer).lines()
    }

    fn line_writer(&self, level: Level) -> LineWriter {
        LineWriter {
            app_name: self.app_name.clone(),
            buffer: self.buffer.clone(),
            level,
            pending: Vec::new(),
        }
    }
}

impl<'a> MakeWriter<'a> for RingWriter {
    type Writer = LineWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.line_writer(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        self.line_writer(*meta.level())
    }
}

/// Collects one formatted event; the line is emitted when the writer drops
pub struct LineWriter {
    app_name: Arc<str>,
    buffer: Arc<Mutex<RingBuffer>>,
    level: Level,
    pending: Vec<u8>,
}

impl Write for LineWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for LineWriter {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.pending);
        let text = text.trim_end();
        if text.is_empty() {
            return;
        }
        let line = format!("[{}] {}", self.app_name, text);
        write_to_sink(self.level, &line);
        lock(&self.buffer).push(line);
    }
}

#[cfg(target_arch = "wasm32")]
fn write_to_sink(level: Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::ERROR => web_sys::console::error_1(&value),
        Level::WARN => web_sys::console::warn_1(&value),
        Level::INFO => web_sys::console::info_1(&value),
        _ => web_sys::console::log_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_to_sink(_level: Level, line: &str) {
    eprintln!("{}", line);
}

/// Fmt subscriber writing through `writer`: `HH:MM:SS.mmm LEVEL target: message`
pub fn build_subscriber(writer: RingWriter, max_level: Level) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
        .with_max_level(max_level)
        .with_ansi(false)
        .finish()
}

// ========================
// Global API
// ========================

/// Install the rolling subscriber globally and route `log` records into it
pub fn init_logger(app_name: &str, capacity: usize) -> Result<(), LoggerError> {
    if BUFFER.get().is_some() {
        return Err(LoggerError::AlreadySet);
    }
    let writer = RingWriter::new(app_name, capacity);
    let buffer = writer.buffer.clone();

    tracing::subscriber::set_global_default(build_subscriber(writer, Level::DEBUG))
        .map_err(|_| LoggerError::AlreadySet)?;
    LogTracer::init_with_filter(log::LevelFilter::Debug).map_err(|_| LoggerError::AlreadySet)?;
    let _ = BUFFER.set(buffer);

    tracing::info!(target: "app", "logging started");
    Ok(())
}

fn installed() -> Result<(), LoggerError> {
    BUFFER.get().map(|_| ()).ok_or(LoggerError::NotInitialized)
}

pub fn info(message: &str) -> Result<(), LoggerError> {
    installed()?;
    tracing::info!(target: "app", "{}", message);
    Ok(())
}

pub fn error(message: &str) -> Result<(), LoggerError> {
    installed()?;
    tracing::error!(target: "app", "{}", message);
    Ok(())
}

/// Lines kept by the global logger, oldest first (empty before init)
pub fn recent_lines() -> Vec<String> {
    BUFFER.get().map(|buffer| lock(buffer).lines()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_buffer_evicts_oldest() {
        let mut buffer = RingBuffer::new(2);
        buffer.push("a".into());
        buffer.push("b".into());
        buffer.push("c".into());
        assert_eq!(buffer.lines(), vec!["b", "c"]);
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_zero_capacity_keeps_one_line() {
        let mut buffer = RingBuffer::new(0);
        assert!(buffer.is_empty());
        buffer.push("only".into());
        buffer.push("latest".into());
        assert_eq!(buffer.capacity(), 1);
        assert_eq!(buffer.lines(), vec!["latest"]);
    }

    #[test]
    fn test_subscriber_formats_and_filters() {
        let writer = RingWriter::new("Pantry", 3);
        let subscriber = build_subscriber(writer.clone(), Level::INFO);

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(target: "pantry_core::live", "push {}", 3);
            tracing::debug!(target: "pantry_core::live", "dropped");
        });

        let lines = writer.recent_lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("[Pantry] "));
        assert!(lines[0].ends_with("WARN pantry_core::live: push 3"), "{}", lines[0]);
    }

    #[test]
    fn test_ring_keeps_last_lines() {
        let writer = RingWriter::new("Pantry", 2);
        tracing::subscriber::with_default(build_subscriber(writer.clone(), Level::INFO), || {
            for n in 0..4 {
                tracing::info!(target: "t", "line {}", n);
            }
        });

        let lines = writer.recent_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("line 2"));
        assert!(lines[1].ends_with("line 3"));
    }

    #[test]
    fn test_global_api_bridges_log_records() {
        assert_eq!(init_logger("Pantry", 16), Ok(()));
        assert_eq!(init_logger("Pantry", 16), Err(LoggerError::AlreadySet));

        error("disk full").unwrap();
        log::warn!(target: "pantry_core::store", "slow write");

        let lines = recent_lines();
        assert!(lines.iter().any(|l| l.contains("ERROR app: disk full")), "{:?}", lines);
        assert!(lines.iter().any(|l| l.contains("WARN pantry_core::store: slow write")), "{:?}", lines);
    }
}
