//! Structured logging to the browser console.
//!
//! Events from this crate and `mylms_core` are formatted by
//! `tracing-subscriber` and routed to the `console` method matching their
//! level, so the devtools level filter works as expected. Timestamps are
//! off: the console adds its own and `SystemTime` is unavailable on
//! `wasm32-unknown-unknown`.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::{
    Layer,
    filter::{LevelFilter, Targets},
    fmt::{self, MakeWriter, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Logging configuration options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Maximum level for events from the mylms crates.
    pub level: Level,
    /// Maximum level for events from dependencies.
    pub dependency_level: Level,
    /// Whether to include the target module in each line.
    pub include_target: bool,
    /// Whether to include file/line info in each line.
    pub include_file_line: bool,
    /// Whether to log span events (enter/exit).
    pub log_span_events: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LoggingConfig {
    /// Verbose configuration for local development.
    #[must_use]
    pub const fn development() -> Self {
        Self {
            level: Level::DEBUG,
            dependency_level: Level::INFO,
            include_target: true,
            include_file_line: true,
            log_span_events: true,
        }
    }

    /// Quiet configuration for deployed pages.
    #[must_use]
    pub const fn production() -> Self {
        Self {
            level: Level::INFO,
            dependency_level: Level::WARN,
            include_target: false,
            include_file_line: false,
            log_span_events: false,
        }
    }

    /// Detect configuration based on build type.
    #[must_use]
    pub const fn auto() -> Self {
        if cfg!(debug_assertions) {
            Self::development()
        } else {
            Self::production()
        }
    }

    fn targets(&self) -> Targets {
        Targets::new()
            .with_target("mylms_core", self.level)
            .with_target("mylms_ui", self.level)
            .with_default(LevelFilter::from_level(self.dependency_level))
    }
}

/// Errors that can occur during logging initialization.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// A global subscriber is already installed.
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Install the console subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber was already set, for example
/// when the module is initialized twice on one page.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let span_events = if config.log_span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let console_layer = fmt::layer()
        .with_writer(ConsoleMakeWriter)
        .without_time()
        .with_ansi(false)
        .with_level(false)
        .with_target(config.include_target)
        .with_file(config.include_file_line)
        .with_line_number(config.include_file_line)
        .with_span_events(span_events)
        .with_filter(config.targets());

    tracing_subscriber::registry()
        .with(console_layer)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))
}

/// Install the console subscriber with build-type defaults.
///
/// # Errors
///
/// Returns an error if a global subscriber was already set.
pub fn init_auto() -> Result<(), LoggingError> {
    init(&LoggingConfig::auto())
}

/// Console method a line at the given level is written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConsoleMethod {
    Error,
    Warn,
    Info,
    Debug,
}

impl From<Level> for ConsoleMethod {
    fn from(level: Level) -> Self {
        match level {
            Level::ERROR => Self::Error,
            Level::WARN => Self::Warn,
            Level::INFO => Self::Info,
            Level::DEBUG | Level::TRACE => Self::Debug,
        }
    }
}

/// Buffers one formatted event and emits it on drop.
struct ConsoleWriter {
    method: ConsoleMethod,
    buffer: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buffer);
        let line = line.trim_end();
        if line.is_empty() {
            return;
        }
        let value = wasm_bindgen::JsValue::from_str(line);
        match self.method {
            ConsoleMethod::Error => web_sys::console::error_1(&value),
            ConsoleMethod::Warn => web_sys::console::warn_1(&value),
            ConsoleMethod::Info => web_sys::console::info_1(&value),
            ConsoleMethod::Debug => web_sys::console::debug_1(&value),
        }
    }
}

struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            method: ConsoleMethod::Info,
            buffer: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            method: ConsoleMethod::from(*meta.level()),
            buffer: Vec::new(),
        }
    }
}
