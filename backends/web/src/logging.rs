//! Log and panic forwarding to the browser console.

use std::io::{self, Write};
use std::str::FromStr;
use std::sync::Once;

use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;
use tracing::{Level, Metadata};
use tracing_subscriber::Layer;
use tracing_subscriber::fmt::{self, writer::MakeWriter};
use tracing_subscriber::prelude::*;
use wasm_bindgen::JsValue;

use crate::error::WebError;

const CONSOLE_PREFIX: &str = "[lightdom]";
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::INFO;

static TRACING_INSTALLED: Once = Once::new();

// ============================================================================
// Configuration
// ============================================================================

/// Console logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Maximum level written to the console (`error`, `warn`, `info`, `debug`,
    /// `trace` or `off`). Unknown values fall back to `info`.
    pub level: String,
    /// Whether Rust panics are forwarded to `console.error`.
    pub panic_hook: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            panic_hook: true,
        }
    }
}

impl LogConfig {
    /// Parses a JSON configuration; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`WebError::InvalidConfig`] if `json` is not a valid document.
    pub fn from_json(json: &str) -> Result<Self, WebError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The configured level as a filter.
    #[must_use]
    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.level).unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

// ============================================================================
// Installation
// ============================================================================

/// Install the console subscriber and, if configured, the panic hook
/// (idempotent: only the first call takes effect).
pub fn install(config: &LogConfig) {
    if config.panic_hook {
        console_error_panic_hook::set_once();
    }
    TRACING_INSTALLED.call_once(|| {
        let console = fmt::layer()
            .with_writer(ConsoleWriter)
            .with_ansi(false)
            .without_time()
            .with_filter(config.level_filter());

        if tracing_subscriber::registry().with(console).try_init().is_err() {
            web_sys::console::warn_1(&JsValue::from_str(
                "lightdom: a global tracing subscriber is already installed",
            ));
        }
    });
}

// ============================================================================
// Console writer
// ============================================================================

/// Routes each formatted event to the console method matching its level.
#[derive(Clone, Copy, Default)]
struct ConsoleWriter;

impl<'a> MakeWriter<'a> for ConsoleWriter {
    type Writer = ConsoleLine;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleLine::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleLine::new(*meta.level())
    }
}

/// Buffers one event; the line is emitted when the writer is dropped.
struct ConsoleLine {
    level: Level,
    buffer: Vec<u8>,
}

impl ConsoleLine {
    const fn new(level: Level) -> Self {
        Self {
            level,
            buffer: Vec::new(),
        }
    }
}

impl Write for ConsoleLine {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleLine {
    fn drop(&mut self) {
        let Some(line) = console_line(&self.buffer) else {
            return;
        };
        let value = JsValue::from_str(&line);
        match ConsoleMethod::for_level(self.level) {
            ConsoleMethod::Error => web_sys::console::error_1(&value),
            ConsoleMethod::Warn => web_sys::console::warn_1(&value),
            ConsoleMethod::Info => web_sys::console::info_1(&value),
            ConsoleMethod::Debug => web_sys::console::debug_1(&value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConsoleMethod {
    Error,
    Warn,
    Info,
    Debug,
}

impl ConsoleMethod {
    fn for_level(level: Level) -> Self {
        match level {
            Level::ERROR => Self::Error,
            Level::WARN => Self::Warn,
            Level::INFO => Self::Info,
            _ => Self::Debug,
        }
    }
}

fn console_line(buffer: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(buffer);
    let text = text.trim_end();
    (!text.is_empty()).then(|| format!("{CONSOLE_PREFIX} {text}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_logs_info_with_panic_hook() {
        let config = LogConfig::default();
        assert_eq!(config.level_filter(), LevelFilter::INFO);
        assert!(config.panic_hook);
    }

    #[test]
    fn json_config_overrides_level() {
        let config = LogConfig::from_json(r#"{"level": "debug"}"#).unwrap();
        assert_eq!(config.level_filter(), LevelFilter::DEBUG);
        assert!(config.panic_hook);
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        let config = LogConfig {
            level: "chatty".into(),
            panic_hook: false,
        };
        assert_eq!(config.level_filter(), LevelFilter::INFO);
    }

    #[test]
    fn levels_map_to_console_methods() {
        assert_eq!(ConsoleMethod::for_level(Level::ERROR), ConsoleMethod::Error);
        assert_eq!(ConsoleMethod::for_level(Level::WARN), ConsoleMethod::Warn);
        assert_eq!(ConsoleMethod::for_level(Level::INFO), ConsoleMethod::Info);
        assert_eq!(ConsoleMethod::for_level(Level::TRACE), ConsoleMethod::Debug);
    }

    #[test]
    fn lines_are_prefixed_and_trimmed() {
        assert_eq!(
            console_line(b"INFO lightdom::animator: frame statistics\n").as_deref(),
            Some("[lightdom] INFO lightdom::animator: frame statistics")
        );
        assert_eq!(console_line(b"\n"), None);
    }
}
