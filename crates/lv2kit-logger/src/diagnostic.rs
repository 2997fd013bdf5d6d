//! Diagnostic events and the sinks that receive them
//!
//! Metadata problems never fail an accessor. They are reported as a
//! [`Diagnostic`] through whichever [`DiagnosticSink`] the world was built
//! with, and the accessor returns an empty or default result.

use colored::Colorize;
use parking_lot::Mutex;
use std::fmt;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Error,
    Warning,
    Info,
    Debug,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Error => "ERROR",
            Level::Warning => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
        };
        f.write_str(name)
    }
}

/// One advisory message about the metadata being resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
}

impl Diagnostic {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Diagnostic {
            level,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Level::Info, message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.level, self.message)
    }
}

/// Observer for diagnostics emitted while resolving plugin metadata
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing` events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        match diagnostic.level {
            Level::Error => tracing::error!("{}", diagnostic.message),
            Level::Warning => tracing::warn!("{}", diagnostic.message),
            Level::Info => tracing::info!("{}", diagnostic.message),
            Level::Debug => tracing::debug!("{}", diagnostic.message),
        }
    }
}

/// Collects diagnostics in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.events.lock().clone()
    }

    /// Number of diagnostics at the given level
    pub fn count(&self, level: Level) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|d| d.level == level)
            .count()
    }

    /// True if any diagnostic message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.events.lock().iter().any(|d| d.message.contains(needle))
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.events.lock().push(diagnostic);
    }
}

/// Colored stderr output plus the session log file
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl DiagnosticSink for ConsoleSink {
    fn emit(&self, diagnostic: Diagnostic) {
        match diagnostic.level {
            Level::Error => crate::error(&diagnostic.message),
            Level::Warning => crate::warn(&diagnostic.message),
            Level::Info => crate::info(&diagnostic.message),
            Level::Debug => crate::debug(&diagnostic.message),
        }
    }
}

/// Console prefix for a level
pub(crate) fn label(level: Level) -> colored::ColoredString {
    match level {
        Level::Error => "error:".red().bold(),
        Level::Warning => "warning:".yellow().bold(),
        Level::Info => "info:".normal(),
        Level::Debug => "DEBUG:".blue().bold(),
    }
}
