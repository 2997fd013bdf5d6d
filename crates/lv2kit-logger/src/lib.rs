//! Logging for lv2kit
//!
//! Process-wide verbosity and log file state used by the command line
//! host, plus the [`DiagnosticSink`] side channel the core library reports
//! metadata problems through.

pub mod diagnostic;

pub use diagnostic::{ConsoleSink, Diagnostic, DiagnosticSink, Level, MemorySink, TracingSink};

use colored::Colorize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

static LOG_FILE: Mutex<Option<PathBuf>> = Mutex::new(None);
static VERBOSITY: Mutex<u8> = Mutex::new(0);
static QUIET: Mutex<bool> = Mutex::new(false);

const LOG_FILE_NAME: &str = "lv2kit.log";

/// Get the current verbosity level
pub fn get_verbosity() -> u8 {
    VERBOSITY.lock().ok().map(|v| *v).unwrap_or(0)
}

/// Get whether console output of warnings is suppressed
pub fn get_quiet() -> bool {
    QUIET.lock().ok().map(|v| *v).unwrap_or(false)
}

/// Suppress warnings on the console (errors are still shown)
pub fn set_quiet(quiet: bool) {
    if let Ok(mut v) = QUIET.lock() {
        *v = quiet;
    }
}

/// Map verbosity to a `tracing` filter directive for lv2kit crates
/// 0 = warn, 1 = debug (-v), 2 = trace (-vv)
pub fn verbosity_to_filter() -> String {
    let level = match get_verbosity() {
        0 if get_quiet() => "error",
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    format!("lv2kit={level},lv2kit_store={level},lv2kit_dynman={level},lv2kit_cli={level}")
}

/// Initialize verbosity and the session log file
///
/// `log_file` overrides the default location under the config directory.
pub fn init_with_verbosity(
    verbosity: u8,
    quiet: bool,
    log_file: Option<PathBuf>,
) -> Result<(), String> {
    if let Ok(mut v) = VERBOSITY.lock() {
        *v = verbosity;
    }
    set_quiet(quiet);

    let log_file = match log_file {
        Some(path) => path,
        None => get_config_dir()?.join(LOG_FILE_NAME),
    };
    if let Some(parent) = log_file.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create log directory: {}", e))?;
    }

    // Truncate log file on each run
    if log_file.exists() {
        let _ = fs::remove_file(&log_file);
    }

    let mut guard = LOG_FILE
        .lock()
        .map_err(|_| "Log file state is poisoned".to_string())?;
    *guard = Some(log_file);
    Ok(())
}

/// Get the config directory path
fn get_config_dir() -> Result<PathBuf, String> {
    #[cfg(not(target_os = "windows"))]
    let config_dir = dirs::home_dir()
        .ok_or("Could not determine home directory")?
        .join(".config")
        .join("lv2kit");

    #[cfg(target_os = "windows")]
    let config_dir = dirs::config_dir()
        .ok_or("Could not determine config directory")?
        .join("lv2kit");

    Ok(config_dir)
}

fn write_to_log(level: Level, message: &str) {
    if let Ok(guard) = LOG_FILE.lock() {
        if let Some(ref log_path) = *guard {
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(log_path) {
                let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
                let _ = writeln!(file, "[{}] {} {}", timestamp, level, message);
            }
        }
    }
}

/// Log an informational message (console if verbose >= 1, always to file)
pub fn info(message: &str) {
    write_to_log(Level::Info, message);
    if get_verbosity() >= 1 {
        eprintln!("{} {}", diagnostic::label(Level::Info), message);
    }
}

/// Log a debug message (console if verbose >= 1, always to file)
pub fn debug(message: &str) {
    write_to_log(Level::Debug, message);
    if get_verbosity() >= 1 {
        eprintln!("{} {}", diagnostic::label(Level::Debug), message);
    }
}

/// Log a warning (console unless quiet, always to file)
pub fn warn(message: &str) {
    write_to_log(Level::Warning, message);
    if !get_quiet() {
        eprintln!("{} {}", diagnostic::label(Level::Warning), message);
    }
}

/// Log an error (console and file)
pub fn error(message: &str) {
    write_to_log(Level::Error, message);
    eprintln!("{} {}", diagnostic::label(Level::Error), message);
}

/// Report a completed user action (console and file)
pub fn success(message: &str) {
    write_to_log(Level::Info, message);
    let check = "\u{2714}".green().bold();
    eprintln!("{} {}", check, message);
}

/// Get the log file path for display
pub fn get_log_path() -> Option<PathBuf> {
    LOG_FILE.lock().ok().and_then(|guard| guard.clone())
}

/// Print the log file path to the user
pub fn show_log_path() {
    if let Some(path) = get_log_path() {
        eprintln!("Log file: {}", path.display());
    } else if let Ok(config_dir) = get_config_dir() {
        eprintln!("Log file: {}", config_dir.join(LOG_FILE_NAME).display());
    } else {
        eprintln!("Log file location not available");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_receives_messages() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("logs").join("session.log");
        init_with_verbosity(0, true, Some(path.clone())).unwrap();

        warn("plugin has no name");
        debug("reading manifest");

        assert_eq!(get_log_path(), Some(path.clone()));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("WARN plugin has no name"));
        assert!(content.contains("DEBUG reading manifest"));
        assert_eq!(verbosity_to_filter().split(',').next(), Some("lv2kit=error"));
    }
}
