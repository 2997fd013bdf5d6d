//! LV2 search path resolution and `file:` URI conversion
//!
//! Search path precedence:
//! - `lv2_path` from the settings file
//! - the `LV2_PATH` environment variable
//! - the platform defaults below

use crate::settings::Settings;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable holding the LV2 search path
pub const LV2_PATH_ENV: &str = "LV2_PATH";

/// Platform default search path, `~` not yet expanded
#[cfg(target_os = "macos")]
pub const DEFAULT_LV2_PATH: &[&str] = &[
    "~/.lv2",
    "~/Library/Audio/Plug-Ins/LV2",
    "/Library/Audio/Plug-Ins/LV2",
    "/usr/local/lib/lv2",
    "/usr/lib/lv2",
];
#[cfg(target_os = "windows")]
pub const DEFAULT_LV2_PATH: &[&str] = &["%APPDATA%\\LV2", "%COMMONPROGRAMFILES%\\LV2"];
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
pub const DEFAULT_LV2_PATH: &[&str] = &["~/.lv2", "/usr/local/lib/lv2", "/usr/lib/lv2"];

/// Expand a leading `~` (and `%VAR%` on Windows)
pub fn expand_home(entry: &str) -> PathBuf {
    if entry == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    if let Some(rest) = entry.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(rest) = entry.strip_prefix('%') {
            if let Some((var, tail)) = rest.split_once('%') {
                if let Ok(value) = std::env::var(var) {
                    return PathBuf::from(format!("{}{}", value, tail));
                }
            }
        }
    }

    PathBuf::from(entry)
}

fn split(value: impl Into<OsString>) -> Vec<PathBuf> {
    std::env::split_paths(&value.into())
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| expand_home(&p.to_string_lossy()))
        .collect()
}

/// Directories scanned for `*.lv2` bundles
pub fn lv2_path(settings: &Settings) -> Vec<PathBuf> {
    if let Some(ref configured) = settings.lv2_path {
        if !configured.trim().is_empty() {
            return split(configured.as_str());
        }
    }
    if let Some(env) = std::env::var_os(LV2_PATH_ENV) {
        if !env.is_empty() {
            return split(env);
        }
    }
    DEFAULT_LV2_PATH.iter().map(|entry| expand_home(entry)).collect()
}

fn hex(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex(bytes[i + 1]), hex(bytes[i + 2])) {
                out.push(hi * 16 + lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn percent_encode(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for b in path.bytes() {
        if b.is_ascii_alphanumeric() || b"/-_.~:".contains(&b) {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}

/// Local path named by a `file://` URI
///
/// Only `file:///abs/path` and `file://localhost/abs/path` map to a path;
/// `file:rel`, other hosts and other schemes give `None`.
pub fn uri_to_path(uri: &str) -> Option<PathBuf> {
    let rest = uri.strip_prefix("file://")?;
    let rest = rest.strip_prefix("localhost").unwrap_or(rest);
    if !rest.starts_with('/') {
        return None;
    }
    let decoded = percent_decode(rest);

    // file:///C:/Plugins -> C:/Plugins
    #[cfg(target_os = "windows")]
    let decoded = match decoded.as_bytes() {
        [b'/', drive, b':', ..] if drive.is_ascii_alphabetic() => decoded[1..].to_string(),
        _ => decoded,
    };

    Some(PathBuf::from(decoded))
}

/// `file://` URI for an absolute path
pub fn path_to_uri(path: &Path) -> String {
    let text = path.to_string_lossy().replace('\\', "/");
    if text.starts_with('/') {
        format!("file://{}", percent_encode(&text))
    } else {
        format!("file:///{}", percent_encode(&text))
    }
}

/// Directory URI with the trailing slash relative references resolve against
pub fn bundle_dir_uri(path: &Path) -> String {
    let mut uri = path_to_uri(path);
    if !uri.ends_with('/') {
        uri.push('/');
    }
    uri
}
