//! Dynamic manifest capability interface
//!
//! A bundle may name a shared library (`a dman:DynManifest ; lv2:binary
//! <lib.so>`) that generates extra plugin data at load time. The core only
//! knows this contract; opening the library is left to a
//! [`DynManifestLoader`] supplied by the host.

use std::path::Path;
use thiserror::Error;

/// Entry points of the dynamic manifest ABI
pub const OPEN_SYMBOL: &str = "lv2_dyn_manifest_open";
pub const GET_DATA_SYMBOL: &str = "lv2_dyn_manifest_get_data";
pub const CLOSE_SYMBOL: &str = "lv2_dyn_manifest_close";

#[derive(Error, Debug)]
pub enum DynManifestError {
    #[error("Unable to open dynamic manifest {path}: {reason}")]
    LoadFailed { path: String, reason: String },

    /// The library does not export this entry point; the step is skipped
    #[error("Dynamic manifest has no `{0}' entry point")]
    MissingEntryPoint(&'static str),

    #[error("`{symbol}' returned {code}")]
    CallFailed { symbol: &'static str, code: i32 },

    #[error("Dynamic manifest <{0}> is not a local file")]
    NotALocalPath(String),
}

/// Opens dynamic manifest libraries
pub trait DynManifestLoader: Send + Sync {
    fn open(&self, library: &Path) -> Result<Box<dyn DynManifestLibrary>, DynManifestError>;
}

/// An opened library, driven as open -> get_data -> close
///
/// Each call returns [`DynManifestError::MissingEntryPoint`] when the
/// library lacks the corresponding symbol.
pub trait DynManifestLibrary {
    fn open(&mut self) -> Result<(), DynManifestError>;

    /// Turtle text describing `plugin_uri`
    fn get_data(&mut self, plugin_uri: &str) -> Result<String, DynManifestError>;

    fn close(&mut self) -> Result<(), DynManifestError>;
}
