//! Configuration for lv2kit
//!
//! User settings persisted as TOML, resolution of the LV2 search path, and
//! conversion between `file:` URIs and local paths.

pub mod errors;
pub mod paths;
pub mod settings;

pub use errors::ConfigError;
pub use paths::{bundle_dir_uri, expand_home, lv2_path, path_to_uri, uri_to_path};
pub use settings::Settings;
