//! lv2kit command line host
//!
//! Library half of the `lv2kit` binary, exposed for testing.

pub mod commands;
pub mod common;

pub use common::GlobalOpts;
pub use lv2kit_logger as logger;
