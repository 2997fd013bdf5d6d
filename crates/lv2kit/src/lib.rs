//! lv2kit - LV2 plugin discovery and lazy metadata resolution
//!
//! A [`World`] reads bundle manifests into an in-memory statement store and
//! registers the plugins they declare. Each [`Plugin`] parses its own
//! description files the first time it is asked anything, then answers
//! queries about its ports, class, features, author and UIs from the store.
//!
//! Malformed metadata never aborts a query: accessors return `None` or an
//! empty result and report what went wrong through the world's
//! [`DiagnosticSink`].
//!
//! ```no_run
//! use lv2kit::World;
//!
//! let mut world = World::new();
//! world.load_all();
//! for plugin in world.plugins() {
//!     println!("{} ({} ports)", plugin.uri(), plugin.num_ports());
//! }
//! ```

#[cfg(feature = "dyn-manifest")]
pub mod dyn_manifest;
pub mod error;
pub mod node;
pub mod ns;
pub mod plugin;
pub mod plugin_class;
pub mod plugins;
pub mod port;
pub mod ui;
pub mod world;

pub use error::Lv2Error;
pub use lv2kit_config::Settings;
pub use lv2kit_logger::{Diagnostic, DiagnosticSink, Level};
pub use node::{Node, Nodes};
pub use plugin::{Plugin, PortRanges};
pub use plugin_class::{PluginClass, PluginClasses};
pub use plugins::Plugins;
pub use port::Port;
pub use ui::Ui;
pub use world::World;
