//! Common types and utilities shared across commands

use crate::logger;
use clap::Parser;
use lv2kit::{Settings, World};
use lv2kit_logger::ConsoleSink;
use std::sync::Arc;
use tracing::debug;

/// Global CLI options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    #[arg(short, long, global = true, help = "Only show errors")]
    pub quiet: bool,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase verbosity (-v for debug, -vv for trace)")]
    pub verbose: u8,
}

impl GlobalOpts {
    /// Get the effective verbosity level
    /// - 0: quiet/warn only
    /// - 1: debug (-v)
    /// - 2: trace (-vv)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

/// Settings from the config file, or defaults if it cannot be read
pub fn load_settings() -> Settings {
    match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            logger::warn(&format!("Failed to load config: {}", e));
            Settings::default()
        }
    }
}

/// World with every bundle on the search path discovered
pub fn open_world(settings: Settings) -> World {
    let mut world = World::with_sink(settings, Arc::new(ConsoleSink));

    #[cfg(feature = "dyn-manifest")]
    world.set_dyn_manifest_loader(Arc::new(lv2kit_dynman::SharedLibraryLoader::new()));

    let found = world.load_all();
    debug!(plugins = found, "Bundle discovery finished");
    world
}
