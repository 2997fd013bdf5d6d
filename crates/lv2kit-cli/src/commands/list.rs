use crate::GlobalOpts;
use colored::Colorize;
use lv2kit::{Plugin, World};
use lv2kit_config::lv2_path;

/// True if `filter` appears in the plugin's URI or name, ignoring case
fn matches(plugin: &Plugin, filter: &str) -> bool {
    let filter = filter.to_lowercase();
    if plugin.uri().to_string().to_lowercase().contains(&filter) {
        return true;
    }
    plugin
        .name()
        .is_some_and(|name| name.to_string().to_lowercase().contains(&filter))
}

pub fn list_plugins(
    opts: &GlobalOpts,
    world: &World,
    filter: Option<&str>,
    include_replaced: bool,
) -> anyhow::Result<()> {
    if world.plugins().is_empty() {
        println!("No LV2 plugins found.\n");
        println!("Searched:");
        for dir in lv2_path(world.settings()) {
            println!("  {}", dir.display());
        }
        println!(
            "\nSet {} or run {} to search elsewhere.",
            "LV2_PATH".bold(),
            "lv2kit config set lv2-path <dirs>".bold().cyan()
        );
        return Ok(());
    }

    let plugins = world
        .plugins()
        .filter(|p| include_replaced || !p.is_replaced())
        .filter(|p| filter.map_or(true, |f| matches(p, f)));

    if plugins.is_empty() {
        println!("No plugins match '{}'.", filter.unwrap_or_default());
        return Ok(());
    }

    println!("{}", "Plugins:".bold().green());
    for plugin in &plugins {
        let name = plugin
            .name()
            .map_or_else(|| "(unnamed)".dimmed().to_string(), |n| n.to_string());
        let mut line = format!("  {} {}", plugin.uri().to_string().bold().blue(), name);
        if plugin.is_replaced() {
            line.push_str(&format!(" {}", "[replaced]".yellow()));
        }
        println!("{}", line);

        if opts.verbosity_level() > 0 {
            println!(
                "      {} {}",
                plugin.class().label().to_string().cyan(),
                plugin.bundle_uri().to_string().dimmed()
            );
        }
    }
    println!();
    println!("{}: {}", "Total plugins".bold(), plugins.len());
    Ok(())
}
