use crate::logger;
use crate::GlobalOpts;
use anyhow::Context;
use clap::Subcommand;
use colored::Colorize;
use lv2kit::Settings;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the current settings
    Show,
    /// Change one setting (lv2-path, dyn-manifest, log-file)
    Set { key: String, value: String },
    /// Print the path of the settings file
    Path,
}

pub fn handle_config(action: ConfigAction, opts: &GlobalOpts) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let settings = Settings::load().context("Failed to load config")?;
            println!("{}", "Configuration:".bold().green());
            if settings.is_empty() {
                if opts.verbosity_level() > 0 {
                    println!("  {}", "(empty)".yellow());
                }
            } else {
                for (key, value) in settings.values_iter() {
                    println!("  {}: {}", key.cyan(), value);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut settings = Settings::load().context("Failed to load config")?;
            settings.set(&key, value.clone()).with_context(|| {
                format!(
                    "Cannot set {}. Supported keys: {}",
                    key,
                    Settings::keys().join(", ")
                )
            })?;
            settings.save().context("Failed to save config")?;
            logger::success(&format!("Set {} = {}", key, value));
        }
        ConfigAction::Path => {
            let path = Settings::path()?;
            logger::debug(&format!("Reading config from: {}", path.display()));
            println!("{}", path.display());
            if opts.verbosity_level() > 0 {
                logger::show_log_path();
            }
        }
    }
    Ok(())
}
