use anyhow::{Context, Result};
use colored::Colorize;
use redline::config::Config;

use crate::cli::ConfigAction;

pub fn handle(action: ConfigAction) -> Result<()> {
    let mut config = Config::load_or_default(".").context("Failed to load configuration")?;

    match action {
        ConfigAction::Set { key, value } => {
            println!(
                "{} Setting {} = {}",
                "→".bright_green(),
                key.bright_cyan(),
                value.bright_yellow()
            );
            config.set(&key, &value)?;
            println!("{} Configuration updated", "✓".bright_green());
        }

        ConfigAction::Get { key } => {
            let value = config.get(&key)?;
            println!("{} = {}", key.bright_cyan(), value);
        }

        ConfigAction::List => {
            println!("{}", "Current Configuration:".bright_blue().bold());
            if !config.path.exists() {
                println!("  {} No project config, showing defaults", "ℹ".bright_blue());
            }
            for (key, value) in config.list()? {
                println!("  {} = {}", key.bright_cyan(), value.bright_yellow());
            }
        }
    }

    Ok(())
}
