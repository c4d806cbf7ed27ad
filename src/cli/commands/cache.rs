use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use redline::cache::SummaryCache;
use redline::Redline;

use crate::cli::CacheAction;

pub fn handle(action: CacheAction) -> Result<()> {
    let redline = Redline::new(".").context("Failed to load Redline configuration")?;
    let mut cache = redline.cache()?;

    match action {
        CacheAction::List => {
            println!("{}", "Cached Summaries:".bright_blue().bold());
            let mut empty = true;
            for (path, entry) in cache.entries() {
                empty = false;
                println!(
                    "  {} {} ({})",
                    path.bright_cyan(),
                    entry.cached_at.format("%Y-%m-%d %H:%M").to_string().bright_black(),
                    entry.short_digest()
                );
                println!("    {}", entry.summary);
            }
            if empty {
                println!("  {} No cached summaries", "ℹ".bright_blue());
            }
        }

        CacheAction::Set { file, summary } => {
            let content = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read file: {}", file.display()))?;
            cache.set(&file, &content, &summary)?;
            println!("{} Cached summary for {}", "✓".bright_green(), file.display());
        }

        CacheAction::Clear => {
            let removed = cache.clear()?;
            println!("{} Removed {} cached summaries", "✓".bright_green(), removed);
        }
    }

    Ok(())
}
