use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use redline::Redline;

pub fn handle(path: &Path) -> Result<()> {
    println!("{}", "Initializing Redline in your project...".bright_blue().bold());
    println!();

    let redline = Redline::init(path)
        .context("Failed to initialize Redline in the specified directory")?;
    println!("  {} Created .redline/ directory", "✓".bright_green());
    println!("  {} Wrote default config to {}", "✓".bright_green(), redline.config().path.display());
    println!("  {} Summary cache is gitignored", "✓".bright_green());

    println!("\n{}", "✨ Redline initialized successfully!".bright_green().bold());

    println!("\n{}", "Quick start:".bright_blue().bold());
    println!("  1. Save a model's proposed version of a file:");
    println!("     {}", "redline preview src/main.rs proposal.md".bright_yellow());
    println!("  2. Walk through the changes and keep the ones you want:");
    println!("     {}", "redline review src/main.rs proposal.md".bright_yellow());

    Ok(())
}
