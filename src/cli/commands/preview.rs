use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;
use redline::Redline;

use super::print_preview;

pub fn handle(file: &Path, proposal: &Path, panel: bool) -> Result<()> {
    let redline = Redline::new(".").context("Failed to load Redline configuration")?;

    let raw = fs::read_to_string(proposal)
        .with_context(|| format!("Failed to read proposal: {}", proposal.display()))?;
    let (mut controller, original) = redline.open_review(file, panel, true)?;
    let proposed = redline.prepare_proposal(&raw, &original);

    println!("{}", "Redline Preview".bright_blue().bold());
    println!("{}", "===============".bright_blue());
    println!("File: {}\n", file.display());

    let summary = controller.start_session(&original, &proposed, file)?;
    if summary.total == 0 {
        println!("{} No changes proposed", "✓".bright_green());
        return Ok(());
    }

    print_preview(&controller);
    for warning in controller.warnings() {
        println!("{} {}", "⚠".bright_yellow(), warning);
    }

    controller.discard()?;
    println!(
        "\n{} {}. Use {} to apply them",
        "→".bright_blue(),
        summary,
        "redline review".bright_cyan()
    );

    Ok(())
}
