use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;

use redline::diff::{diff_texts, DiffStats};
use redline::session::ChangeView;

pub fn handle(old: &Path, new: &Path, json: bool) -> Result<()> {
    let original = fs::read_to_string(old)
        .with_context(|| format!("Failed to read file: {}", old.display()))?;
    let proposed = fs::read_to_string(new)
        .with_context(|| format!("Failed to read file: {}", new.display()))?;

    let records = diff_texts(&original, &proposed);

    if json {
        let views: Vec<ChangeView> = records
            .iter()
            .map(|record| ChangeView::new(record, None))
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&views).context("Failed to serialize changes")?
        );
        return Ok(());
    }

    let stats = DiffStats::from_records(&records);

    println!("{}", "Line Changes".bright_blue().bold());
    println!("{}", "============".bright_blue());
    println!("{} -> {}\n", old.display(), new.display());

    if records.is_empty() {
        println!("{} Files are identical", "✓".bright_green());
        return Ok(());
    }

    for record in &records {
        let line = format!("{:>4}", record.anchor_line).bright_black();
        if let Some(content) = record.old_content() {
            println!("{} {} {}", line, "-".bright_red(), content.bright_red());
        }
        if let Some(content) = record.new_content() {
            println!("{} {} {}", line, "+".bright_green(), content.bright_green());
        }
    }

    println!(
        "\n{} {} added, {} deleted, {} modified",
        "→".bright_blue(),
        stats.added.to_string().bright_green(),
        stats.deleted.to_string().bright_red(),
        stats.modified.to_string().bright_yellow()
    );

    Ok(())
}
