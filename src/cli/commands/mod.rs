pub mod cache;
pub mod config;
pub mod diff;
pub mod init;
pub mod preview;
pub mod review;

use colored::Colorize;
use std::collections::HashMap;

use redline::diff::{ChangeKind, Payload};
use redline::preview::OverlayRole;
use redline::session::ChangeView;
use redline::ReviewController;

/// Display an error message with proper formatting
pub fn display_error(err: &anyhow::Error) {
    if let Some(error) = err.downcast_ref::<redline::error::RedlineError>() {
        redline::error::display_error(error);
        return;
    }

    eprintln!("\n{} {}", "✗".bright_red().bold(), "Operation failed".bright_red().bold());
    eprintln!("  {} {}", "├".bright_black(), err);

    for cause in err.chain().skip(1) {
        eprintln!("  {} {}", "├".bright_black(), cause);
    }

    let error_str = err.to_string();
    if error_str.contains("Permission denied") {
        eprintln!("  {} Try running with elevated permissions", "└".bright_cyan());
    } else if error_str.contains("No such file") {
        eprintln!("  {} Check that the file path is correct", "└".bright_cyan());
    } else if error_str.contains("changed on disk") {
        eprintln!("  {} Re-run the review against the current file", "└".bright_cyan());
    } else {
        eprintln!(
            "  {} Run with {} for more details",
            "└".bright_black(),
            "--verbose".bright_cyan()
        );
    }
}

/// Print the buffer with preview lines highlighted, or the side panel.
pub fn print_preview(controller: &ReviewController) {
    if let Some(panel) = controller.renderer().panel() {
        println!("{}", panel.render());
        return;
    }

    let roles: HashMap<usize, OverlayRole> = controller
        .entries()
        .into_iter()
        .map(|entry| (entry.buffer_line, entry.role))
        .collect();

    let text = controller.text();
    for (idx, line) in text.split('\n').enumerate() {
        let number = format!("{:>4}", idx + 1).bright_black();
        match roles.get(&(idx + 1)) {
            Some(OverlayRole::DeleteMarker) => println!("{} {}", number, line.bright_red()),
            Some(OverlayRole::ModifyOld) => println!("{} {}", number, line.yellow().dimmed()),
            Some(OverlayRole::AddMarker | OverlayRole::ModifyNew) => {
                println!("{} {}", number, line.bright_green())
            }
            None => println!("{} {}", number, line),
        }
    }
}

/// One-line description of a change for listings and prompts.
pub fn describe(view: &ChangeView) -> String {
    let kind = match view.kind {
        ChangeKind::Add => "add".bright_green(),
        ChangeKind::Delete => "delete".bright_red(),
        ChangeKind::Modify => "modify".bright_yellow(),
    };
    let detail = match &view.payload {
        Payload::Add { content } => format!("+ {}", content),
        Payload::Delete { content } => format!("- {}", content),
        Payload::Modify {
            old_content,
            new_content,
        } => format!("- {}\n      + {}", old_content, new_content),
    };

    format!(
        "{} {} line {}\n      {}",
        view.id.to_string().bright_cyan(),
        kind,
        view.anchor_line,
        detail
    )
}
