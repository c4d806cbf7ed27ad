use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use redline::diff::{ChangeId, Status};
use redline::session::SessionState;
use redline::{Redline, ReviewController};

use super::{describe, print_preview};

/// How the decisions for a review are made
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    AcceptAll,
    RejectAll,
    /// Listed ids are decided, everything unlisted is rejected.
    Select { accept: Vec<u32>, reject: Vec<u32> },
    Interactive,
}

impl Plan {
    pub fn from_flags(accept_all: bool, reject_all: bool, accept: Vec<u32>, reject: Vec<u32>) -> Self {
        if accept_all {
            Plan::AcceptAll
        } else if reject_all {
            Plan::RejectAll
        } else if !accept.is_empty() || !reject.is_empty() {
            Plan::Select { accept, reject }
        } else {
            Plan::Interactive
        }
    }
}

pub fn handle(file: &Path, proposal: &Path, plan: Plan, panel: bool, dry_run: bool) -> Result<()> {
    let redline = Redline::new(".").context("Failed to load Redline configuration")?;

    let raw = fs::read_to_string(proposal)
        .with_context(|| format!("Failed to read proposal: {}", proposal.display()))?;
    let (mut controller, original) = redline.open_review(file, panel, dry_run)?;
    let proposed = redline.prepare_proposal(&raw, &original);

    let summary = controller.start_session(&original, &proposed, file)?;
    if summary.total == 0 {
        println!("{} No changes proposed for {}", "✓".bright_green(), file.display());
        return Ok(());
    }

    let discarded = match plan {
        Plan::AcceptAll => {
            controller.accept_all()?;
            false
        }
        Plan::RejectAll => {
            controller.reject_all()?;
            false
        }
        Plan::Select { accept, reject } => {
            select(&mut controller, &accept, &reject)?;
            false
        }
        Plan::Interactive => interactive(&mut controller)?,
    };

    report(&controller, file, discarded, dry_run);
    Ok(())
}

fn select(controller: &mut ReviewController, accept: &[u32], reject: &[u32]) -> Result<()> {
    let decisions = accept
        .iter()
        .map(|id| (*id, true))
        .chain(reject.iter().map(|id| (*id, false)));

    for (id, accepted) in decisions {
        if controller.state() == SessionState::Closed {
            break;
        }
        let id = ChangeId(id);
        if accepted {
            controller.accept(id)?;
        } else {
            controller.reject(id)?;
        }
    }

    if controller.state().is_active() {
        let rest = controller.reject_all()?;
        println!("{} Rejected {} unlisted change(s)", "→".bright_blue(), rest);
    }
    Ok(())
}

/// Prompt for each pending change in order. Returns true if the review was discarded.
fn interactive(controller: &mut ReviewController) -> Result<bool> {
    print_preview(controller);

    let stdin = io::stdin();
    loop {
        let Some(view) = controller
            .views()
            .into_iter()
            .find(|view| view.status == Status::Pending)
        else {
            return Ok(false);
        };

        println!("\n{}", describe(&view));
        print!(
            "{} ",
            "Accept? [y]es [n]o [a]ccept rest [d]ecline rest [q]uit:".bright_blue()
        );
        io::stdout().flush()?;

        let mut answer = String::new();
        if stdin.lock().read_line(&mut answer)? == 0 {
            controller.discard()?;
            return Ok(true);
        }

        match answer.trim() {
            "y" | "yes" => {
                controller.accept(view.id)?;
            }
            "n" | "no" => {
                controller.reject(view.id)?;
            }
            "a" => {
                controller.accept_all()?;
            }
            "d" => {
                controller.reject_all()?;
            }
            "q" => {
                controller.discard()?;
                return Ok(true);
            }
            other => println!("{} Unknown answer '{}'", "⚠".bright_yellow(), other),
        }
    }
}

fn report(controller: &ReviewController, file: &Path, discarded: bool, dry_run: bool) {
    for warning in controller.warnings() {
        println!("{} {}", "⚠".bright_yellow(), warning);
    }

    let Some(summary) = controller.summary() else {
        return;
    };

    if discarded {
        println!("\n{} Review discarded, {} left unchanged", "→".bright_blue(), file.display());
        return;
    }

    if dry_run {
        println!("\n{}", "Result (dry run, not written):".bright_yellow().bold());
        println!("{}", controller.text());
    } else if summary.accepted > 0 {
        println!("\n{} Saved {}", "✓".bright_green(), file.display());
    } else {
        println!("\n{} Nothing accepted, {} left unchanged", "→".bright_blue(), file.display());
    }
    if let Some(session) = controller.session() {
        println!(
            "{} {} (started {}): {}",
            "→".bright_blue(),
            session.id,
            session.started_at.format("%Y-%m-%d %H:%M:%S"),
            summary
        );
    }
}
