mod cli;

use anyhow::Result;
use clap::Parser;
use cli::commands;

fn main() {
    let cli = cli::Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run_command(cli) {
        commands::display_error(&err);
        std::process::exit(1);
    }
}

fn run_command(cli: cli::Cli) -> Result<()> {
    use cli::Commands;

    match cli.command {
        Commands::Init { path } => commands::init::handle(&path),
        Commands::Diff { old, new, json } => commands::diff::handle(&old, &new, json),
        Commands::Preview {
            file,
            proposal,
            panel,
        } => commands::preview::handle(&file, &proposal, panel),
        Commands::Review {
            file,
            proposal,
            accept_all,
            reject_all,
            accept,
            reject,
            panel,
            dry_run,
        } => {
            let plan = commands::review::Plan::from_flags(accept_all, reject_all, accept, reject);
            commands::review::handle(&file, &proposal, plan, panel, dry_run)
        }
        Commands::Config { action } => commands::config::handle(action),
        Commands::Cache { action } => commands::cache::handle(action),
    }
}
