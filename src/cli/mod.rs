pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "redline")]
#[command(about = "Review proposed edits line by line before they reach disk", long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Show debug output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Initialize redline in the current project")]
    Init {
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
    },

    #[command(about = "List the line changes between two files")]
    Diff {
        #[arg(help = "Original file")]
        old: PathBuf,
        #[arg(help = "Proposed file")]
        new: PathBuf,
        #[arg(long, help = "Print changes as JSON")]
        json: bool,
    },

    #[command(about = "Show a proposal rendered over a file without changing it")]
    Preview {
        #[arg(help = "File to preview against")]
        file: PathBuf,
        #[arg(help = "File holding the proposed text or model response")]
        proposal: PathBuf,
        #[arg(short, long, help = "Render in a side panel instead of inline")]
        panel: bool,
    },

    #[command(about = "Accept or reject proposed changes and save the result")]
    Review {
        #[arg(help = "File to review")]
        file: PathBuf,
        #[arg(help = "File holding the proposed text or model response")]
        proposal: PathBuf,
        #[arg(long, conflicts_with_all = ["reject_all", "accept", "reject"], help = "Accept every change")]
        accept_all: bool,
        #[arg(long, conflicts_with_all = ["accept", "reject"], help = "Reject every change")]
        reject_all: bool,
        #[arg(long, value_delimiter = ',', help = "Change ids to accept (e.g. 0,2)")]
        accept: Vec<u32>,
        #[arg(long, value_delimiter = ',', help = "Change ids to reject")]
        reject: Vec<u32>,
        #[arg(short, long, help = "Render in a side panel instead of inline")]
        panel: bool,
        #[arg(long, help = "Print the result instead of writing it")]
        dry_run: bool,
    },

    #[command(about = "Configure redline settings")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    #[command(about = "Inspect the file summary cache")]
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    #[command(about = "Set a configuration value")]
    Set { key: String, value: String },
    #[command(about = "Get a configuration value")]
    Get { key: String },
    #[command(about = "List all configuration values")]
    List,
}

#[derive(Subcommand)]
pub enum CacheAction {
    #[command(about = "List cached summaries")]
    List,
    #[command(about = "Store a summary for a file's current content")]
    Set { file: PathBuf, summary: String },
    #[command(about = "Remove every cached summary")]
    Clear,
}
