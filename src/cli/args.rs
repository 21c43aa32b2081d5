//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};

/// Stream starred repositories from GitHub and GitLab.
#[derive(Parser, Debug, Default)]
#[command(name = "starfetch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    // === Global flags ===
    /// Hosting service to use (github, gitlab)
    #[arg(short, long, value_name = "SERVICE", global = true)]
    pub service: Option<String>,

    /// Output format (text, json); unknown names fall back to text
    #[arg(short, long, value_name = "FORMAT", global = true)]
    pub output: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log level
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Emit JSONL logs to stderr
    #[arg(long, global = true)]
    pub json_output: bool,

    /// Verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List starred repositories (default command)
    Stars(StarsArgs),

    /// Prompt for a personal access token and store it in the system keyring
    Login,

    /// Remove the stored token for the service
    Logout,

    /// List registered services and output formats
    Services,
}

/// Arguments for the `stars` command.
#[derive(Parser, Debug, Default, Clone)]
pub struct StarsArgs {
    /// User whose stars to list; defaults to the authenticated user
    #[arg(value_name = "USER")]
    pub user: Option<String>,

    /// Personal access token (overrides the environment and the keyring)
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Records requested per page (1-100)
    #[arg(long, value_name = "N")]
    pub per_page: Option<u32>,
}
