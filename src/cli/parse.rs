//! CLI parse: clap types for appshots. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// appshots - scripted simulator screenshots and store review artifacts
#[derive(Parser)]
#[command(name = "appshots")]
#[command(about = "Capture simulator screenshots and review them for App Store submission")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable logging entirely
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Execute an automation plan and print the run result
    Run {
        /// Plan file (defaults to plan.path from config)
        #[arg(long)]
        plan: Option<PathBuf>,
        /// Output format (text or json)
        #[arg(long, default_value = "json")]
        format: String,
    },
    /// Capture a single screenshot
    Capture {
        /// Screenshot name, written as <output-dir>/<name>.png
        #[arg(long)]
        name: String,
        /// Launch this app before capturing
        #[arg(long)]
        bundle_id: Option<String>,
        /// Simulator UDID (default: booted)
        #[arg(long)]
        udid: Option<String>,
        /// Output directory (default: ./screenshots/raw)
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Review and approve framed screenshots
    Review {
        #[command(subcommand)]
        command: ReviewCommands,
    },
    /// Regenerate review artifacts whenever screenshots change
    Watch {
        #[arg(long)]
        raw_dir: Option<String>,
        #[arg(long)]
        framed_dir: Option<String>,
        #[arg(long)]
        output_dir: Option<String>,
        #[arg(long)]
        approval_path: Option<String>,
        /// Frame configuration YAML; its image asset directories are watched too
        #[arg(long)]
        frame_config: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ReviewCommands {
    /// Build manifest.json, index.html, and the approval ledger
    Generate {
        #[arg(long)]
        raw_dir: Option<String>,
        #[arg(long)]
        framed_dir: Option<String>,
        #[arg(long)]
        output_dir: Option<String>,
        #[arg(long)]
        approval_path: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Open the generated HTML report
    Open {
        #[arg(long)]
        output_dir: Option<String>,
        /// Resolve the report path without launching a viewer
        #[arg(long)]
        dry_run: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Approve manifest entries by selector
    Approve {
        /// Approve every entry whose status is ready
        #[arg(long)]
        all_ready: bool,
        #[arg(long)]
        locale: Option<String>,
        #[arg(long)]
        device: Option<String>,
        #[arg(long)]
        output_dir: Option<String>,
        #[arg(long)]
        approval_path: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}
