//! CLI command-name contract for logging.

use crate::cli::parse::{Commands, ReviewCommands};

/// Dotted command name (e.g. "run", "review.approve").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::Run { .. } => "run".to_string(),
        Commands::Capture { .. } => "capture".to_string(),
        Commands::Review { command } => format!("review.{}", review_command_name(command)),
        Commands::Watch { .. } => "watch".to_string(),
    }
}

pub fn review_command_name(command: &ReviewCommands) -> &'static str {
    match command {
        ReviewCommands::Generate { .. } => "generate",
        ReviewCommands::Open { .. } => "open",
        ReviewCommands::Approve { .. } => "approve",
    }
}
