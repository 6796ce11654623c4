//! CLI domain: parse, route, output, and presentation only.
//! No domain orchestration; single route table dispatches to domain services.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands, ReviewCommands};
pub use presentation::{
    format_approve_result_text, format_capture_text, format_open_result_text,
    format_review_result_text, format_run_result_text, format_section_heading, to_pretty_json,
};
pub use route::RunContext;
