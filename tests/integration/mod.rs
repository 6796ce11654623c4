//! Integration tests for plan execution, review artifacts, and watch mode

mod cli_commands;
mod plan_run;
mod review_pipeline;
mod watch_daemon;
