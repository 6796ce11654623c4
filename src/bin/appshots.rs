//! appshots CLI Binary
//!
//! Command-line interface for plan-driven screenshot capture and review.

use appshots::cli::{map_error, Cli, RunContext};
use appshots::config::ConfigLoader;
use appshots::logging::{init_logging, resolve_log_file_path, LoggingConfig};
use appshots::ShotsError;
use clap::Parser;
use std::process;
use tracing::{debug, error};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(Some(&logging_config(&cli))) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }
    debug!(workspace = %cli.workspace.display(), "appshots CLI starting");

    if let Err(e) = run(&cli) {
        eprintln!("{}", map_error(&e));
        process::exit(1);
    }
}

/// Load configuration, dispatch the command, and print its output.
fn run(cli: &Cli) -> Result<(), ShotsError> {
    let context = RunContext::new(cli.workspace.clone(), cli.config.clone()).map_err(|e| {
        error!(error = %e, "Error loading configuration");
        e
    })?;
    let output = context.execute(&cli.command)?;
    println!("{}", output);
    Ok(())
}

/// Logging settings from the config layers with CLI flags applied on top.
///
/// An explicit `--config` file replaces the global and workspace layers. A
/// config that fails to load falls back to defaults here; `RunContext`
/// reports the error once logging is up.
fn logging_config(cli: &Cli) -> LoggingConfig {
    let loaded = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(&cli.workspace),
    };
    let mut config = loaded.map(|c| c.logging).unwrap_or_default();
    apply_log_flags(&mut config, cli);
    config
}

fn apply_log_flags(config: &mut LoggingConfig, cli: &Cli) {
    config.enabled &= !cli.quiet;
    if cli.verbose {
        config.level = "debug".to_string();
        if config.output == "file" {
            config.output = "file+stderr".to_string();
        }
    }

    let overrides = [
        (&mut config.level, &cli.log_level),
        (&mut config.format, &cli.log_format),
        (&mut config.output, &cli.log_output),
    ];
    for (slot, flag) in overrides {
        if let Some(value) = flag {
            *slot = value.clone();
        }
    }

    if config.output.starts_with("file") {
        config.file = Some(resolve_log_file_path(cli.log_file.clone(), config.file.take()));
    } else if cli.log_file.is_some() {
        config.file = cli.log_file.clone();
    }
}
